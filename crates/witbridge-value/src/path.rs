//! Location of a conversion inside the schema, for diagnostics.

use witbridge_core::{ErrorContext, Schema};

/// Where a conversion currently is: the top-level schema's name and the field path
/// below it (`address.lines[2]`).
pub(crate) struct FieldPath {
    scope: Option<String>,
    segments: Vec<Segment>,
}

enum Segment {
    Field(String),
    Index(usize),
}

impl FieldPath {
    pub(crate) fn new(root: &Schema) -> Self {
        Self {
            scope: root.name().map(str::to_owned),
            segments: Vec::new(),
        }
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_owned()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    pub(crate) fn context(&self) -> ErrorContext {
        let mut field = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => {
                    if !field.is_empty() {
                        field.push('.');
                    }
                    field.push_str(name);
                }
                Segment::Index(i) => {
                    field.push_str(&format!("[{i}]"));
                }
            }
        }
        ErrorContext {
            scope: self.scope.clone(),
            field: (!field.is_empty()).then_some(field),
        }
    }
}

/// Short rendering of an expected schema: `record user`, or the full shape when
/// anonymous.
pub(crate) fn expected(schema: &Schema) -> String {
    match schema.name() {
        Some(name) => format!("{} {name}", schema.kind_name()),
        None => schema.to_string(),
    }
}
