//! Errors shared by schema derivation, value conversion and the wire codecs.

use std::fmt;

/// Where a failure happened: the enclosing declaration and the field or parameter in it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    pub scope: Option<String>,
    pub field: Option<String>,
}

impl ErrorContext {
    pub fn new(scope: Option<&str>, field: Option<&str>) -> Self {
        Self {
            scope: scope.map(str::to_owned),
            field: field.map(str::to_owned),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.scope, &self.field) {
            (Some(scope), Some(field)) => write!(f, " in `{scope}.{field}`"),
            (Some(scope), None) => write!(f, " in `{scope}`"),
            (None, Some(field)) => write!(f, " at `{field}`"),
            (None, None) => Ok(()),
        }
    }
}

/// Errors produced by witbridge.
///
/// Mapping errors are deterministic: the same descriptor always fails the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The descriptor kind or name has no interchange representation.
    #[error("unsupported type `{ty}`{context}: {hint}")]
    UnsupportedType {
        ty: String,
        hint: String,
        context: ErrorContext,
    },

    /// A value's shape disagrees with the schema at some point.
    #[error("type mismatch{context}: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: String,
        context: ErrorContext,
    },

    #[error("missing field `{field}`{context}")]
    MissingField { field: String, context: ErrorContext },

    /// No case of a union structurally matches the value.
    #[error("value {value} matches no case of `{union}`{context}")]
    UnionNoMatch {
        value: String,
        union: String,
        context: ErrorContext,
    },

    #[error("recursive type `{name}` is not supported{context}")]
    RecursiveTypeRejected { name: String, context: ErrorContext },

    /// A codec invariant was violated. Never expected on well-formed input.
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("invalid type descriptor: {0}")]
    Descriptor(String),

    #[error("binary codec error: {0}")]
    Binary(String),
}
