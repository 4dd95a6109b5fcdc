//! Where a descriptor is being mapped.

use witbridge_core::ErrorContext;

/// Mapping context: the enclosing declaration, the field or parameter being mapped, and
/// whether it carries a trailing optional marker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    None,
    Object {
        type_name: String,
        field_name: String,
        optional: bool,
    },
    Interface {
        type_name: String,
        field_name: String,
        optional: bool,
    },
    Method {
        method_name: String,
        param_name: String,
        optional: bool,
    },
    Constructor {
        class_name: String,
        param_name: String,
        optional: bool,
    },
}

impl Scope {
    pub fn object(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self::Object {
            type_name: type_name.into(),
            field_name: field_name.into(),
            optional,
        }
    }

    pub fn interface(
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self::Interface {
            type_name: type_name.into(),
            field_name: field_name.into(),
            optional,
        }
    }

    pub fn method(
        method_name: impl Into<String>,
        param_name: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self::Method {
            method_name: method_name.into(),
            param_name: param_name.into(),
            optional,
        }
    }

    pub fn constructor(
        class_name: impl Into<String>,
        param_name: impl Into<String>,
        optional: bool,
    ) -> Self {
        Self::Constructor {
            class_name: class_name.into(),
            param_name: param_name.into(),
            optional,
        }
    }

    /// Whether the field or parameter carries a trailing optional marker.
    pub fn is_optional(&self) -> bool {
        match self {
            Self::None => false,
            Self::Object { optional, .. }
            | Self::Interface { optional, .. }
            | Self::Method { optional, .. }
            | Self::Constructor { optional, .. } => *optional,
        }
    }

    /// Name of the enclosing declaration.
    pub fn scope_name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Object { type_name, .. } | Self::Interface { type_name, .. } => Some(type_name),
            Self::Method { method_name, .. } => Some(method_name),
            Self::Constructor { class_name, .. } => Some(class_name),
        }
    }

    /// Name of the field or parameter.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Object { field_name, .. } | Self::Interface { field_name, .. } => {
                Some(field_name)
            }
            Self::Method { param_name, .. } | Self::Constructor { param_name, .. } => {
                Some(param_name)
            }
        }
    }

    /// Same place, without the optional marker. Used for sub-descriptors.
    pub fn nested(&self) -> Self {
        let mut scope = self.clone();
        match &mut scope {
            Self::None => {}
            Self::Object { optional, .. }
            | Self::Interface { optional, .. }
            | Self::Method { optional, .. }
            | Self::Constructor { optional, .. } => *optional = false,
        }
        scope
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext::new(self.scope_name(), self.field_name())
    }
}
