//! Host type descriptors.
//!
//! A descriptor is the host language's compile-time view of a declared type, already
//! resolved by the external reflector. Descriptors are immutable and only live for the
//! duration of one mapping call.
//!
//! The reflector hands descriptors over as JSON, internally tagged by `kind`:
//!
//! ```
//! use witbridge_core::{DescriptorKind, TypeDescriptor};
//!
//! let ty = TypeDescriptor::from_json(r#"{ "kind": "array", "element": { "kind": "string" } }"#)
//!     .unwrap();
//! assert!(matches!(ty.kind, DescriptorKind::Array { .. }));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A host type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    #[serde(flatten)]
    pub kind: DescriptorKind,
    /// Declared name, if the type is named (interfaces, aliases, named unions, built-ins).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Set by the reflector for a trailing optional marker (`x?: T`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// Kind tag of a descriptor, with its nested sub-descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DescriptorKind {
    Boolean,
    Number,
    String,
    #[serde(rename = "bigint")]
    BigInt,
    Null,
    Undefined,
    Void,
    /// Arrays, including the fixed-width buffer aliases (identified by `name`).
    Array {
        element: Box<TypeDescriptor>,
    },
    Tuple {
        elements: Vec<TypeDescriptor>,
    },
    Union {
        members: Vec<TypeDescriptor>,
    },
    Object {
        properties: Vec<Property>,
    },
    Interface {
        properties: Vec<Property>,
    },
    /// Nominal class. Always rejected.
    Class,
    Promise {
        inner: Box<TypeDescriptor>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Literal {
        value: LiteralValue,
    },
    /// Type alias the reflector could not see through. Always rejected.
    Alias {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<Box<TypeDescriptor>>,
    },
    /// The reflector failed to resolve the type.
    Unresolved {
        text: String,
    },
    /// Any other named type, identified by `name` alone.
    Other,
}

/// A declared property of an object or interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

/// A literal type.
///
/// Numeric literals compare and hash by bit pattern, so descriptors can key the
/// anonymous-type cache structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralValue {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Decimal digits of a bigint literal.
    BigInt(String),
}

impl PartialEq for LiteralValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LiteralValue {}

impl Hash for LiteralValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Boolean(b) => b.hash(state),
            Self::Number(n) => n.to_bits().hash(state),
            Self::String(s) | Self::BigInt(s) => s.hash(state),
        }
    }
}

impl LiteralValue {
    /// Whether this is a numeric (number or bigint) literal.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_) | Self::BigInt(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", crate::utils::format_number(*n)),
            Self::String(s) => write!(f, "{s:?}"),
            Self::BigInt(digits) => write!(f, "{digits}n"),
        }
    }
}

impl Property {
    pub fn required(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: true,
        }
    }
}

impl TypeDescriptor {
    /// Parse a descriptor from the reflector's JSON form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Descriptor(e.to_string()))
    }

    pub fn new(kind: DescriptorKind) -> Self {
        Self {
            kind,
            name: None,
            optional: false,
        }
    }

    pub fn boolean() -> Self {
        Self::new(DescriptorKind::Boolean)
    }

    pub fn number() -> Self {
        Self::new(DescriptorKind::Number)
    }

    pub fn string() -> Self {
        Self::new(DescriptorKind::String)
    }

    pub fn bigint() -> Self {
        Self::new(DescriptorKind::BigInt)
    }

    pub fn null() -> Self {
        Self::new(DescriptorKind::Null)
    }

    pub fn undefined() -> Self {
        Self::new(DescriptorKind::Undefined)
    }

    pub fn void() -> Self {
        Self::new(DescriptorKind::Void)
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self::new(DescriptorKind::Array {
            element: Box::new(element),
        })
    }

    pub fn tuple(elements: Vec<TypeDescriptor>) -> Self {
        Self::new(DescriptorKind::Tuple { elements })
    }

    pub fn union(members: Vec<TypeDescriptor>) -> Self {
        Self::new(DescriptorKind::Union { members })
    }

    pub fn object(properties: Vec<Property>) -> Self {
        Self::new(DescriptorKind::Object { properties })
    }

    pub fn interface(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self::new(DescriptorKind::Interface { properties }).named(name)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(DescriptorKind::Class).named(name)
    }

    pub fn promise(inner: TypeDescriptor) -> Self {
        Self::new(DescriptorKind::Promise {
            inner: Box::new(inner),
        })
    }

    pub fn map(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::new(DescriptorKind::Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::new(DescriptorKind::Literal { value })
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::literal(LiteralValue::String(value.into()))
    }

    pub fn bool_literal(value: bool) -> Self {
        Self::literal(LiteralValue::Boolean(value))
    }

    pub fn number_literal(value: f64) -> Self {
        Self::literal(LiteralValue::Number(value))
    }

    pub fn alias(name: impl Into<String>, target: Option<TypeDescriptor>) -> Self {
        Self::new(DescriptorKind::Alias {
            target: target.map(Box::new),
        })
        .named(name)
    }

    pub fn unresolved(text: impl Into<String>) -> Self {
        Self::new(DescriptorKind::Unresolved { text: text.into() })
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::new(DescriptorKind::Other).named(name)
    }

    /// Set the declared name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the trailing optional marker.
    pub fn with_optional(mut self, value: bool) -> Self {
        self.optional = value;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short name of the descriptor kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            DescriptorKind::Boolean => "boolean",
            DescriptorKind::Number => "number",
            DescriptorKind::String => "string",
            DescriptorKind::BigInt => "bigint",
            DescriptorKind::Null => "null",
            DescriptorKind::Undefined => "undefined",
            DescriptorKind::Void => "void",
            DescriptorKind::Array { .. } => "array",
            DescriptorKind::Tuple { .. } => "tuple",
            DescriptorKind::Union { .. } => "union",
            DescriptorKind::Object { .. } => "object",
            DescriptorKind::Interface { .. } => "interface",
            DescriptorKind::Class => "class",
            DescriptorKind::Promise { .. } => "promise",
            DescriptorKind::Map { .. } => "map",
            DescriptorKind::Literal { .. } => "literal",
            DescriptorKind::Alias { .. } => "alias",
            DescriptorKind::Unresolved { .. } => "unresolved",
            DescriptorKind::Other => "other",
        }
    }

    /// Whether this is one of the empty shapes (`null`, `undefined`, `void`).
    pub fn is_empty_kind(&self) -> bool {
        matches!(
            self.kind,
            DescriptorKind::Null | DescriptorKind::Undefined | DescriptorKind::Void
        )
    }

    /// Properties of an object or interface descriptor.
    pub fn properties(&self) -> Option<&[Property]> {
        match &self.kind {
            DescriptorKind::Object { properties } | DescriptorKind::Interface { properties } => {
                Some(properties)
            }
            _ => None,
        }
    }

    pub fn literal_value(&self) -> Option<&LiteralValue> {
        match &self.kind {
            DescriptorKind::Literal { value } => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DescriptorKind::Boolean => f.write_str("boolean"),
            DescriptorKind::Number => f.write_str("number"),
            DescriptorKind::String => f.write_str("string"),
            DescriptorKind::BigInt => f.write_str("bigint"),
            DescriptorKind::Null => f.write_str("null"),
            DescriptorKind::Undefined => f.write_str("undefined"),
            DescriptorKind::Void => f.write_str("void"),
            DescriptorKind::Literal { value } => write!(f, "{value}"),
            DescriptorKind::Unresolved { text } => f.write_str(text),
            _ if self.name.is_some() => f.write_str(self.name.as_deref().unwrap_or_default()),
            DescriptorKind::Array { element } => {
                if matches!(element.kind, DescriptorKind::Union { .. }) {
                    write!(f, "({element})[]")
                } else {
                    write!(f, "{element}[]")
                }
            }
            DescriptorKind::Tuple { elements } => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            DescriptorKind::Union { members } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            DescriptorKind::Object { properties } | DescriptorKind::Interface { properties } => {
                if properties.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    let marker = if prop.optional { "?" } else { "" };
                    write!(f, "{}{marker}: {}", prop.name, prop.ty)?;
                }
                f.write_str(" }")
            }
            DescriptorKind::Promise { inner } => write!(f, "Promise<{inner}>"),
            DescriptorKind::Map { key, value } => write!(f, "Map<{key}, {value}>"),
            DescriptorKind::Class => f.write_str("<anonymous class>"),
            DescriptorKind::Alias { .. } => f.write_str("<anonymous alias>"),
            DescriptorKind::Other => f.write_str("<unknown>"),
        }
    }
}
