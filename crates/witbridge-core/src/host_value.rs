//! Host runtime values.
//!
//! Mirrors the host's duck-typed value space closely enough to round-trip every shape
//! the mapper can produce a schema for: `undefined` and `null` stay distinct, numbers
//! and bigints stay distinct, and fixed-width buffers keep their width.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::utils::format_number;

/// A host runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// The host's "no value".
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(Vec<HostValue>),
    TypedArray(TypedArray),
    /// Plain object; properties keep insertion order.
    Object(IndexMap<String, HostValue>),
    /// Native key-value collection; entries keep insertion order.
    Map(Vec<(HostValue, HostValue)>),
    /// Reference to a resource owned by the component runtime.
    Resource { uri: String, id: u64 },
}

/// Element width of a fixed-width numeric buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    BigInt64,
    BigUint64,
    Float32,
    Float64,
}

impl TypedArrayKind {
    pub const ALL: [Self; 10] = [
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::BigInt64,
        Self::BigUint64,
        Self::Float32,
        Self::Float64,
    ];

    /// Resolve a host array alias name (`Int8Array`, `Float64Array`, ...).
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Host name of the buffer type.
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8Array",
            Self::Uint8 => "Uint8Array",
            Self::Int16 => "Int16Array",
            Self::Uint16 => "Uint16Array",
            Self::Int32 => "Int32Array",
            Self::Uint32 => "Uint32Array",
            Self::BigInt64 => "BigInt64Array",
            Self::BigUint64 => "BigUint64Array",
            Self::Float32 => "Float32Array",
            Self::Float64 => "Float64Array",
        }
    }

    /// Whether elements are bigints rather than numbers.
    pub fn is_wide(self) -> bool {
        matches!(self, Self::BigInt64 | Self::BigUint64)
    }
}

/// A fixed-width numeric buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    BigInt64(Vec<i64>),
    BigUint64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    pub fn kind(&self) -> TypedArrayKind {
        match self {
            Self::Int8(_) => TypedArrayKind::Int8,
            Self::Uint8(_) => TypedArrayKind::Uint8,
            Self::Int16(_) => TypedArrayKind::Int16,
            Self::Uint16(_) => TypedArrayKind::Uint16,
            Self::Int32(_) => TypedArrayKind::Int32,
            Self::Uint32(_) => TypedArrayKind::Uint32,
            Self::BigInt64(_) => TypedArrayKind::BigInt64,
            Self::BigUint64(_) => TypedArrayKind::BigUint64,
            Self::Float32(_) => TypedArrayKind::Float32,
            Self::Float64(_) => TypedArrayKind::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::BigInt64(v) => v.len(),
            Self::BigUint64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements as host values (numbers, or bigints for the wide kinds).
    pub fn to_host_values(&self) -> Vec<HostValue> {
        match self {
            Self::Int8(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Uint8(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Int16(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Uint16(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Int32(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Uint32(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::BigInt64(v) => v.iter().map(|&x| HostValue::BigInt(x.into())).collect(),
            Self::BigUint64(v) => v.iter().map(|&x| HostValue::BigInt(x.into())).collect(),
            Self::Float32(v) => v.iter().map(|&x| HostValue::Number(x.into())).collect(),
            Self::Float64(v) => v.iter().map(|&x| HostValue::Number(x)).collect(),
        }
    }
}

impl HostValue {
    /// Build an object from `(key, value)` pairs, preserving their order.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, HostValue)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Whether this is `null` or `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Property lookup on an object; `None` for non-objects and missing keys.
    pub fn get(&self, key: &str) -> Option<&HostValue> {
        match self {
            Self::Object(props) => props.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Host type label, as the host's `typeof`/constructor name would report it.
    pub fn type_label(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::BigInt(_) => "bigint",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::TypedArray(array) => array.kind().type_name(),
            Self::Object(_) => "object",
            Self::Map(_) => "Map",
            Self::Resource { .. } => "resource",
        }
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(value: Vec<HostValue>) -> Self {
        Self::Array(value)
    }
}

impl From<TypedArray> for HostValue {
    fn from(value: TypedArray) -> Self {
        Self::TypedArray(value)
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::BigInt(n) => write!(f, "{n}n"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                write_list(f, items, |f, item| write!(f, "{item}"))?;
                f.write_str("]")
            }
            Self::TypedArray(array) => {
                write!(f, "{} [", array.kind().type_name())?;
                write_list(f, array.to_host_values(), |f, item| write!(f, "{item}"))?;
                f.write_str("]")
            }
            Self::Object(props) => {
                if props.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                write_list(f, props, |f, (k, v)| write!(f, "{k}: {v}"))?;
                f.write_str(" }")
            }
            Self::Map(entries) => {
                if entries.is_empty() {
                    return f.write_str("Map {}");
                }
                f.write_str("Map { ")?;
                write_list(f, entries, |f, (k, v)| write!(f, "{k} => {v}"))?;
                f.write_str(" }")
            }
            Self::Resource { uri, id } => write!(f, "resource({uri}#{id})"),
        }
    }
}
