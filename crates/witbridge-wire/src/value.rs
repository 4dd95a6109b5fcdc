//! The value tree.

use serde::{Deserialize, Serialize};

/// One concrete value, shaped like its schema.
///
/// Records, tuples and variants are positional: field and case order is the schema's
/// declaration order, never looked up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Record(Vec<Value>),
    Variant {
        case_idx: u32,
        case_value: Option<Box<Value>>,
    },
    Enum(u32),
    Flags(Vec<bool>),
    Option(Option<Box<Value>>),
    Result(Result<Option<Box<Value>>, Option<Box<Value>>>),
    Handle {
        uri: String,
        resource_id: u64,
    },
}

impl Value {
    /// Short kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::S8(_) => "s8",
            Self::S16(_) => "s16",
            Self::S32(_) => "s32",
            Self::S64(_) => "s64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Record(_) => "record",
            Self::Variant { .. } => "variant",
            Self::Enum(_) => "enum",
            Self::Flags(_) => "flags",
            Self::Option(_) => "option",
            Self::Result(_) => "result",
            Self::Handle { .. } => "handle",
        }
    }

    pub fn some(value: Value) -> Self {
        Self::Option(Some(Box::new(value)))
    }

    pub fn ok(value: Option<Value>) -> Self {
        Self::Result(Ok(value.map(Box::new)))
    }

    pub fn err(value: Option<Value>) -> Self {
        Self::Result(Err(value.map(Box::new)))
    }

    pub fn variant(case_idx: u32, case_value: Option<Value>) -> Self {
        Self::Variant {
            case_idx,
            case_value: case_value.map(Box::new),
        }
    }
}
