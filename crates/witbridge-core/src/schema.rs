//! Interchange type schemas.
//!
//! The canonical structural algebra both sides of the boundary agree on. Besides the
//! shape itself, a schema carries host-side representation tags (typed-buffer width,
//! map annotation, which empty shape an option replaces, result origin, tagged-union
//! metadata, wide-integer flag) so the value layer can rebuild the exact host shape.
//!
//! Schemas are trees: self-referential shapes are rejected during derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host_value::TypedArrayKind;

/// Optional name and owner of a composite schema.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl TypeName {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            owner: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Host representation of a 64-bit integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntRepr {
    /// Plain host number.
    #[default]
    Number,
    /// Wide-integer (bigint) host value.
    BigInt,
}

/// Which empty shape an `option` stands in for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyKind {
    Null,
    Undefined,
    Void,
    /// Trailing `?` on a field or parameter.
    OptionalMarker,
}

/// Host representation of a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListRepr {
    #[default]
    Plain,
    /// Fixed-width numeric buffer.
    Typed(TypedArrayKind),
    /// List of 2-tuples standing in for a native key-value collection.
    Map,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceMode {
    Owned,
    Borrowed,
}

/// An interchange type schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Schema {
    Bool,
    S8,
    S16,
    S32,
    S64 {
        #[serde(default)]
        repr: IntRepr,
    },
    U8,
    U16,
    U32,
    U64 {
        #[serde(default)]
        repr: IntRepr,
    },
    F32,
    F64,
    Char,
    Str,
    List(ListSchema),
    Tuple(TupleSchema),
    Option(OptionSchema),
    Record(RecordSchema),
    Variant(VariantSchema),
    Enum(EnumSchema),
    Result(ResultSchema),
    Flags(FlagsSchema),
    Handle(HandleSchema),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub element: Box<Schema>,
    #[serde(default)]
    pub repr: ListRepr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub items: Vec<Schema>,
    /// Set on zero-arity tuples that stand in for `null`, `undefined` or `void`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<EmptyKind>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub inner: Box<Schema>,
    pub empty: EmptyKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Schema>,
}

/// Metadata of a union whose members share a literal discriminant field.
///
/// Case `i` of the variant is selected by `discriminant == cases[i].name`; its payload
/// lives in `payload_fields[i]` (absent for tag-only members).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedUnion {
    pub discriminant: String,
    pub payload_fields: Vec<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    /// Cases in declaration order.
    pub cases: Vec<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagged: Option<TaggedUnion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub cases: Vec<String>,
}

/// Where a result schema came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultOrigin {
    /// The built-in `{ tag: "ok", val } | { tag: "err", val }` shape.
    Inbuilt,
    /// A user-declared two-case ok/err union; keeps its own field names.
    Custom {
        discriminant: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ok_field: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        err_field: Option<String>,
    },
}

/// Discriminant field of the built-in result shape.
pub const INBUILT_RESULT_TAG: &str = "tag";
/// Payload field of the built-in result shape.
pub const INBUILT_RESULT_VALUE: &str = "val";

impl ResultOrigin {
    pub fn discriminant(&self) -> &str {
        match self {
            Self::Inbuilt => INBUILT_RESULT_TAG,
            Self::Custom { discriminant, .. } => discriminant,
        }
    }

    /// Payload field of the `ok` side, if that side carries a payload.
    pub fn ok_field(&self) -> Option<&str> {
        match self {
            Self::Inbuilt => Some(INBUILT_RESULT_VALUE),
            Self::Custom { ok_field, .. } => ok_field.as_deref(),
        }
    }

    /// Payload field of the `err` side, if that side carries a payload.
    pub fn err_field(&self) -> Option<&str> {
        match self {
            Self::Inbuilt => Some(INBUILT_RESULT_VALUE),
            Self::Custom { err_field, .. } => err_field.as_deref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResultSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Box<Schema>>,
    pub origin: ResultOrigin,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagsSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub flags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleSchema {
    #[serde(flatten)]
    pub type_name: TypeName,
    pub resource_id: u64,
    pub mode: ResourceMode,
}

impl Schema {
    pub fn list(element: Schema) -> Self {
        Self::List(ListSchema {
            type_name: TypeName::anonymous(),
            element: Box::new(element),
            repr: ListRepr::Plain,
        })
    }

    /// Numeric list reconstructed as the given fixed-width buffer.
    pub fn typed_list(kind: TypedArrayKind) -> Self {
        Self::List(ListSchema {
            type_name: TypeName::anonymous(),
            element: Box::new(Self::typed_array_element(kind)),
            repr: ListRepr::Typed(kind),
        })
    }

    /// List of key/value tuples reconstructed as a native map.
    pub fn map(key: Schema, value: Schema) -> Self {
        Self::List(ListSchema {
            type_name: TypeName::anonymous(),
            element: Box::new(Self::tuple(vec![key, value])),
            repr: ListRepr::Map,
        })
    }

    pub fn tuple(items: Vec<Schema>) -> Self {
        Self::Tuple(TupleSchema {
            type_name: TypeName::anonymous(),
            items,
            unit: None,
        })
    }

    /// Zero-arity tuple standing in for an empty host shape.
    pub fn unit(kind: EmptyKind) -> Self {
        Self::Tuple(TupleSchema {
            type_name: TypeName::anonymous(),
            items: Vec::new(),
            unit: Some(kind),
        })
    }

    pub fn option(inner: Schema, empty: EmptyKind) -> Self {
        Self::Option(OptionSchema {
            type_name: TypeName::anonymous(),
            inner: Box::new(inner),
            empty,
        })
    }

    pub fn record(type_name: TypeName, fields: Vec<Field>) -> Self {
        Self::Record(RecordSchema { type_name, fields })
    }

    pub fn variant(type_name: TypeName, cases: Vec<Case>) -> Self {
        Self::Variant(VariantSchema {
            type_name,
            cases,
            tagged: None,
        })
    }

    pub fn enumeration(type_name: TypeName, cases: Vec<String>) -> Self {
        Self::Enum(EnumSchema { type_name, cases })
    }

    pub fn flags(type_name: TypeName, flags: Vec<String>) -> Self {
        Self::Flags(FlagsSchema { type_name, flags })
    }

    /// Element schema of a fixed-width buffer kind.
    pub fn typed_array_element(kind: TypedArrayKind) -> Self {
        match kind {
            TypedArrayKind::Int8 => Self::S8,
            TypedArrayKind::Uint8 => Self::U8,
            TypedArrayKind::Int16 => Self::S16,
            TypedArrayKind::Uint16 => Self::U16,
            TypedArrayKind::Int32 => Self::S32,
            TypedArrayKind::Uint32 => Self::U32,
            TypedArrayKind::BigInt64 => Self::S64 {
                repr: IntRepr::BigInt,
            },
            TypedArrayKind::BigUint64 => Self::U64 {
                repr: IntRepr::BigInt,
            },
            TypedArrayKind::Float32 => Self::F32,
            TypedArrayKind::Float64 => Self::F64,
        }
    }

    pub fn is_option(&self) -> bool {
        matches!(self, Self::Option(_))
    }

    /// Name and owner of a composite schema; `None` for primitives.
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Self::List(s) => Some(&s.type_name),
            Self::Tuple(s) => Some(&s.type_name),
            Self::Option(s) => Some(&s.type_name),
            Self::Record(s) => Some(&s.type_name),
            Self::Variant(s) => Some(&s.type_name),
            Self::Enum(s) => Some(&s.type_name),
            Self::Result(s) => Some(&s.type_name),
            Self::Flags(s) => Some(&s.type_name),
            Self::Handle(s) => Some(&s.type_name),
            _ => None,
        }
    }

    pub fn type_name_mut(&mut self) -> Option<&mut TypeName> {
        match self {
            Self::List(s) => Some(&mut s.type_name),
            Self::Tuple(s) => Some(&mut s.type_name),
            Self::Option(s) => Some(&mut s.type_name),
            Self::Record(s) => Some(&mut s.type_name),
            Self::Variant(s) => Some(&mut s.type_name),
            Self::Enum(s) => Some(&mut s.type_name),
            Self::Result(s) => Some(&mut s.type_name),
            Self::Flags(s) => Some(&mut s.type_name),
            Self::Handle(s) => Some(&mut s.type_name),
            _ => None,
        }
    }

    /// Declared name of a composite schema.
    pub fn name(&self) -> Option<&str> {
        self.type_name().and_then(|n| n.name.as_deref())
    }

    /// Short kind name, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::S8 => "s8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::S64 { .. } => "s64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 { .. } => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::Str => "string",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Option(_) => "option",
            Self::Record(_) => "record",
            Self::Variant(_) => "variant",
            Self::Enum(_) => "enum",
            Self::Result(_) => "result",
            Self::Flags(_) => "flags",
            Self::Handle(_) => "handle",
        }
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, keyword: &str, type_name: &TypeName) -> fmt::Result {
    f.write_str(keyword)?;
    if let Some(name) = &type_name.name {
        write!(f, " {name}")?;
    }
    Ok(())
}

fn write_joined<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    Ok(())
}

/// One-line WIT-like rendering: `record user { name: string, age: option<f64> }`.
impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(list) => write!(f, "list<{}>", list.element),
            Self::Tuple(tuple) => {
                f.write_str("tuple<")?;
                write_joined(f, &tuple.items, |f, item| write!(f, "{item}"))?;
                f.write_str(">")
            }
            Self::Option(option) => write!(f, "option<{}>", option.inner),
            Self::Result(result) => match (&result.ok, &result.err) {
                (None, None) => f.write_str("result"),
                (Some(ok), None) => write!(f, "result<{ok}>"),
                (None, Some(err)) => write!(f, "result<_, {err}>"),
                (Some(ok), Some(err)) => write!(f, "result<{ok}, {err}>"),
            },
            Self::Record(record) => {
                write_names(f, "record", &record.type_name)?;
                f.write_str(" { ")?;
                write_joined(f, &record.fields, |f, field| {
                    write!(f, "{}: {}", field.name, field.schema)
                })?;
                f.write_str(" }")
            }
            Self::Variant(variant) => {
                write_names(f, "variant", &variant.type_name)?;
                f.write_str(" { ")?;
                write_joined(f, &variant.cases, |f, case| match &case.payload {
                    Some(payload) => write!(f, "{}({payload})", case.name),
                    None => f.write_str(&case.name),
                })?;
                f.write_str(" }")
            }
            Self::Enum(en) => {
                write_names(f, "enum", &en.type_name)?;
                f.write_str(" { ")?;
                write_joined(f, &en.cases, |f, case| f.write_str(case))?;
                f.write_str(" }")
            }
            Self::Flags(flags) => {
                write_names(f, "flags", &flags.type_name)?;
                f.write_str(" { ")?;
                write_joined(f, &flags.flags, |f, flag| f.write_str(flag))?;
                f.write_str(" }")
            }
            Self::Handle(handle) => match handle.mode {
                ResourceMode::Owned => write!(f, "own<{}>", handle.resource_id),
                ResourceMode::Borrowed => write!(f, "borrow<{}>", handle.resource_id),
            },
            primitive => f.write_str(primitive.kind_name()),
        }
    }
}
