//! Structural matching of host values against schemas.
//!
//! Used to pick the case of an untagged variant: the first case whose payload schema
//! the value matches wins.

use witbridge_core::{EmptyKind, HostValue, IntRepr, ListRepr, Schema};

/// Whether `value` has the shape `schema` describes.
pub fn matches_schema(value: &HostValue, schema: &Schema) -> bool {
    match schema {
        Schema::Bool => matches!(value, HostValue::Bool(_)),
        Schema::S8 => number_as_i64(value).is_some_and(|n| i8::try_from(n).is_ok()),
        Schema::S16 => number_as_i64(value).is_some_and(|n| i16::try_from(n).is_ok()),
        Schema::S32 => number_as_i64(value).is_some_and(|n| i32::try_from(n).is_ok()),
        Schema::U8 => number_as_i64(value).is_some_and(|n| u8::try_from(n).is_ok()),
        Schema::U16 => number_as_i64(value).is_some_and(|n| u16::try_from(n).is_ok()),
        Schema::U32 => number_as_i64(value).is_some_and(|n| u32::try_from(n).is_ok()),
        Schema::S64 { repr } => match repr {
            IntRepr::BigInt => bigint(value).is_some_and(|n| i64::try_from(n).is_ok()),
            IntRepr::Number => number_as_i64(value).is_some(),
        },
        Schema::U64 { repr } => match repr {
            IntRepr::BigInt => bigint(value).is_some_and(|n| u64::try_from(n).is_ok()),
            IntRepr::Number => number_as_u64(value).is_some(),
        },
        Schema::F32 | Schema::F64 => matches!(value, HostValue::Number(_)),
        Schema::Char => single_char(value).is_some(),
        Schema::Str => matches!(value, HostValue::String(_)),
        Schema::List(list) => match (value, list.repr) {
            (HostValue::TypedArray(array), ListRepr::Typed(kind)) => array.kind() == kind,
            (HostValue::Map(entries), ListRepr::Map) => match list.element.as_ref() {
                Schema::Tuple(pair) if pair.items.len() == 2 => entries.iter().all(|(k, v)| {
                    matches_schema(k, &pair.items[0]) && matches_schema(v, &pair.items[1])
                }),
                _ => false,
            },
            (HostValue::Array(items), ListRepr::Plain | ListRepr::Typed(_)) => {
                items.iter().all(|item| matches_schema(item, &list.element))
            }
            _ => false,
        },
        Schema::Tuple(tuple) => match value {
            HostValue::Undefined | HostValue::Null => tuple.unit.is_some(),
            HostValue::Array(items) => {
                items.len() == tuple.items.len()
                    && items
                        .iter()
                        .zip(&tuple.items)
                        .all(|(item, schema)| matches_schema(item, schema))
            }
            _ => false,
        },
        Schema::Option(option) => value.is_nullish() || matches_schema(value, &option.inner),
        Schema::Record(record) => {
            let HostValue::Object(props) = value else {
                return false;
            };
            let fields_match = record.fields.iter().all(|field| match props.get(&field.name) {
                Some(v) => matches_schema(v, &field.schema),
                None => accepts_missing(&field.schema),
            });
            let no_unknown_keys = props.iter().all(|(key, v)| {
                matches!(v, HostValue::Undefined) || record.fields.iter().any(|f| &f.name == key)
            });
            fields_match && no_unknown_keys
        }
        Schema::Variant(variant) => match &variant.tagged {
            Some(tagged) => value
                .get(&tagged.discriminant)
                .and_then(HostValue::as_str)
                .is_some_and(|tag| variant.cases.iter().any(|c| c.name == tag)),
            None => variant.cases.iter().any(|case| match &case.payload {
                Some(payload) => matches_schema(value, payload),
                None => value.is_nullish(),
            }),
        },
        Schema::Enum(en) => value
            .as_str()
            .is_some_and(|s| en.cases.iter().any(|c| c == s)),
        Schema::Result(result) => value
            .get(result.origin.discriminant())
            .and_then(HostValue::as_str)
            .is_some_and(|tag| tag == "ok" || tag == "err"),
        Schema::Flags(flags) => match value {
            HostValue::Object(props) => props.iter().all(|(key, v)| {
                matches!(v, HostValue::Bool(_) | HostValue::Undefined)
                    && flags.flags.iter().any(|f| f == key)
            }),
            _ => false,
        },
        Schema::Handle(_) => matches!(value, HostValue::Resource { .. }),
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Whether a record field of this schema may be absent from the host object.
///
/// A `null` field must be present: it reads back as an explicit `null`, never as an
/// absent key.
pub(crate) fn accepts_missing(schema: &Schema) -> bool {
    match schema {
        Schema::Option(option) => option.empty != EmptyKind::Null,
        Schema::Tuple(tuple) => tuple.unit.is_some_and(|kind| kind != EmptyKind::Null),
        _ => false,
    }
}

/// An integral host number inside the `i64` range.
pub(crate) fn number_as_i64(value: &HostValue) -> Option<i64> {
    let HostValue::Number(n) = value else {
        return None;
    };
    if n.fract() != 0.0 || !(-TWO_POW_63..TWO_POW_63).contains(n) {
        return None;
    }
    Some(*n as i64)
}

pub(crate) fn number_as_u64(value: &HostValue) -> Option<u64> {
    let HostValue::Number(n) = value else {
        return None;
    };
    if n.fract() != 0.0 || !(0.0..TWO_POW_64).contains(n) {
        return None;
    }
    Some(*n as u64)
}

pub(crate) fn bigint(value: &HostValue) -> Option<i128> {
    match value {
        HostValue::BigInt(n) => Some(*n),
        _ => None,
    }
}

pub(crate) fn single_char(value: &HostValue) -> Option<char> {
    let s = value.as_str()?;
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}
