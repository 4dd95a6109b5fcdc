//! Value tree to host value. The structural mirror of serialization.

use indexmap::IndexMap;
use witbridge_core::{
    EmptyKind, Error, HostValue, IntRepr, ListRepr, RecordSchema, Result, ResultSchema, Schema,
    TypedArray, TypedArrayKind, VariantSchema,
};
use witbridge_wire::Value;

use crate::path::{FieldPath, expected};

/// Rebuild the host value of `value` as shaped by `schema`.
pub fn deserialize(value: &Value, schema: &Schema) -> Result<HostValue> {
    Walk {
        path: FieldPath::new(schema),
    }
    .value(value, schema)
}

struct Walk {
    path: FieldPath,
}

impl Walk {
    fn mismatch(&self, schema: &Schema, value: &Value) -> Error {
        Error::TypeMismatch {
            expected: expected(schema),
            found: value.kind_name().to_owned(),
            context: self.path.context(),
        }
    }

    fn value(&mut self, value: &Value, schema: &Schema) -> Result<HostValue> {
        let host = match (schema, value) {
            (Schema::Bool, Value::Bool(b)) => HostValue::Bool(*b),
            (Schema::S8, Value::S8(n)) => HostValue::Number((*n).into()),
            (Schema::S16, Value::S16(n)) => HostValue::Number((*n).into()),
            (Schema::S32, Value::S32(n)) => HostValue::Number((*n).into()),
            (Schema::U8, Value::U8(n)) => HostValue::Number((*n).into()),
            (Schema::U16, Value::U16(n)) => HostValue::Number((*n).into()),
            (Schema::U32, Value::U32(n)) => HostValue::Number((*n).into()),
            (Schema::S64 { repr }, Value::S64(n)) => match repr {
                IntRepr::BigInt => HostValue::BigInt((*n).into()),
                IntRepr::Number => HostValue::Number(*n as f64),
            },
            (Schema::U64 { repr }, Value::U64(n)) => match repr {
                IntRepr::BigInt => HostValue::BigInt((*n).into()),
                IntRepr::Number => HostValue::Number(*n as f64),
            },
            (Schema::F32, Value::F32(n)) => HostValue::Number((*n).into()),
            (Schema::F64, Value::F64(n)) => HostValue::Number(*n),
            (Schema::Char, Value::Char(c)) => HostValue::String(c.to_string()),
            (Schema::Str, Value::String(s)) => HostValue::String(s.clone()),
            (Schema::Handle(_), Value::Handle { uri, resource_id }) => HostValue::Resource {
                uri: uri.clone(),
                id: *resource_id,
            },
            (Schema::List(list), Value::List(items)) => match list.repr {
                ListRepr::Typed(kind) => HostValue::TypedArray(
                    typed_array(kind, items).ok_or_else(|| self.mismatch(schema, value))?,
                ),
                ListRepr::Map => {
                    let Schema::Tuple(pair) = list.element.as_ref() else {
                        return Err(self.mismatch(schema, value));
                    };
                    let [key_schema, value_schema] = pair.items.as_slice() else {
                        return Err(self.mismatch(schema, value));
                    };
                    let mut entries = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        self.path.push_index(i);
                        let Value::Tuple(kv) = item else {
                            return Err(self.mismatch(&list.element, item));
                        };
                        let [k, v] = kv.as_slice() else {
                            return Err(self.mismatch(&list.element, item));
                        };
                        entries.push((self.value(k, key_schema)?, self.value(v, value_schema)?));
                        self.path.pop();
                    }
                    HostValue::Map(entries)
                }
                ListRepr::Plain => {
                    let mut elements = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        self.path.push_index(i);
                        elements.push(self.value(item, &list.element)?);
                        self.path.pop();
                    }
                    HostValue::Array(elements)
                }
            },
            (Schema::Tuple(tuple), Value::Tuple(items)) => match tuple.unit {
                Some(EmptyKind::Null) if items.is_empty() => HostValue::Null,
                Some(_) if items.is_empty() => HostValue::Undefined,
                _ if items.len() == tuple.items.len() => {
                    let mut elements = Vec::with_capacity(items.len());
                    for (i, (item, item_schema)) in items.iter().zip(&tuple.items).enumerate() {
                        self.path.push_index(i);
                        elements.push(self.value(item, item_schema)?);
                        self.path.pop();
                    }
                    HostValue::Array(elements)
                }
                _ => return Err(self.mismatch(schema, value)),
            },
            (Schema::Option(option), Value::Option(inner)) => match inner {
                Some(inner) => self.value(inner, &option.inner)?,
                None => empty_value(option.empty),
            },
            (Schema::Record(record), Value::Record(fields)) => {
                self.record(value, schema, record, fields)?
            }
            (Schema::Variant(variant), Value::Variant { case_idx, case_value }) => {
                self.variant(value, schema, variant, *case_idx, case_value.as_deref())?
            }
            (Schema::Enum(en), Value::Enum(idx)) => {
                let case = usize::try_from(*idx)
                    .ok()
                    .and_then(|i| en.cases.get(i))
                    .ok_or_else(|| self.mismatch(schema, value))?;
                HostValue::String(case.clone())
            }
            (Schema::Result(result), Value::Result(payload)) => self.result(result, payload)?,
            (Schema::Flags(flags), Value::Flags(bits)) => {
                if bits.len() != flags.flags.len() {
                    return Err(self.mismatch(schema, value));
                }
                HostValue::object(
                    flags
                        .flags
                        .iter()
                        .zip(bits)
                        .map(|(flag, bit)| (flag.clone(), HostValue::Bool(*bit))),
                )
            }
            _ => return Err(self.mismatch(schema, value)),
        };
        Ok(host)
    }

    fn record(
        &mut self,
        value: &Value,
        schema: &Schema,
        record: &RecordSchema,
        fields: &[Value],
    ) -> Result<HostValue> {
        if fields.len() != record.fields.len() {
            return Err(self.mismatch(schema, value));
        }
        let mut props = IndexMap::with_capacity(fields.len());
        for (field, field_value) in record.fields.iter().zip(fields) {
            self.path.push_field(&field.name);
            let host = self.value(field_value, &field.schema)?;
            self.path.pop();
            // Absent options become absent keys, except an explicit `null`.
            if matches!(host, HostValue::Undefined) {
                continue;
            }
            props.insert(field.name.clone(), host);
        }
        Ok(HostValue::Object(props))
    }

    fn variant(
        &mut self,
        value: &Value,
        schema: &Schema,
        variant: &VariantSchema,
        case_idx: u32,
        payload: Option<&Value>,
    ) -> Result<HostValue> {
        let idx = usize::try_from(case_idx)
            .ok()
            .filter(|&i| i < variant.cases.len())
            .ok_or_else(|| self.mismatch(schema, value))?;
        let case = &variant.cases[idx];

        let payload = match (&case.payload, payload) {
            (Some(payload_schema), Some(payload)) => Some(self.value(payload, payload_schema)?),
            (None, None) => None,
            _ => return Err(self.mismatch(schema, value)),
        };

        let Some(tagged) = &variant.tagged else {
            return Ok(payload.unwrap_or(HostValue::Undefined));
        };
        let mut props = IndexMap::new();
        props.insert(
            tagged.discriminant.clone(),
            HostValue::String(case.name.clone()),
        );
        if let (Some(payload), Some(Some(field))) = (payload, tagged.payload_fields.get(idx))
            && !matches!(payload, HostValue::Undefined)
        {
            props.insert(field.clone(), payload);
        }
        Ok(HostValue::Object(props))
    }

    fn result(
        &mut self,
        result: &ResultSchema,
        payload: &std::result::Result<Option<Box<Value>>, Option<Box<Value>>>,
    ) -> Result<HostValue> {
        let origin = &result.origin;
        let (tag, side_schema, field, payload) = match payload {
            Ok(v) => ("ok", result.ok.as_deref(), origin.ok_field(), v.as_deref()),
            Err(v) => ("err", result.err.as_deref(), origin.err_field(), v.as_deref()),
        };
        let mut props = IndexMap::new();
        props.insert(
            origin.discriminant().to_owned(),
            HostValue::String(tag.to_owned()),
        );
        match (side_schema, field, payload) {
            (Some(side_schema), Some(field), Some(payload)) => {
                self.path.push_field(field);
                let host = self.value(payload, side_schema)?;
                self.path.pop();
                if !matches!(host, HostValue::Undefined) {
                    props.insert(field.to_owned(), host);
                }
            }
            (None, _, None) => {}
            _ => {
                return Err(Error::TypeMismatch {
                    expected: expected(&Schema::Result(result.clone())),
                    found: format!("{tag} side with mismatched payload"),
                    context: self.path.context(),
                });
            }
        }
        Ok(HostValue::Object(props))
    }
}

/// Host value of an absent option.
fn empty_value(kind: EmptyKind) -> HostValue {
    match kind {
        EmptyKind::Null => HostValue::Null,
        EmptyKind::Undefined | EmptyKind::Void | EmptyKind::OptionalMarker => {
            HostValue::Undefined
        }
    }
}

fn collect<T>(items: &[Value], get: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    items.iter().map(get).collect()
}

fn typed_array(kind: TypedArrayKind, items: &[Value]) -> Option<TypedArray> {
    Some(match kind {
        TypedArrayKind::Int8 => TypedArray::Int8(collect(items, |v| match v {
            Value::S8(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Uint8 => TypedArray::Uint8(collect(items, |v| match v {
            Value::U8(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Int16 => TypedArray::Int16(collect(items, |v| match v {
            Value::S16(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Uint16 => TypedArray::Uint16(collect(items, |v| match v {
            Value::U16(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Int32 => TypedArray::Int32(collect(items, |v| match v {
            Value::S32(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Uint32 => TypedArray::Uint32(collect(items, |v| match v {
            Value::U32(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::BigInt64 => TypedArray::BigInt64(collect(items, |v| match v {
            Value::S64(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::BigUint64 => TypedArray::BigUint64(collect(items, |v| match v {
            Value::U64(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Float32 => TypedArray::Float32(collect(items, |v| match v {
            Value::F32(x) => Some(*x),
            _ => None,
        })?),
        TypedArrayKind::Float64 => TypedArray::Float64(collect(items, |v| match v {
            Value::F64(x) => Some(*x),
            _ => None,
        })?),
    })
}
