//! Host value to value tree.

use tracing::warn;
use witbridge_core::{
    Error, HostValue, IntRepr, ListRepr, RecordSchema, Result, ResultSchema, Schema, TypedArray,
    VariantSchema,
};
use witbridge_wire::Value;

use crate::config::ConvertConfig;
use crate::matching::{
    accepts_missing, bigint, matches_schema, number_as_i64, number_as_u64, single_char,
};
use crate::path::{FieldPath, expected};

/// Converts host values into value trees.
#[derive(Clone, Debug, Default)]
pub struct Serializer {
    config: ConvertConfig,
}

/// Serialize with the default configuration.
pub fn serialize(value: &HostValue, schema: &Schema) -> Result<Value> {
    Serializer::new().serialize(value, schema)
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn serialize(&self, value: &HostValue, schema: &Schema) -> Result<Value> {
        Walk {
            config: &self.config,
            path: FieldPath::new(schema),
        }
        .value(value, schema)
    }
}

struct Walk<'a> {
    config: &'a ConvertConfig,
    path: FieldPath,
}

impl Walk<'_> {
    fn mismatch(&self, schema: &Schema, value: &HostValue) -> Error {
        Error::TypeMismatch {
            expected: expected(schema),
            found: value.to_string(),
            context: self.path.context(),
        }
    }

    fn no_match(&self, schema: &Schema, value: &HostValue) -> Error {
        Error::UnionNoMatch {
            value: value.to_string(),
            union: expected(schema),
            context: self.path.context(),
        }
    }

    fn small_int<T: TryFrom<i64>>(&self, value: &HostValue, schema: &Schema) -> Result<T> {
        number_as_i64(value)
            .and_then(|n| T::try_from(n).ok())
            .ok_or_else(|| self.mismatch(schema, value))
    }

    fn value(&mut self, value: &HostValue, schema: &Schema) -> Result<Value> {
        let leaf = match schema {
            Schema::Bool => match value {
                HostValue::Bool(b) => Value::Bool(*b),
                _ => return Err(self.mismatch(schema, value)),
            },
            Schema::S8 => Value::S8(self.small_int(value, schema)?),
            Schema::S16 => Value::S16(self.small_int(value, schema)?),
            Schema::S32 => Value::S32(self.small_int(value, schema)?),
            Schema::U8 => Value::U8(self.small_int(value, schema)?),
            Schema::U16 => Value::U16(self.small_int(value, schema)?),
            Schema::U32 => Value::U32(self.small_int(value, schema)?),
            Schema::S64 { repr } => {
                let n = match repr {
                    IntRepr::BigInt => bigint(value).and_then(|n| i64::try_from(n).ok()),
                    IntRepr::Number => number_as_i64(value),
                };
                Value::S64(n.ok_or_else(|| self.mismatch(schema, value))?)
            }
            Schema::U64 { repr } => {
                let n = match repr {
                    IntRepr::BigInt => bigint(value).and_then(|n| u64::try_from(n).ok()),
                    IntRepr::Number => number_as_u64(value),
                };
                Value::U64(n.ok_or_else(|| self.mismatch(schema, value))?)
            }
            Schema::F32 => match value {
                HostValue::Number(n) => Value::F32(*n as f32),
                _ => return Err(self.mismatch(schema, value)),
            },
            Schema::F64 => match value {
                HostValue::Number(n) => Value::F64(*n),
                _ => return Err(self.mismatch(schema, value)),
            },
            Schema::Char => {
                Value::Char(single_char(value).ok_or_else(|| self.mismatch(schema, value))?)
            }
            Schema::Str => match value {
                HostValue::String(s) => Value::String(s.clone()),
                _ => return Err(self.mismatch(schema, value)),
            },
            Schema::Handle(_) => match value {
                HostValue::Resource { uri, id } => Value::Handle {
                    uri: uri.clone(),
                    resource_id: *id,
                },
                _ => return Err(self.mismatch(schema, value)),
            },
            _ => return self.composite(value, schema),
        };
        Ok(leaf)
    }

    fn composite(&mut self, value: &HostValue, schema: &Schema) -> Result<Value> {
        match schema {
            Schema::List(list) => match (value, list.repr) {
                (HostValue::TypedArray(array), ListRepr::Typed(kind)) if array.kind() == kind => {
                    Ok(Value::List(typed_array_values(array)))
                }
                (HostValue::Map(entries), ListRepr::Map) => {
                    let Schema::Tuple(pair) = list.element.as_ref() else {
                        return Err(self.mismatch(schema, value));
                    };
                    let [key_schema, value_schema] = pair.items.as_slice() else {
                        return Err(self.mismatch(schema, value));
                    };
                    let mut items = Vec::with_capacity(entries.len());
                    for (i, (k, v)) in entries.iter().enumerate() {
                        self.path.push_index(i);
                        let k = self.value(k, key_schema)?;
                        let v = self.value(v, value_schema)?;
                        self.path.pop();
                        items.push(Value::Tuple(vec![k, v]));
                    }
                    Ok(Value::List(items))
                }
                (HostValue::Array(items), _) => {
                    Ok(Value::List(self.elements(items, &list.element)?))
                }
                (HostValue::TypedArray(array), ListRepr::Plain) => {
                    Ok(Value::List(self.elements(&array.to_host_values(), &list.element)?))
                }
                _ => Err(self.mismatch(schema, value)),
            },
            Schema::Tuple(tuple) => match value {
                HostValue::Undefined | HostValue::Null if tuple.unit.is_some() => {
                    Ok(Value::Tuple(Vec::new()))
                }
                HostValue::Array(items) if items.len() == tuple.items.len() => {
                    let mut values = Vec::with_capacity(items.len());
                    for (i, (item, item_schema)) in items.iter().zip(&tuple.items).enumerate() {
                        self.path.push_index(i);
                        values.push(self.value(item, item_schema)?);
                        self.path.pop();
                    }
                    Ok(Value::Tuple(values))
                }
                _ => Err(self.mismatch(schema, value)),
            },
            Schema::Option(option) => {
                if value.is_nullish() {
                    return Ok(Value::Option(None));
                }
                Ok(Value::some(self.value(value, &option.inner)?))
            }
            Schema::Record(record) => self.record(value, schema, record),
            Schema::Variant(variant) => self.variant(value, schema, variant),
            Schema::Enum(en) => {
                let Some(s) = value.as_str() else {
                    return Err(self.mismatch(schema, value));
                };
                let idx = en
                    .cases
                    .iter()
                    .position(|c| c == s)
                    .ok_or_else(|| self.no_match(schema, value))?;
                Ok(Value::Enum(case_index(idx)?))
            }
            Schema::Result(result) => self.result(value, schema, result),
            Schema::Flags(flags) => {
                let HostValue::Object(props) = value else {
                    return Err(self.mismatch(schema, value));
                };
                if let Some(unknown) = props.keys().find(|k| !flags.flags.contains(k)) {
                    return Err(Error::TypeMismatch {
                        expected: expected(schema),
                        found: format!("unknown flag `{unknown}`"),
                        context: self.path.context(),
                    });
                }
                let mut bits = Vec::with_capacity(flags.flags.len());
                for flag in &flags.flags {
                    let bit = match props.get(flag) {
                        None | Some(HostValue::Undefined) => false,
                        Some(HostValue::Bool(b)) => *b,
                        Some(other) => {
                            self.path.push_field(flag);
                            let err = self.mismatch(&Schema::Bool, other);
                            self.path.pop();
                            return Err(err);
                        }
                    };
                    bits.push(bit);
                }
                Ok(Value::Flags(bits))
            }
            _ => Err(Error::InternalInconsistency(format!(
                "{} is not a composite schema",
                schema.kind_name()
            ))),
        }
    }

    fn elements(&mut self, items: &[HostValue], element: &Schema) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            self.path.push_index(i);
            values.push(self.value(item, element)?);
            self.path.pop();
        }
        Ok(values)
    }

    fn record(
        &mut self,
        value: &HostValue,
        schema: &Schema,
        record: &RecordSchema,
    ) -> Result<Value> {
        let HostValue::Object(props) = value else {
            return Err(self.mismatch(schema, value));
        };
        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            self.path.push_field(&field.name);
            let converted = match props.get(&field.name) {
                Some(v) => self.value(v, &field.schema)?,
                None if accepts_missing(&field.schema) => {
                    self.value(&HostValue::Undefined, &field.schema)?
                }
                None => match zero_value(&field.schema).filter(|_| self.config.implicit_defaults) {
                    Some(zero) => {
                        warn!(
                            field = %field.name,
                            schema = %field.schema,
                            "missing field filled with its zero value"
                        );
                        zero
                    }
                    None => {
                        self.path.pop();
                        return Err(Error::MissingField {
                            field: field.name.clone(),
                            context: self.path.context(),
                        });
                    }
                },
            };
            self.path.pop();
            fields.push(converted);
        }
        Ok(Value::Record(fields))
    }

    fn variant(
        &mut self,
        value: &HostValue,
        schema: &Schema,
        variant: &VariantSchema,
    ) -> Result<Value> {
        if let Some(tagged) = &variant.tagged {
            let Some(tag) = value.get(&tagged.discriminant).and_then(HostValue::as_str) else {
                return Err(self.no_match(schema, value));
            };
            let idx = variant
                .cases
                .iter()
                .position(|c| c.name == tag)
                .ok_or_else(|| self.no_match(schema, value))?;
            let payload = match (&variant.cases[idx].payload, tagged.payload_fields.get(idx)) {
                (Some(payload_schema), Some(Some(field))) => {
                    let field_value = value.get(field).unwrap_or(&HostValue::Undefined);
                    self.path.push_field(field);
                    let converted = self.value(field_value, payload_schema)?;
                    self.path.pop();
                    Some(converted)
                }
                (None, _) => None,
                (Some(_), _) => {
                    return Err(Error::InternalInconsistency(format!(
                        "case `{tag}` has a payload but no payload field"
                    )));
                }
            };
            return Ok(Value::variant(case_index(idx)?, payload));
        }

        for (idx, case) in variant.cases.iter().enumerate() {
            match &case.payload {
                Some(payload) if matches_schema(value, payload) => {
                    let converted = self.value(value, payload)?;
                    return Ok(Value::variant(case_index(idx)?, Some(converted)));
                }
                None if value.is_nullish() => return Ok(Value::variant(case_index(idx)?, None)),
                _ => {}
            }
        }
        Err(self.no_match(schema, value))
    }

    fn result(
        &mut self,
        value: &HostValue,
        schema: &Schema,
        result: &ResultSchema,
    ) -> Result<Value> {
        let origin = &result.origin;
        let tag = value.get(origin.discriminant()).and_then(HostValue::as_str);
        let (side_schema, field, is_ok) = match tag {
            Some("ok") => (result.ok.as_deref(), origin.ok_field(), true),
            Some("err") => (result.err.as_deref(), origin.err_field(), false),
            _ => return Err(self.no_match(schema, value)),
        };
        let payload = match (side_schema, field) {
            (Some(side_schema), Some(field)) => {
                let field_value = value.get(field).unwrap_or(&HostValue::Undefined);
                self.path.push_field(field);
                let converted = self.value(field_value, side_schema)?;
                self.path.pop();
                Some(converted)
            }
            (Some(_), None) => {
                return Err(Error::InternalInconsistency(
                    "result side has a payload but no payload field".to_owned(),
                ));
            }
            (None, _) => None,
        };
        Ok(if is_ok {
            Value::ok(payload)
        } else {
            Value::err(payload)
        })
    }
}

fn case_index(idx: usize) -> Result<u32> {
    u32::try_from(idx)
        .map_err(|_| Error::InternalInconsistency(format!("case index {idx} overflows")))
}

/// Zero value of a `string`, `number`, `boolean` or `bigint` field.
fn zero_value(schema: &Schema) -> Option<Value> {
    match schema {
        Schema::Str => Some(Value::String(String::new())),
        Schema::F64 => Some(Value::F64(0.0)),
        Schema::Bool => Some(Value::Bool(false)),
        Schema::S64 {
            repr: IntRepr::BigInt,
        } => Some(Value::S64(0)),
        _ => None,
    }
}

fn typed_array_values(array: &TypedArray) -> Vec<Value> {
    match array {
        TypedArray::Int8(v) => v.iter().map(|&x| Value::S8(x)).collect(),
        TypedArray::Uint8(v) => v.iter().map(|&x| Value::U8(x)).collect(),
        TypedArray::Int16(v) => v.iter().map(|&x| Value::S16(x)).collect(),
        TypedArray::Uint16(v) => v.iter().map(|&x| Value::U16(x)).collect(),
        TypedArray::Int32(v) => v.iter().map(|&x| Value::S32(x)).collect(),
        TypedArray::Uint32(v) => v.iter().map(|&x| Value::U32(x)).collect(),
        TypedArray::BigInt64(v) => v.iter().map(|&x| Value::S64(x)).collect(),
        TypedArray::BigUint64(v) => v.iter().map(|&x| Value::U64(x)).collect(),
        TypedArray::Float32(v) => v.iter().map(|&x| Value::F32(x)).collect(),
        TypedArray::Float64(v) => v.iter().map(|&x| Value::F64(x)).collect(),
    }
}
