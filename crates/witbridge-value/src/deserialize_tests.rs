use witbridge_core::{
    Case, EmptyKind, Error, Field, FlagsSchema, HostValue, IntRepr, ResultOrigin, ResultSchema,
    Schema, TaggedUnion, TypeName, TypedArray, TypedArrayKind, VariantSchema,
};
use witbridge_wire::Value;

use crate::deserialize;

fn field(name: &str, schema: Schema) -> Field {
    Field {
        name: name.into(),
        schema,
    }
}

#[test]
fn absent_option_follows_its_empty_kind() {
    let none = Value::Option(None);
    let option = |kind| Schema::option(Schema::Str, kind);

    assert_eq!(
        deserialize(&none, &option(EmptyKind::Null)).unwrap(),
        HostValue::Null
    );
    for kind in [
        EmptyKind::Undefined,
        EmptyKind::Void,
        EmptyKind::OptionalMarker,
    ] {
        assert_eq!(deserialize(&none, &option(kind)).unwrap(), HostValue::Undefined);
    }
    assert_eq!(
        deserialize(
            &Value::some(Value::String("x".into())),
            &option(EmptyKind::Null)
        )
        .unwrap(),
        HostValue::from("x")
    );
}

#[test]
fn unit_tuples_become_empty_shapes() {
    let empty = Value::Tuple(vec![]);
    assert_eq!(
        deserialize(&empty, &Schema::unit(EmptyKind::Void)).unwrap(),
        HostValue::Undefined
    );
    assert_eq!(
        deserialize(&empty, &Schema::unit(EmptyKind::Null)).unwrap(),
        HostValue::Null
    );
    assert_eq!(
        deserialize(&empty, &Schema::tuple(vec![])).unwrap(),
        HostValue::Array(vec![])
    );
}

#[test]
fn record_omits_absent_options_but_keeps_null() {
    let schema = Schema::record(
        TypeName::named("profile"),
        vec![
            field("name", Schema::Str),
            field("nick", Schema::option(Schema::Str, EmptyKind::OptionalMarker)),
            field("bio", Schema::option(Schema::Str, EmptyKind::Undefined)),
            field("avatar", Schema::option(Schema::Str, EmptyKind::Null)),
        ],
    );
    let value = Value::Record(vec![
        Value::String("ada".into()),
        Value::Option(None),
        Value::Option(None),
        Value::Option(None),
    ]);

    let host = deserialize(&value, &schema).unwrap();
    insta::assert_snapshot!(host, @r#"{ name: "ada", avatar: null }"#);
}

#[test]
fn wide_integer_selection_is_schema_directed() {
    let wide = Schema::S64 {
        repr: IntRepr::BigInt,
    };
    let narrow = Schema::S64 {
        repr: IntRepr::Number,
    };
    assert_eq!(
        deserialize(&Value::S64(-3), &wide).unwrap(),
        HostValue::BigInt(-3)
    );
    assert_eq!(
        deserialize(&Value::S64(-3), &narrow).unwrap(),
        HostValue::Number(-3.0)
    );
    assert_eq!(
        deserialize(&Value::U64(9), &Schema::U64 { repr: IntRepr::BigInt }).unwrap(),
        HostValue::BigInt(9)
    );
}

#[test]
fn typed_lists_rebuild_buffers() {
    let schema = Schema::typed_list(TypedArrayKind::Float32);
    let value = Value::List(vec![Value::F32(0.5), Value::F32(-2.0)]);
    assert_eq!(
        deserialize(&value, &schema).unwrap(),
        HostValue::TypedArray(TypedArray::Float32(vec![0.5, -2.0]))
    );

    let value = Value::List(vec![Value::F64(0.5)]);
    assert!(matches!(
        deserialize(&value, &schema),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn map_lists_rebuild_maps() {
    let schema = Schema::map(Schema::Str, Schema::Bool);
    let value = Value::List(vec![Value::Tuple(vec![
        Value::String("on".into()),
        Value::Bool(true),
    ])]);

    let host = deserialize(&value, &schema).unwrap();
    insta::assert_snapshot!(host, @r#"Map { "on" => true }"#);
}

#[test]
fn tagged_variant_rebuilds_discriminant() {
    let schema = Schema::Variant(VariantSchema {
        type_name: TypeName::named("event"),
        cases: vec![
            Case {
                name: "click".into(),
                payload: Some(Schema::F64),
            },
            Case {
                name: "close".into(),
                payload: None,
            },
        ],
        tagged: Some(TaggedUnion {
            discriminant: "kind".into(),
            payload_fields: vec![Some("x".into()), None],
        }),
    });

    let host = deserialize(&Value::variant(0, Some(Value::F64(4.0))), &schema).unwrap();
    insta::assert_snapshot!(host, @r#"{ kind: "click", x: 4 }"#);

    let host = deserialize(&Value::variant(1, None), &schema).unwrap();
    insta::assert_snapshot!(host, @r#"{ kind: "close" }"#);

    assert!(deserialize(&Value::variant(2, None), &schema).is_err());
    assert!(deserialize(&Value::variant(1, Some(Value::Bool(true))), &schema).is_err());
}

#[test]
fn plain_variant_unwraps_payload() {
    let schema = Schema::variant(
        TypeName::anonymous(),
        vec![
            Case {
                name: "case0".into(),
                payload: Some(Schema::Str),
            },
            Case {
                name: "case1".into(),
                payload: Some(Schema::F64),
            },
        ],
    );
    assert_eq!(
        deserialize(&Value::variant(1, Some(Value::F64(2.5))), &schema).unwrap(),
        HostValue::Number(2.5)
    );
}

#[test]
fn results_rebuild_their_fields() {
    let schema = Schema::Result(ResultSchema {
        type_name: TypeName::anonymous(),
        ok: Some(Box::new(Schema::F64)),
        err: None,
        origin: ResultOrigin::Custom {
            discriminant: "status".into(),
            ok_field: Some("value".into()),
            err_field: None,
        },
    });

    let host = deserialize(&Value::ok(Some(Value::F64(1.0))), &schema).unwrap();
    insta::assert_snapshot!(host, @r#"{ status: "ok", value: 1 }"#);

    let host = deserialize(&Value::err(None), &schema).unwrap();
    insta::assert_snapshot!(host, @r#"{ status: "err" }"#);

    assert!(deserialize(&Value::err(Some(Value::F64(1.0))), &schema).is_err());
}

#[test]
fn enums_and_flags() {
    let schema = Schema::enumeration(TypeName::anonymous(), vec!["a".into(), "b".into()]);
    assert_eq!(
        deserialize(&Value::Enum(1), &schema).unwrap(),
        HostValue::from("b")
    );
    assert!(deserialize(&Value::Enum(2), &schema).is_err());

    let schema = Schema::Flags(FlagsSchema {
        type_name: TypeName::anonymous(),
        flags: vec!["read".into(), "write".into()],
    });
    let host = deserialize(&Value::Flags(vec![false, true]), &schema).unwrap();
    insta::assert_snapshot!(host, @"{ read: false, write: true }");
}

#[test]
fn kind_mismatch_reports_path() {
    let err = deserialize(&Value::Bool(true), &Schema::Str).unwrap_err();
    insta::assert_snapshot!(err, @"type mismatch: expected string, found bool");

    let schema = Schema::record(
        TypeName::named("point"),
        vec![field("x", Schema::F64), field("y", Schema::F64)],
    );
    let value = Value::Record(vec![Value::F64(1.0), Value::String("2".into())]);
    let err = deserialize(&value, &schema).unwrap_err();
    insta::assert_snapshot!(err, @"type mismatch in `point.y`: expected f64, found string");
}
