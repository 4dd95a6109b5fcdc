use witbridge_core::{
    EmptyKind, Field, HostValue, IntRepr, Schema, TypeName, TypedArray, TypedArrayKind,
};

use crate::matches_schema;

fn point() -> Schema {
    Schema::record(
        TypeName::named("point"),
        vec![
            Field {
                name: "x".into(),
                schema: Schema::F64,
            },
            Field {
                name: "label".into(),
                schema: Schema::option(Schema::Str, EmptyKind::OptionalMarker),
            },
        ],
    )
}

#[test]
fn primitives() {
    assert!(matches_schema(&HostValue::Number(3.0), &Schema::U8));
    assert!(!matches_schema(&HostValue::Number(300.0), &Schema::U8));
    assert!(!matches_schema(&HostValue::Number(0.5), &Schema::S32));
    assert!(matches_schema(&HostValue::Number(0.5), &Schema::F64));
    assert!(matches_schema(&"c".into(), &Schema::Char));
    assert!(!matches_schema(&"cd".into(), &Schema::Char));
    assert!(matches_schema(
        &HostValue::BigInt(1),
        &Schema::S64 {
            repr: IntRepr::BigInt
        }
    ));
    assert!(!matches_schema(
        &HostValue::Number(1.0),
        &Schema::S64 {
            repr: IntRepr::BigInt
        }
    ));
}

#[test]
fn records_allow_missing_options_only() {
    let full = HostValue::object([("x", 1.into()), ("label", "p".into())]);
    let partial = HostValue::object([("x", HostValue::from(1))]);
    let missing = HostValue::object([("label", HostValue::from("p"))]);
    let extra = HostValue::object([("x", 1.into()), ("z", 2.into())]);

    assert!(matches_schema(&full, &point()));
    assert!(matches_schema(&partial, &point()));
    assert!(!matches_schema(&missing, &point()));
    assert!(!matches_schema(&extra, &point()));
}

#[test]
fn lists_and_buffers() {
    let typed = Schema::typed_list(TypedArrayKind::Uint8);
    assert!(matches_schema(
        &HostValue::TypedArray(TypedArray::Uint8(vec![1])),
        &typed
    ));
    assert!(!matches_schema(
        &HostValue::TypedArray(TypedArray::Int8(vec![1])),
        &typed
    ));
    assert!(matches_schema(&HostValue::Array(vec![1.into()]), &typed));

    let map = Schema::map(Schema::Str, Schema::F64);
    assert!(matches_schema(
        &HostValue::Map(vec![("a".into(), 1.into())]),
        &map
    ));
    assert!(!matches_schema(
        &HostValue::Map(vec![(1.into(), 1.into())]),
        &map
    ));
}

#[test]
fn tuples_and_units() {
    let pair = Schema::tuple(vec![Schema::Str, Schema::Bool]);
    assert!(matches_schema(
        &HostValue::Array(vec!["a".into(), true.into()]),
        &pair
    ));
    assert!(!matches_schema(&HostValue::Array(vec!["a".into()]), &pair));

    assert!(matches_schema(&HostValue::Undefined, &Schema::unit(EmptyKind::Void)));
    assert!(!matches_schema(&HostValue::Undefined, &Schema::tuple(vec![])));
}
