use std::collections::HashSet;

use indoc::indoc;

use crate::{DescriptorKind, LiteralValue, Property, TypeDescriptor};

#[test]
fn parse_interface_from_json() {
    let json = indoc! {r#"
        {
            "kind": "interface",
            "name": "User",
            "properties": [
                { "name": "name", "type": { "kind": "string" } },
                { "name": "age", "type": { "kind": "number" }, "optional": true },
                { "name": "id", "type": { "kind": "bigint" } }
            ]
        }
    "#};

    let ty = TypeDescriptor::from_json(json).unwrap();

    assert_eq!(ty.name(), Some("User"));
    let props = ty.properties().unwrap();
    assert_eq!(props.len(), 3);
    assert_eq!(props[0], Property::required("name", TypeDescriptor::string()));
    assert_eq!(props[1], Property::optional("age", TypeDescriptor::number()));
    assert_eq!(props[2].ty.kind, DescriptorKind::BigInt);
}

#[test]
fn parse_literal_union_from_json() {
    let json = indoc! {r#"
        {
            "kind": "union",
            "members": [
                { "kind": "literal", "value": { "string": "red" } },
                { "kind": "literal", "value": { "boolean": true } },
                { "kind": "undefined" }
            ]
        }
    "#};

    let ty = TypeDescriptor::from_json(json).unwrap();

    insta::assert_snapshot!(ty, @r#""red" | true | undefined"#);
}

#[test]
fn malformed_json_is_a_descriptor_error() {
    let err = TypeDescriptor::from_json(r#"{ "kind": "nope" }"#).unwrap_err();

    assert!(matches!(err, crate::Error::Descriptor(_)));
}

#[test]
fn display_anonymous_shapes() {
    let ty = TypeDescriptor::object(vec![
        Property::required("tag", TypeDescriptor::string_literal("ok")),
        Property::optional("value", TypeDescriptor::array(TypeDescriptor::number())),
    ]);
    insta::assert_snapshot!(ty, @r#"{ tag: "ok"; value?: number[] }"#);

    let ty = TypeDescriptor::map(
        TypeDescriptor::string(),
        TypeDescriptor::tuple(vec![TypeDescriptor::boolean(), TypeDescriptor::bigint()]),
    );
    insta::assert_snapshot!(ty, @"Map<string, [boolean, bigint]>");

    let ty = TypeDescriptor::array(TypeDescriptor::union(vec![
        TypeDescriptor::string(),
        TypeDescriptor::null(),
    ]));
    insta::assert_snapshot!(ty, @"(string | null)[]");
}

#[test]
fn display_prefers_declared_name() {
    let ty = TypeDescriptor::array(TypeDescriptor::number()).named("Float64Array");

    assert_eq!(ty.to_string(), "Float64Array");
}

#[test]
fn structural_equality_ignores_construction_path() {
    let a = TypeDescriptor::union(vec![
        TypeDescriptor::string(),
        TypeDescriptor::number_literal(1.5),
    ]);
    let b = TypeDescriptor::from_json(
        r#"{ "kind": "union", "members": [
            { "kind": "string" },
            { "kind": "literal", "value": { "number": 1.5 } }
        ] }"#,
    )
    .unwrap();

    let mut set = HashSet::new();
    set.insert(a.clone());

    assert_eq!(a, b);
    assert!(set.contains(&b));
}

#[test]
fn numeric_literals_compare_by_bits() {
    assert_eq!(LiteralValue::Number(f64::NAN), LiteralValue::Number(f64::NAN));
    assert_ne!(LiteralValue::Number(0.0), LiteralValue::Number(-0.0));
    assert!(LiteralValue::BigInt("10".into()).is_numeric());
    assert!(!LiteralValue::String("10".into()).is_numeric());
}

#[test]
fn empty_kinds() {
    assert!(TypeDescriptor::null().is_empty_kind());
    assert!(TypeDescriptor::undefined().is_empty_kind());
    assert!(TypeDescriptor::void().is_empty_kind());
    assert!(!TypeDescriptor::string().is_empty_kind());
}
