use witbridge_core::{Property, TypeDescriptor};

use crate::detect::{literal_cases, tagged_shape};

fn member(tag: &str, payload: Option<(&str, TypeDescriptor)>) -> TypeDescriptor {
    let mut props = vec![Property::required("tag", TypeDescriptor::string_literal(tag))];
    if let Some((name, ty)) = payload {
        props.push(Property::required(name, ty));
    }
    TypeDescriptor::object(props)
}

#[test]
fn string_literals_form_cases() {
    let members = vec![
        TypeDescriptor::string_literal("red"),
        TypeDescriptor::string_literal("green"),
        TypeDescriptor::string_literal("red"),
    ];
    assert_eq!(
        literal_cases(&members),
        Some(vec!["red".to_owned(), "green".to_owned()])
    );
}

#[test]
fn boolean_and_numeric_literals_are_not_enums() {
    let members = vec![
        TypeDescriptor::string_literal("auto"),
        TypeDescriptor::bool_literal(true),
    ];
    assert_eq!(literal_cases(&members), None);

    let members = vec![
        TypeDescriptor::number_literal(1.0),
        TypeDescriptor::number_literal(2.0),
    ];
    assert_eq!(literal_cases(&members), None);
    assert_eq!(literal_cases(&[]), None);
}

#[test]
fn tagged_members_keep_declaration_order() {
    let members = vec![
        member("circle", Some(("radius", TypeDescriptor::number()))),
        member("dot", None),
        member("square", Some(("side", TypeDescriptor::number()))),
    ];
    let shape = tagged_shape(&members).unwrap();

    assert_eq!(shape.discriminant, "tag");
    let tags: Vec<&str> = shape.members.iter().map(|m| m.tag).collect();
    assert_eq!(tags, ["circle", "dot", "square"]);
    assert_eq!(shape.members[0].payload.map(|p| p.name.as_str()), Some("radius"));
    assert!(shape.members[1].payload.is_none());
    assert!(shape.as_result().is_none());
}

#[test]
fn discriminant_need_not_be_first_field() {
    let members = vec![
        TypeDescriptor::object(vec![
            Property::required("value", TypeDescriptor::number()),
            Property::required("kind", TypeDescriptor::string_literal("a")),
        ]),
        TypeDescriptor::object(vec![
            Property::required("kind", TypeDescriptor::string_literal("b")),
            Property::required("value", TypeDescriptor::string()),
        ]),
    ];
    let shape = tagged_shape(&members).unwrap();
    assert_eq!(shape.discriminant, "kind");
}

#[test]
fn not_tagged() {
    // Duplicate tags.
    let members = vec![member("a", None), member("a", None)];
    assert!(tagged_shape(&members).is_none());

    // More than one payload field.
    let members = vec![
        member("a", None),
        TypeDescriptor::object(vec![
            Property::required("tag", TypeDescriptor::string_literal("b")),
            Property::required("x", TypeDescriptor::number()),
            Property::required("y", TypeDescriptor::number()),
        ]),
    ];
    assert!(tagged_shape(&members).is_none());

    // A non-object member.
    let members = vec![member("a", None), TypeDescriptor::string()];
    assert!(tagged_shape(&members).is_none());

    // Optional discriminant.
    let members = vec![
        member("a", None),
        TypeDescriptor::object(vec![Property::optional(
            "tag",
            TypeDescriptor::string_literal("b"),
        )]),
    ];
    assert!(tagged_shape(&members).is_none());
}

#[test]
fn inbuilt_result_shape() {
    let members = vec![
        member("ok", Some(("val", TypeDescriptor::number()))),
        member("err", Some(("val", TypeDescriptor::string()))),
    ];
    let shape = tagged_shape(&members).unwrap();
    let result = shape.as_result().unwrap();

    assert!(result.is_inbuilt());
    assert_eq!(result.ok_field().as_deref(), Some("val"));
}

#[test]
fn custom_result_shape_in_either_order() {
    let members = vec![
        member("err", Some(("error", TypeDescriptor::string()))),
        member("ok", Some(("value", TypeDescriptor::number()))),
    ];
    let shape = tagged_shape(&members).unwrap();
    let result = shape.as_result().unwrap();

    assert!(!result.is_inbuilt());
    assert_eq!(result.ok_field().as_deref(), Some("value"));
    assert_eq!(result.err_field().as_deref(), Some("error"));
}

#[test]
fn void_payload_is_tag_only() {
    let members = vec![
        member("ok", Some(("val", TypeDescriptor::void()))),
        member("err", Some(("val", TypeDescriptor::string()))),
    ];
    let shape = tagged_shape(&members).unwrap();
    let result = shape.as_result().unwrap();

    assert!(result.is_inbuilt());
    assert_eq!(result.ok_field(), None);
    assert_eq!(result.err_field().as_deref(), Some("val"));
}
