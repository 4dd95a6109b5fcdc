use crate::{
    Case, EmptyKind, Field, IntRepr, ListRepr, ResultOrigin, ResultSchema, Schema, TypeName,
    TypedArrayKind,
};

fn user_schema() -> Schema {
    Schema::record(
        TypeName::named("user"),
        vec![
            Field {
                name: "name".into(),
                schema: Schema::Str,
            },
            Field {
                name: "age".into(),
                schema: Schema::option(Schema::F64, EmptyKind::OptionalMarker),
            },
        ],
    )
}

#[test]
fn display_record() {
    insta::assert_snapshot!(user_schema(), @"record user { name: string, age: option<f64> }");
}

#[test]
fn display_variant_and_enum() {
    let variant = Schema::variant(
        TypeName::anonymous(),
        vec![
            Case {
                name: "case0".into(),
                payload: Some(Schema::Str),
            },
            Case {
                name: "empty".into(),
                payload: None,
            },
        ],
    );
    let en = Schema::enumeration(TypeName::named("color"), vec!["red".into(), "green".into()]);

    insta::assert_snapshot!(variant, @"variant { case0(string), empty }");
    insta::assert_snapshot!(en, @"enum color { red, green }");
}

#[test]
fn display_result_sides() {
    let result = |ok: Option<Schema>, err: Option<Schema>| {
        Schema::Result(ResultSchema {
            type_name: TypeName::anonymous(),
            ok: ok.map(Box::new),
            err: err.map(Box::new),
            origin: ResultOrigin::Inbuilt,
        })
    };

    assert_eq!(result(None, None).to_string(), "result");
    assert_eq!(result(Some(Schema::U8), None).to_string(), "result<u8>");
    assert_eq!(result(None, Some(Schema::Str)).to_string(), "result<_, string>");
    assert_eq!(
        result(Some(Schema::U8), Some(Schema::Str)).to_string(),
        "result<u8, string>"
    );
}

#[test]
fn typed_list_elements() {
    let Schema::List(list) = Schema::typed_list(TypedArrayKind::BigInt64) else {
        panic!("expected list");
    };

    assert_eq!(list.repr, ListRepr::Typed(TypedArrayKind::BigInt64));
    assert_eq!(
        *list.element,
        Schema::S64 {
            repr: IntRepr::BigInt
        }
    );
    assert_eq!(
        Schema::typed_array_element(TypedArrayKind::Uint16),
        Schema::U16
    );
}

#[test]
fn map_is_list_of_pairs() {
    let schema = Schema::map(Schema::Str, Schema::F64);

    insta::assert_snapshot!(schema, @"list<tuple<string, f64>>");
}

#[test]
fn inbuilt_result_field_names() {
    let origin = ResultOrigin::Inbuilt;
    let custom = ResultOrigin::Custom {
        discriminant: "kind".into(),
        ok_field: Some("value".into()),
        err_field: None,
    };

    assert_eq!(origin.discriminant(), "tag");
    assert_eq!(origin.ok_field(), Some("val"));
    assert_eq!(custom.discriminant(), "kind");
    assert_eq!(custom.ok_field(), Some("value"));
    assert_eq!(custom.err_field(), None);
}

#[test]
fn schema_json_roundtrip() {
    let schema = user_schema();

    let json = serde_json::to_string(&schema).unwrap();
    let decoded: Schema = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, schema);
}
