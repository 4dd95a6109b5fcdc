//! Host built-ins with no interchange shape, and the fixed placeholder records.

use witbridge_core::{EmptyKind, Field, Schema, TypeName};

pub(crate) const UNSTRUCTURED_TEXT: &str = "UnstructuredText";
pub(crate) const UNSTRUCTURED_BINARY: &str = "UnstructuredBinary";

/// Remediation hint for a rejected built-in type name.
pub(crate) fn rejection_hint(name: &str) -> Option<&'static str> {
    Some(match name {
        "String" => "use the primitive `string` instead of the boxed `String`",
        "Number" => "use the primitive `number` instead of the boxed `Number`",
        "Boolean" => "use the primitive `boolean` instead of the boxed `Boolean`",
        "BigInt" => "use the primitive `bigint` instead of the boxed `BigInt`",
        "Symbol" => "symbols cannot cross the boundary; use a string key",
        "Object" => "declare the expected shape as an interface or type literal",
        "Date" => "pass an ISO 8601 string or a number of milliseconds since the epoch",
        "RegExp" => "pass the pattern source as a string",
        "Set" => "use an array of unique values",
        "WeakSet" => "use an array of values",
        "WeakMap" => "use a `Map` with serializable keys",
        "Iterator" | "IterableIterator" | "Iterable" | "AsyncIterator" | "AsyncIterable"
        | "Generator" | "AsyncGenerator" => "collect the items into an array",
        _ => return None,
    })
}

fn field(name: &str, schema: Schema) -> Field {
    Field {
        name: name.to_owned(),
        schema,
    }
}

/// `text-source { data: string, text-type: option<text-type { language-code: string }> }`
pub(crate) fn text_source() -> Schema {
    let text_type = Schema::record(
        TypeName::named("text-type"),
        vec![field("language-code", Schema::Str)],
    );
    Schema::record(
        TypeName::named("text-source"),
        vec![
            field("data", Schema::Str),
            field("text-type", Schema::option(text_type, EmptyKind::Undefined)),
        ],
    )
}

/// `binary-source { data: list<u8>, binary-type: binary-type { mime-type: string } }`
pub(crate) fn binary_source() -> Schema {
    let binary_type = Schema::record(
        TypeName::named("binary-type"),
        vec![field("mime-type", Schema::Str)],
    );
    Schema::record(
        TypeName::named("binary-source"),
        vec![
            field("data", Schema::list(Schema::U8)),
            field("binary-type", binary_type),
        ],
    )
}
