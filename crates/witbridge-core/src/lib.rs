#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for witbridge.
//!
//! Three models meet here:
//! - **Descriptors** (`TypeDescriptor`): the host language's compile-time view of a type,
//!   as handed over by the external reflector.
//! - **Schemas** (`Schema`): the interchange algebra of records, variants, enums, options,
//!   results, flags, handles, lists, tuples and primitives.
//! - **Host values** (`HostValue`): the host's duck-typed runtime values.
//!
//! The mapper turns descriptors into schemas; the value layer converts host values
//! against a schema.

pub mod descriptor;
pub mod error;
pub mod host_value;
pub mod schema;
pub mod utils;

#[cfg(test)]
mod descriptor_tests;
#[cfg(test)]
mod schema_tests;

pub use descriptor::{DescriptorKind, LiteralValue, Property, TypeDescriptor};
pub use error::{Error, ErrorContext};
pub use host_value::{HostValue, TypedArray, TypedArrayKind};
pub use schema::{
    Case, EmptyKind, EnumSchema, Field, FlagsSchema, HandleSchema, IntRepr, ListRepr, ListSchema,
    OptionSchema, RecordSchema, ResourceMode, ResultOrigin, ResultSchema, Schema, TaggedUnion,
    TupleSchema, TypeName, VariantSchema,
};

/// Result type for witbridge operations.
pub type Result<T> = std::result::Result<T, Error>;
