#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value conversion for witbridge.
//!
//! Converts one host value against one schema into a value tree, and back. Recursion
//! always follows the schema, never a shape inferred from the value:
//!
//! ```
//! use witbridge_core::{HostValue, Schema};
//! use witbridge_value::{deserialize, serialize};
//! use witbridge_wire::Value;
//!
//! let schema = Schema::list(Schema::Str);
//! let host = HostValue::Array(vec!["a".into(), "b".into()]);
//! let tree = serialize(&host, &schema).unwrap();
//! assert_eq!(tree, Value::List(vec![Value::String("a".into()), Value::String("b".into())]));
//! assert_eq!(deserialize(&tree, &schema).unwrap(), host);
//! ```
//!
//! Conversion is all-or-nothing: the first mismatch aborts the call.

pub mod config;
pub mod deserialize;
pub mod matching;
mod path;
pub mod serialize;

#[cfg(test)]
mod deserialize_tests;
#[cfg(test)]
mod matching_tests;

pub use config::ConvertConfig;
pub use deserialize::deserialize;
pub use matching::matches_schema;
pub use serialize::{Serializer, serialize};
