//! witbridge: type and value marshalling between host type declarations and a
//! WIT-style component runtime.
//!
//! # Example
//!
//! ```
//! use witbridge::{Bridge, HostValue, Property, Scope, TypeDescriptor};
//!
//! let bridge = Bridge::new();
//! let point = TypeDescriptor::interface(
//!     "Point",
//!     vec![
//!         Property::required("x", TypeDescriptor::number()),
//!         Property::optional("label", TypeDescriptor::string()),
//!     ],
//! );
//! let schema = bridge.schema_for(&point, &Scope::None).unwrap();
//!
//! let host = HostValue::object([("x", HostValue::from(1))]);
//! let wire = bridge.to_wire(&host, &schema).unwrap();
//! assert_eq!(bridge.from_wire(&wire, &schema).unwrap(), host);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod bridge;


pub use bridge::Bridge;
pub use witbridge_core::{
    DescriptorKind, EmptyKind, Error, ErrorContext, HostValue, LiteralValue, Property, Result,
    Schema, TypeDescriptor, TypedArray, TypedArrayKind,
};
pub use witbridge_mapper::{CaseNaming, MapperConfig, Scope, TypeCache, TypeMapper};
pub use witbridge_value::{ConvertConfig, Serializer, deserialize, serialize};
pub use witbridge_wire::{Value, WireType, WireValue};
