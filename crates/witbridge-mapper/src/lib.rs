#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Schema derivation for witbridge.
//!
//! Turns host type descriptors into interchange schemas, once per declared type:
//!
//! ```
//! use witbridge_core::{Property, TypeDescriptor};
//! use witbridge_mapper::{Scope, TypeCache, TypeMapper};
//!
//! let user = TypeDescriptor::interface(
//!     "User",
//!     vec![
//!         Property::required("name", TypeDescriptor::string()),
//!         Property::optional("age", TypeDescriptor::number()),
//!     ],
//! );
//! let cache = TypeCache::new();
//! let schema = TypeMapper::new(&cache).map_type(&user, &Scope::None).unwrap();
//! assert_eq!(schema.to_string(), "record user { name: string, age: option<f64> }");
//! ```

mod builtins;
pub mod cache;
pub mod config;
pub mod detect;
pub mod mapper;
pub mod scope;

#[cfg(test)]
mod cache_tests;
#[cfg(test)]
mod detect_tests;

pub use cache::TypeCache;
pub use config::{CaseNaming, MapperConfig};
pub use mapper::TypeMapper;
pub use scope::Scope;
