#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Value trees and their flattened wire form.
//!
//! This crate contains:
//! - The value tree (`Value`), one concrete value shaped like its schema
//! - The value node codec (`WireValue`), a flat, index-addressed node array
//! - The schema node codec (`WireType`), the same flattening applied to schemas
//!
//! Both codecs lay nodes out in pre-order: a composite reserves its slot before its
//! children are emitted, so the root is always node 0 and every child index is greater
//! than its parent's.

mod builder;
pub mod node;
pub mod type_node;
pub mod value;

#[cfg(test)]
mod node_tests;

pub use node::{NodeIndex, ValueNode, WireValue};
pub use type_node::{NamedTypeNode, TypeNode, WireType};
pub use value::Value;
