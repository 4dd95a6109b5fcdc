//! The end-to-end pipeline: descriptor to schema, host value to wire nodes, and back.

use std::sync::Arc;

use tracing::trace;
use witbridge_core::{HostValue, Result, Schema, TypeDescriptor};
use witbridge_mapper::{MapperConfig, Scope, TypeCache, TypeMapper};
use witbridge_value::{ConvertConfig, Serializer, deserialize};
use witbridge_wire::{WireType, WireValue};

/// Ties the mapper, serializer, node codecs and deserializer together around one
/// shared anonymous-type cache.
///
/// Cloning a bridge shares its cache.
#[derive(Clone, Debug, Default)]
pub struct Bridge {
    cache: Arc<TypeCache>,
    mapper_config: MapperConfig,
    serializer: Serializer,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing cache, e.g. one shared with other bridges.
    pub fn with_cache(mut self, cache: Arc<TypeCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn mapper_config(mut self, config: MapperConfig) -> Self {
        self.mapper_config = config;
        self
    }

    pub fn convert_config(mut self, config: ConvertConfig) -> Self {
        self.serializer = Serializer::with_config(config);
        self
    }

    pub fn cache(&self) -> &Arc<TypeCache> {
        &self.cache
    }

    /// Derive the schema of a declared type.
    pub fn schema_for(&self, descriptor: &TypeDescriptor, scope: &Scope) -> Result<Schema> {
        TypeMapper::new(&self.cache)
            .with_config(self.mapper_config.clone())
            .map_type(descriptor, scope)
    }

    /// Flattened wire declaration of a schema, for the interface builder.
    pub fn wire_type(&self, schema: &Schema) -> Result<WireType> {
        WireType::from_schema(schema)
    }

    /// Serialize a host value against `schema` and flatten it.
    pub fn to_wire(&self, value: &HostValue, schema: &Schema) -> Result<WireValue> {
        let tree = self.serializer.serialize(value, schema)?;
        let wire = WireValue::from_value(&tree)?;
        trace!(nodes = wire.nodes.len(), schema = %schema, "value flattened");
        Ok(wire)
    }

    /// Rebuild a host value from wire nodes shaped by `schema`.
    pub fn from_wire(&self, wire: &WireValue, schema: &Schema) -> Result<HostValue> {
        let tree = wire.to_value()?;
        deserialize(&tree, schema)
    }

    /// [`Self::to_wire`] followed by the compact binary encoding.
    pub fn to_bytes(&self, value: &HostValue, schema: &Schema) -> Result<Vec<u8>> {
        self.to_wire(value, schema)?.to_binary()
    }

    pub fn from_bytes(&self, bytes: &[u8], schema: &Schema) -> Result<HostValue> {
        self.from_wire(&WireValue::from_binary(bytes)?, schema)
    }
}
