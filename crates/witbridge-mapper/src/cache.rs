//! Anonymous-type cache.

use std::collections::HashMap;
use std::sync::RwLock;

use witbridge_core::{Schema, TypeDescriptor};

use crate::config::MapperConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    descriptor: TypeDescriptor,
    /// The enclosing scope already implies optionality, so the union skipped its own
    /// option wrap.
    scope_optional: bool,
    /// Owner and case naming end up in the derived schema.
    config: MapperConfig,
}

impl CacheKey {
    fn new(descriptor: &TypeDescriptor, scope_optional: bool, config: &MapperConfig) -> Self {
        Self {
            descriptor: descriptor.clone(),
            scope_optional,
            config: config.clone(),
        }
    }
}

/// Schemas derived for anonymous unions, keyed by the union descriptor's structure and
/// the mapper configuration that derived them.
///
/// Owned by the caller; share it behind an `Arc` to reuse derivations across threads.
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct TypeCache {
    entries: RwLock<HashMap<CacheKey, Schema>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        descriptor: &TypeDescriptor,
        scope_optional: bool,
        config: &MapperConfig,
    ) -> Option<Schema> {
        let key = CacheKey::new(descriptor, scope_optional, config);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).cloned()
    }

    /// Insert unless an entry already exists; returns the stored schema.
    ///
    /// Concurrent derivations of the same descriptor are value-equal, so the first
    /// insert wins and later ones are dropped.
    pub fn insert(
        &self,
        descriptor: &TypeDescriptor,
        scope_optional: bool,
        config: &MapperConfig,
        schema: Schema,
    ) -> Schema {
        let key = CacheKey::new(descriptor, scope_optional, config);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(key).or_insert(schema).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
