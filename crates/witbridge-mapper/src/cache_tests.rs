use std::sync::Arc;
use std::thread;

use witbridge_core::{Schema, TypeDescriptor};

use crate::{MapperConfig, TypeCache};

fn config() -> MapperConfig {
    MapperConfig::new()
}

fn union() -> TypeDescriptor {
    TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::number()])
}

#[test]
fn first_insert_wins() {
    let cache = TypeCache::new();
    assert!(cache.is_empty());

    let stored = cache.insert(&union(), false, &config(), Schema::Str);
    assert_eq!(stored, Schema::Str);
    let stored = cache.insert(&union(), false, &config(), Schema::F64);
    assert_eq!(stored, Schema::Str);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&union(), false, &config()), Some(Schema::Str));
}

#[test]
fn optional_scope_is_part_of_the_key() {
    let cache = TypeCache::new();
    cache.insert(&union(), false, &config(), Schema::Str);

    assert_eq!(cache.get(&union(), true, &config()), None);
    cache.insert(&union(), true, &config(), Schema::F64);
    assert_eq!(cache.len(), 2);
}

#[test]
fn structurally_equal_descriptors_share_an_entry() {
    let cache = TypeCache::new();
    cache.insert(&union(), false, &config(), Schema::Str);

    let rebuilt = TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::number()]);
    assert_eq!(cache.get(&rebuilt, false, &config()), Some(Schema::Str));

    let reordered = TypeDescriptor::union(vec![TypeDescriptor::number(), TypeDescriptor::string()]);
    assert_eq!(cache.get(&reordered, false, &config()), None);
}

#[test]
fn shared_across_threads() {
    let cache = Arc::new(TypeCache::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.insert(&union(), false, &config(), Schema::Bool))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Schema::Bool);
    }
    assert_eq!(cache.len(), 1);
}
