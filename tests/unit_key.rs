/// Unit tests for Key type methods

use ferrule::{key_of, Key};
use std::any::TypeId;
use std::collections::{BTreeSet, HashSet};

trait Plugin: Send + Sync {}

#[test]
fn test_key_display_name_type() {
    let key = Key::of::<String>();
    assert_eq!(key.display_name(), "alloc::string::String");
    assert_eq!(key.to_string(), "alloc::string::String");
}

#[test]
fn test_key_display_name_trait() {
    let key = Key::of::<dyn Plugin>();
    assert!(key.display_name().starts_with("dyn "));
    assert!(key.display_name().ends_with("Plugin"));
}

#[test]
fn test_key_type_id() {
    assert_eq!(Key::of::<u32>().type_id(), TypeId::of::<u32>());
    assert_eq!(Key::of::<dyn Plugin>().type_id(), TypeId::of::<dyn Plugin>());
}

#[test]
fn test_key_of_helper() {
    assert_eq!(key_of::<u8>(), Key::of::<u8>());
}

#[test]
fn test_key_equality() {
    assert_eq!(Key::of::<String>(), Key::of::<String>());
    assert_ne!(Key::of::<String>(), Key::of::<&'static str>());
    assert_ne!(Key::of::<u8>(), Key::of::<dyn Plugin>());
}

#[test]
fn test_key_hash() {
    let keys: HashSet<Key> = [Key::of::<u8>(), Key::of::<u8>(), Key::of::<u16>(), Key::of::<dyn Plugin>()]
        .into_iter()
        .collect();
    assert_eq!(keys.len(), 3);
}

#[test]
fn test_key_ordering_by_name() {
    let keys: BTreeSet<Key> = [Key::of::<u64>(), Key::of::<bool>(), Key::of::<i8>()].into_iter().collect();
    let names: Vec<_> = keys.iter().map(Key::display_name).collect();
    assert_eq!(names, vec!["bool", "i8", "u64"]);
}

#[test]
fn test_key_copy() {
    let key = Key::of::<String>();
    let copied = key;
    assert_eq!(key, copied);
    assert_eq!(key.display_name(), copied.display_name());
}
