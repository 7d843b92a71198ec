use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::KprSimError;
use crate::storage::KeyValueStore;
use crate::KprSimResult;

/// A thread-safe in-memory store.
///
/// Cloning shares the underlying map. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> KprSimError {
    KprSimError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> KprSimResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> KprSimResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> KprSimResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_or_default, save};

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "\"v\"".into()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("\"v\""));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        save(&store, "list", &vec![1, 2, 3]).unwrap();
        let loaded: Vec<i32> = load_or_default(&other, "list").unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_key_is_default() {
        let store = MemoryStore::new();
        let loaded: Vec<String> = load_or_default(&store, "absent").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_value_is_error() {
        let store = MemoryStore::new();
        store.set("list", "not json".into()).unwrap();
        let loaded: KprSimResult<Vec<String>> = load_or_default(&store, "list");
        assert!(matches!(loaded, Err(KprSimError::SerializationError(_))));
    }
}
