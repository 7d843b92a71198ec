use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::KprSimError;
use crate::storage::KeyValueStore;
use crate::KprSimResult;

/// Store backed by a single JSON object file.
///
/// Every key is a top-level member of the object. Writes replace the file
/// through a sibling temp file and a rename. One process at a time.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (without creating) the store file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Open `store.json` inside `dir`, creating the directory if needed.
    pub fn in_dir(dir: impl AsRef<Path>) -> KprSimResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            KprSimError::Storage(format!("Failed to create '{}': {}", dir.display(), e))
        })?;
        Ok(Self::open(dir.join("store.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> KprSimResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            KprSimError::Storage(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(KprSimError::SerializationError(format!(
                "'{}' does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> KprSimResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(map)?;
        fs::write(&tmp, body).map_err(|e| {
            KprSimError::Storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            KprSimError::Storage(format!("Failed to replace '{}': {}", self.path.display(), e))
        })?;
        Ok(())
    }

    fn guard(&self) -> KprSimResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| KprSimError::Storage("file store lock poisoned".into()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> KprSimResult<Option<String>> {
        let _guard = self.guard()?;
        let map = self.read_all()?;
        map.get(key)
            .map(serde_json::to_string)
            .transpose()
            .map_err(KprSimError::from)
    }

    fn set(&self, key: &str, value: String) -> KprSimResult<()> {
        let _guard = self.guard()?;
        let parsed: Value = serde_json::from_str(&value)?;
        let mut map = self.read_all()?;
        map.insert(key.to_string(), parsed);
        self.write_all(&map)
    }

    fn remove(&self, key: &str) -> KprSimResult<()> {
        let _guard = self.guard()?;
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_or_default, save};

    #[test]
    fn test_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::in_dir(dir.path()).unwrap();
            save(&store, "sim_history", &vec!["a", "b"]).unwrap();
        }
        let reopened = JsonFileStore::in_dir(dir.path()).unwrap();
        let loaded: Vec<String> = load_or_default(&reopened, "sim_history").unwrap();
        assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path()).unwrap();
        save(&store, "one", &1).unwrap();
        save(&store, "two", &2).unwrap();
        store.remove("one").unwrap();
        assert_eq!(store.get("one").unwrap(), None);
        assert_eq!(store.get("two").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").unwrap(), None);
        // removing from a missing file does not create it
        store.remove("anything").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_non_json_value_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path()).unwrap();
        assert!(store.set("k", "not json".into()).is_err());
    }

    #[test]
    fn test_non_object_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2]").unwrap();
        let store = JsonFileStore::open(&path);
        assert!(matches!(
            store.get("k"),
            Err(KprSimError::SerializationError(_))
        ));
    }
}
