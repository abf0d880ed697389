use super::files::{atomic_write, read_file};
use crate::error::Result;
#[cfg(test)]
use std::collections::HashMap;
use std::path::PathBuf;

/// Key under which the task collection is stored
pub const TASKS_KEY: &str = "taskflow-todos";

/// Persistent string key-value store
pub trait KeyValueStore {
    /// Read the value for `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value for `key` in a single write
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by a directory: each key is a `<key>.json` file
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(read_file(self.path_for(key))?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        atomic_write(&path, value)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "store written");
        Ok(())
    }
}

/// In-memory store, counting writes
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value (not counted as a write)
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        assert!(store.get(TASKS_KEY).unwrap().is_none());

        store.set(TASKS_KEY, "[1,2]").unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[1,2]"));
        assert!(temp_dir.path().join("taskflow-todos.json").exists());
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryStore::with_value("k", "v");
        assert_eq!(store.writes(), 0);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.set("k", "w").unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }
}
