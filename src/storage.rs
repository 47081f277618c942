//! Key-value persistence standing in for browser local storage
//!
//! This module provides:
//! - A small [`KeyValueStore`] trait the history and background stores write through
//! - File-backed storage for native platforms (one JSON file per key)
//! - In-memory storage for WASM builds and tests

use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to create storage directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write to storage: {0}")]
    Write(std::io::Error),

    #[error("Failed to delete from storage: {0}")]
    Delete(std::io::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// String-keyed slots holding serialized values. Writes replace the whole slot.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================
// In-memory backend
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let slots = self.slots.lock().ok()?;
        slots.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;
        slots.remove(key);
        Ok(())
    }
}

// ============================================
// File backend (native platforms)
// ============================================

#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage under the platform data directory, falling back to `./cache`.
    pub fn in_data_dir() -> Self {
        if let Some(data_dir) = dirs::data_local_dir() {
            return Self::new(data_dir.join("goldrush").join("storage"));
        }
        Self::new(PathBuf::from("cache").join("storage"))
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.slot_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(StorageError::CreateDir)?;
        fs::write(self.slot_path(key), value).map_err(StorageError::Write)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(StorageError::Delete)?;
        }
        Ok(())
    }
}

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("chatHistory"), "chatHistory");
        assert_eq!(sanitize_key("user:preferences"), "user_preferences");
        assert_eq!(sanitize_key("../escape"), "___escape");
    }

    #[test]
    fn memory_store_overwrites_and_removes() {
        let store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k"), Some("2".to_string()));
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn file_store_round_trips_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("selectedBackground"), None);

        store.set("selectedBackground", r#"{"id":"ocean"}"#).unwrap();
        assert_eq!(
            store.get("selectedBackground"),
            Some(r#"{"id":"ocean"}"#.to_string())
        );
        assert!(dir.path().join("nested/selectedBackground.json").exists());

        store.remove("selectedBackground").unwrap();
        store.remove("selectedBackground").unwrap();
        assert_eq!(store.get("selectedBackground"), None);
    }
}
