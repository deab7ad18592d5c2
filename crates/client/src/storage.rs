//! Cross-platform persistent storage.
//!
//! Values are stored as JSON strings under a key:
//! - Web: `localStorage`
//! - Desktop: one JSON file per key in the platform config directory:
//!   - Linux: `~/.config/chatpilot/`
//!   - macOS: `~/Library/Application Support/chatpilot/`
//!   - Windows: `%APPDATA%\chatpilot\`
//!
//! Stores receive a [`KeyValueStore`] at construction so tests can swap in
//! [`MemoryStorage`] or a [`FileStorage`] rooted in a temp dir.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

/// Raw string storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Returns `true` if the value was written.
    fn save_raw(&self, key: &str, value: &str) -> bool;
    fn load_raw(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);

    fn exists(&self, key: &str) -> bool {
        self.load_raw(key).is_some()
    }
}

/// Serialize `value` and save it under `key`.
///
/// Returns `true` if the operation succeeded.
pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => store.save_raw(key, &json),
        Err(_) => false,
    }
}

/// Load and deserialize the value under `key`.
///
/// Returns `None` if the key doesn't exist or deserialization fails.
pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let json = store.load_raw(key)?;
    serde_json::from_str(&json).ok()
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn save_raw(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        true
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

// =========================================
// Web (WASM) implementation
// =========================================

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn save_raw(&self, key: &str, value: &str) -> bool {
        Self::storage().is_some_and(|s| s.set_item(key, value).is_ok())
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// The durable store for the current platform.
#[cfg(target_arch = "wasm32")]
pub fn platform_storage() -> std::sync::Arc<dyn KeyValueStore> {
    std::sync::Arc::new(LocalStorage)
}

// =========================================
// Desktop (native) implementation
// =========================================

/// JSON files in a directory, one per key.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn at(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/<app>`, or `None` when the platform has no config dir.
    pub fn in_config_dir(app: &str) -> Option<Self> {
        Some(Self::at(dirs::config_dir()?.join(app)))
    }

    fn file_path(&self, key: &str) -> Option<std::path::PathBuf> {
        // Ensure the directory exists
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).ok()?;
        }
        // Sanitize key to be a valid filename
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        Some(self.dir.join(format!("{}.json", safe_key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStorage {
    fn save_raw(&self, key: &str, value: &str) -> bool {
        let Some(path) = self.file_path(key) else {
            return false;
        };
        std::fs::write(path, value).is_ok()
    }

    fn load_raw(&self, key: &str) -> Option<String> {
        let path = self.file_path(key)?;
        std::fs::read_to_string(path).ok()
    }

    fn remove(&self, key: &str) {
        if let Some(path) = self.file_path(key) {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// The durable store for the current platform. Falls back to memory when no
/// config directory is available.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_storage() -> std::sync::Arc<dyn KeyValueStore> {
    match FileStorage::in_config_dir("chatpilot") {
        Some(files) => std::sync::Arc::new(files),
        None => {
            crate::log_warn!("No config directory available; session will not persist");
            std::sync::Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Prefs {
        theme: String,
    }

    #[test]
    fn file_storage_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Prefs { theme: "dark".into() };

        assert!(save(&FileStorage::at(dir.path()), "prefs", &prefs));

        let reopened = FileStorage::at(dir.path());
        assert_eq!(load::<Prefs>(&reopened, "prefs"), Some(prefs));

        reopened.remove("prefs");
        assert!(!reopened.exists("prefs"));
    }

    #[test]
    fn file_storage_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let files = FileStorage::at(dir.path().join("nested"));
        assert!(files.save_raw("a/b:c", "1"));
        assert!(dir.path().join("nested").join("a_b_c.json").exists());
    }

    #[test]
    fn load_ignores_malformed_json() {
        let mem = MemoryStorage::new();
        mem.save_raw("prefs", "{not json");
        assert_eq!(load::<Prefs>(&mem, "prefs"), None);
        assert!(mem.exists("prefs"));
    }
}
