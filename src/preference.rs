//! Persistent UI preferences.
//!
//! The dashboard keeps a single preference, dark mode, in a small
//! string key/value store that survives restarts.

use crate::errors::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Storage key of the dark-mode preference
pub const DARK_MODE_KEY: &str = "darkMode";

/// Root class applied while dark mode is enabled
pub const DARK_MODE_CLASS: &str = "dark-mode";

/// Toggle icon while dark mode is off
pub const MOON_ICON: &str = "🌙";

/// Toggle icon while dark mode is on
pub const SUN_ICON: &str = "☀️";

pub const TOGGLE_TITLE: &str = "Toggle Dark Mode";

/// Icon shown on the toggle for a given state
pub fn toggle_icon(dark_mode: bool) -> &'static str {
    if dark_mode {
        SUN_ICON
    } else {
        MOON_ICON
    }
}

/// String key/value persistence
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Read the dark-mode preference; anything but `"true"` means disabled
pub fn load_dark_mode(store: &dyn KeyValueStore) -> bool {
    store.get(DARK_MODE_KEY).as_deref() == Some("true")
}

pub fn save_dark_mode(store: &dyn KeyValueStore, enabled: bool) -> Result<(), StoreError> {
    store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
}

/// Volatile store, used when no file is configured and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file backed store.
///
/// The whole map is rewritten on every `set`; parent directories are
/// created as needed.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(buf) => serde_json::from_slice(&buf)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Default location: `<config dir>/clams-dashboard/storage.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clams-dashboard").join("storage.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = match self.values.write() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }
}
