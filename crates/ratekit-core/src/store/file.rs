//! JSON-document settings store.
//!
//! Values are held in memory and written out as one pretty-printed JSON
//! object on [`flush`](super::SettingsStore::flush). The document lives at
//! `~/.config/ratekit[-dev]/settings.json` by default.

use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::{Map, Value};

use super::{data_dir, SettingsStore};
use crate::error::StoreError;

/// Durable [`SettingsStore`] backed by a JSON file.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl FileStore {
    /// Open the default settings document under the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be resolved or created.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = data_dir().map_err(|e| StoreError::OpenFailed {
            path: PathBuf::from("~/.config/ratekit"),
            message: e.to_string(),
        })?;
        Ok(Self::open(dir.join("settings.json")))
    }

    /// Open a settings document at a specific path.
    ///
    /// A missing file starts empty. A malformed file is treated as empty
    /// rather than an error: reads default, and the next flush rewrites it.
    pub fn open(path: PathBuf) -> Self {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        "settings document at {} is malformed ({}), starting empty",
                        path.display(),
                        e
                    );
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Remove every stored value and flush the empty document.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.values.lock().expect("store lock poisoned").clear();
        self.flush()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value);
    }
}

impl SettingsStore for FileStore {
    fn get_i64(&self, key: &str) -> i64 {
        self.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
    }

    fn get_f64(&self, key: &str) -> f64 {
        self.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    }

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    fn set_i64(&self, key: &str, value: i64) {
        self.set(key, Value::from(value));
    }

    fn set_f64(&self, key: &str, value: f64) {
        self.set(key, Value::from(value));
    }

    fn set_str(&self, key: &str, value: &str) {
        self.set(key, Value::from(value));
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, Value::from(value));
    }

    fn flush(&self) -> Result<(), StoreError> {
        let data = {
            let values = self.values.lock().expect("store lock poisoned");
            serde_json::to_string_pretty(&*values).expect("settings map serializes")
        };
        std::fs::write(&self.path, data).map_err(|source| StoreError::FlushFailed {
            path: self.path.clone(),
            source,
        })
    }
}
