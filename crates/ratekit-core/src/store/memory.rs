//! In-memory settings store for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::SettingsStore;
use crate::error::StoreError;

/// Volatile [`SettingsStore`] backed by a plain map.
///
/// `flush` is a no-op; values live as long as the store does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
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

impl SettingsStore for MemoryStore {
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::keys;

    #[test]
    fn missing_keys_yield_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.get_i64(keys::USE_COUNT), 0);
        assert_eq!(store.get_f64(keys::FIRST_USE_DATE), 0.0);
        assert_eq!(store.get_str(keys::CURRENT_VERSION), None);
        assert!(!store.get_bool(keys::DECLINED_TO_RATE));
    }

    #[test]
    fn writes_are_visible_to_reads() {
        let store = MemoryStore::new();
        store.set_i64(keys::USE_COUNT, 7);
        store.set_f64(keys::FIRST_USE_DATE, 1234.5);
        store.set_str(keys::CURRENT_VERSION, "1.2");
        store.set_bool(keys::RATED_CURRENT_VERSION, true);

        assert_eq!(store.get_i64(keys::USE_COUNT), 7);
        assert_eq!(store.get_f64(keys::FIRST_USE_DATE), 1234.5);
        assert_eq!(store.get_str(keys::CURRENT_VERSION).as_deref(), Some("1.2"));
        assert!(store.get_bool(keys::RATED_CURRENT_VERSION));
    }

    #[test]
    fn integer_reads_coerce_from_float_storage() {
        let store = MemoryStore::new();
        store.set_i64(keys::USE_COUNT, 3);
        // An integer write is readable as a float (timestamps are stored
        // as f64 but old installs may have written whole numbers).
        assert_eq!(store.get_f64(keys::USE_COUNT), 3.0);
    }
}
