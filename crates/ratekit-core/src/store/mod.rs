//! Durable key/value settings storage.
//!
//! All persisted tracking state lives behind the [`SettingsStore`] trait:
//! typed getters that default instead of erroring, typed setters, and a
//! synchronous [`SettingsStore::flush`] after which values are durable.
//! Nothing else in the crate touches a storage mechanism directly.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Stable storage keys.
///
/// These names round-trip exactly for backward compatibility with existing
/// installs; do not rename.
pub mod keys {
    /// Epoch seconds when tracking began for the current version.
    pub const FIRST_USE_DATE: &str = "firstUseDate";
    /// Launches recorded for the current tracked version.
    pub const USE_COUNT: &str = "useCount";
    /// Significant events recorded for the current tracked version.
    pub const SIGNIFICANT_EVENT_COUNT: &str = "significantEventCount";
    /// The application version the counters apply to.
    pub const CURRENT_VERSION: &str = "currentVersion";
    /// True once the user opted to rate the tracked version.
    pub const RATED_CURRENT_VERSION: &str = "ratedCurrentVersion";
    /// True once the user permanently declined.
    pub const DECLINED_TO_RATE: &str = "declinedToRate";
    /// Epoch seconds of the "remind me later" request; 0 means none.
    pub const REMINDER_REQUEST_DATE: &str = "reminderRequestDate";
}

/// Key/value storage for tracking counters and flags.
///
/// Missing keys are never an error: integer reads default to 0, float reads
/// to 0.0, booleans to false, strings to `None`. Writes become durable once
/// [`flush`](SettingsStore::flush) returns; within a process, a write is
/// visible to subsequent reads immediately.
pub trait SettingsStore: Send + Sync {
    /// Integer value for `key`, or 0 when unset.
    fn get_i64(&self, key: &str) -> i64;

    /// Float value for `key`, or 0.0 when unset.
    fn get_f64(&self, key: &str) -> f64;

    /// String value for `key`, or `None` when unset.
    fn get_str(&self, key: &str) -> Option<String>;

    /// Boolean value for `key`, or false when unset.
    fn get_bool(&self, key: &str) -> bool;

    fn set_i64(&self, key: &str, value: i64);

    fn set_f64(&self, key: &str, value: f64);

    fn set_str(&self, key: &str, value: &str);

    fn set_bool(&self, key: &str, value: bool);

    /// Persist all pending writes. Durable once this returns.
    fn flush(&self) -> Result<(), StoreError>;
}

/// Returns `~/.config/ratekit[-dev]/` based on RATEKIT_ENV.
///
/// Set RATEKIT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RATEKIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ratekit-dev")
    } else {
        base_dir.join("ratekit")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
