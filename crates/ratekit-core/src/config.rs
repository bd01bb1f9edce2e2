//! Rating configuration.
//!
//! [`RatingConfig`] is the immutable evaluation-time surface: thresholds,
//! debug mode, and optional alert-text overrides. [`HostInfo`] carries the
//! host application facts (name, version, OS version) the prompt strings
//! and review URL are built from. [`Profile`] bundles both into the TOML
//! document the CLI persists at `~/.config/ratekit/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::store::data_dir;

/// Thresholds and prompt options, read at evaluation time.
///
/// Construct once and hand to the coordinator; there is no process-wide
/// mutable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Store identifier of the application. Required only when a store
    /// listing open is attempted.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Days after first use before the prompt may show.
    #[serde(default = "default_days_until_prompt")]
    pub days_until_prompt: u32,
    /// Launches before the prompt may show.
    #[serde(default = "default_uses_until_prompt")]
    pub uses_until_prompt: i64,
    /// Significant events before the prompt may show. Negative disables the
    /// gate: any non-negative count satisfies it.
    #[serde(default = "default_significant_events_until_prompt")]
    pub significant_events_until_prompt: i64,
    /// Days to wait after "remind me later" before prompting again.
    #[serde(default = "default_time_before_reminding")]
    pub time_before_reminding: f64,
    /// Bypass every eligibility check.
    #[serde(default)]
    pub debug_mode: bool,
    /// Animate modal presentation where the presenter supports it.
    #[serde(default = "default_true")]
    pub use_animation: bool,

    /// Override for the prompt title.
    #[serde(default)]
    pub alert_title: Option<String>,
    /// Override for the prompt message.
    #[serde(default)]
    pub alert_message: Option<String>,
    /// Override for the rate button label.
    #[serde(default)]
    pub alert_rate_label: Option<String>,
    /// Override for the remind-later button label.
    #[serde(default)]
    pub alert_later_label: Option<String>,
    /// Override for the decline button label.
    #[serde(default)]
    pub alert_cancel_label: Option<String>,
}

/// Facts about the host application and platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    /// Display name used in default prompt strings.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Application version the counters accumulate against.
    #[serde(default = "default_app_version")]
    pub app_version: String,
    /// Host OS version, used to pick the review URL template.
    #[serde(default)]
    pub os_version: String,
}

// Default functions
fn default_days_until_prompt() -> u32 {
    30
}
fn default_uses_until_prompt() -> i64 {
    20
}
fn default_significant_events_until_prompt() -> i64 {
    -1
}
fn default_time_before_reminding() -> f64 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_app_name() -> String {
    "(unknown)".into()
}
fn default_app_version() -> String {
    "1.0".into()
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            days_until_prompt: default_days_until_prompt(),
            uses_until_prompt: default_uses_until_prompt(),
            significant_events_until_prompt: default_significant_events_until_prompt(),
            time_before_reminding: default_time_before_reminding(),
            debug_mode: false,
            use_animation: true,
            alert_title: None,
            alert_message: None,
            alert_rate_label: None,
            alert_later_label: None,
            alert_cancel_label: None,
        }
    }
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_version: default_app_version(),
            os_version: String::new(),
        }
    }
}

/// The persisted configuration document.
///
/// Serialized to/from TOML at `~/.config/ratekit/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub host: HostInfo,
    #[serde(default)]
    pub rating: RatingConfig,
}

impl Profile {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    invalid(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Null => {
                        // Optional fields (app_id, alert overrides) show up
                        // as null; accept a plain string for them.
                        serde_json::Value::String(value.into())
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/ratekit"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let profile = Self::default();
                profile.save()?;
                Ok(profile)
            }
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }
}
