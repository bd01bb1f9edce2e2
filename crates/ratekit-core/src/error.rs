//! Core error types for ratekit-core.
//!
//! This module defines the error hierarchy using thiserror. Decision-engine
//! code never returns these: eligibility and appropriateness failures fall
//! back to "no prompt". Errors surface only at the storage and presentation
//! boundaries, plus the one hard precondition (a missing app id when a store
//! listing open is attempted).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ratekit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings-store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Presentation-collaborator errors
    #[error("Presentation error: {0}")]
    Present(#[from] PresentError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Settings-store errors.
///
/// Reads never error: missing keys yield documented defaults. Only opening
/// and flushing the backing file can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the settings document
    #[error("Failed to open settings store at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Failed to flush the settings document to disk
    #[error("Failed to flush settings store to {path}: {source}")]
    FlushFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No app id configured. Fatal only when opening a store listing.
    #[error("No app id configured; set app_id before opening the store listing")]
    MissingAppId,
}

/// Presentation-collaborator errors.
///
/// Any of these aborts the current prompt attempt without mutating
/// persisted state.
#[derive(Error, Debug)]
pub enum PresentError {
    /// No window/anchor to present into
    #[error("No presentation anchor available")]
    NoAnchor,

    /// The prompt was dismissed before the user made a choice
    /// (host lost foreground focus while the prompt was up)
    #[error("Prompt dismissed before a choice was made")]
    Dismissed,

    /// The collaborator does not support the requested operation
    #[error("Presentation operation not supported: {0}")]
    Unsupported(String),

    /// Anything else the presentation layer reports
    #[error("Presentation failed: {0}")]
    Failed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
