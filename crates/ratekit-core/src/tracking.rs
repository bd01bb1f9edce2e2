//! Version-scoped usage tracking.
//!
//! Counters are only meaningful for the version string they were recorded
//! against. [`reconcile`] detects a version change; the caller picks a
//! [`ResetKind`] and [`restart_tracking`] rewrites the whole record before
//! anything else reads it. [`apply_launch`] and [`apply_significant_event`]
//! are the two complete units of work the event serializer runs:
//! reconcile, reset or increment, flush.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{keys, SettingsStore};

/// Point-in-time copy of the persisted tracking record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    /// Epoch seconds when tracking began; 0 until the first increment.
    pub first_use_date: f64,
    pub use_count: i64,
    pub significant_event_count: i64,
    /// Version the counters apply to; `None` before the first event.
    pub tracked_version: Option<String>,
    pub rated_current_version: bool,
    pub declined_to_rate: bool,
    /// Epoch seconds of the last "remind me later"; 0 means no reminder.
    pub reminder_request_date: f64,
}

impl TrackingSnapshot {
    /// Read the current record out of the store.
    pub fn read(store: &dyn SettingsStore) -> Self {
        Self {
            first_use_date: store.get_f64(keys::FIRST_USE_DATE),
            use_count: store.get_i64(keys::USE_COUNT),
            significant_event_count: store.get_i64(keys::SIGNIFICANT_EVENT_COUNT),
            tracked_version: store.get_str(keys::CURRENT_VERSION),
            rated_current_version: store.get_bool(keys::RATED_CURRENT_VERSION),
            declined_to_rate: store.get_bool(keys::DECLINED_TO_RATE),
            reminder_request_date: store.get_f64(keys::REMINDER_REQUEST_DATE),
        }
    }
}

/// Which counter the reset is entered through.
///
/// A launch reset starts the clock immediately; an event reset leaves
/// `firstUseDate` at 0 until the next increment stamps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKind {
    /// firstUseDate = now, useCount = 1, significantEventCount = 0.
    Launch,
    /// firstUseDate = 0, useCount = 0, significantEventCount = 1.
    Event,
}

/// Outcome of comparing the stored version against the running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// First run or same version; counters keep accumulating.
    NoReset,
    /// The host was upgraded; the caller must apply a [`ResetKind`].
    ResetRequired,
}

/// Compare the tracked version against `current_version`.
///
/// On first run the version is initialized and no reset is reported. On a
/// mismatch the new version is written immediately and `ResetRequired` is
/// returned; the counters are stale until [`restart_tracking`] runs.
pub fn reconcile(store: &dyn SettingsStore, current_version: &str) -> Reconciliation {
    match store.get_str(keys::CURRENT_VERSION) {
        None => {
            store.set_str(keys::CURRENT_VERSION, current_version);
            Reconciliation::NoReset
        }
        Some(tracked) if tracked == current_version => Reconciliation::NoReset,
        Some(tracked) => {
            tracing::debug!(
                "version changed from {} to {}, restarting tracking",
                tracked,
                current_version
            );
            store.set_str(keys::CURRENT_VERSION, current_version);
            Reconciliation::ResetRequired
        }
    }
}

/// Rewrite the whole tracking record for a fresh version.
///
/// Clears both terminal flags and the reminder date; the counter seeds
/// depend on `kind`. Runs before any other read of the new record.
pub fn restart_tracking(store: &dyn SettingsStore, kind: ResetKind, now: DateTime<Utc>) {
    let (first_use, use_count, event_count) = match kind {
        ResetKind::Launch => (now.timestamp() as f64, 1, 0),
        ResetKind::Event => (0.0, 0, 1),
    };

    store.set_f64(keys::FIRST_USE_DATE, first_use);
    store.set_i64(keys::USE_COUNT, use_count);
    store.set_i64(keys::SIGNIFICANT_EVENT_COUNT, event_count);
    store.set_bool(keys::RATED_CURRENT_VERSION, false);
    store.set_bool(keys::DECLINED_TO_RATE, false);
    store.set_f64(keys::REMINDER_REQUEST_DATE, 0.0);
}

/// Record one application launch: reconcile, reset or increment, flush.
///
/// Returns the post-increment snapshot the eligibility engine evaluates.
///
/// # Errors
/// Only the final flush can fail; the in-memory record is updated either way.
pub fn apply_launch(
    store: &dyn SettingsStore,
    current_version: &str,
    now: DateTime<Utc>,
) -> Result<TrackingSnapshot, StoreError> {
    match reconcile(store, current_version) {
        Reconciliation::NoReset => {
            stamp_first_use_if_unset(store, now);
            let use_count = store.get_i64(keys::USE_COUNT) + 1;
            store.set_i64(keys::USE_COUNT, use_count);
            tracing::debug!("use count: {}", use_count);
        }
        Reconciliation::ResetRequired => {
            restart_tracking(store, ResetKind::Launch, now);
        }
    }

    store.flush()?;
    Ok(TrackingSnapshot::read(store))
}

/// Record one significant event: reconcile, reset or increment, flush.
///
/// # Errors
/// Only the final flush can fail; the in-memory record is updated either way.
pub fn apply_significant_event(
    store: &dyn SettingsStore,
    current_version: &str,
    now: DateTime<Utc>,
) -> Result<TrackingSnapshot, StoreError> {
    match reconcile(store, current_version) {
        Reconciliation::NoReset => {
            stamp_first_use_if_unset(store, now);
            let event_count = store.get_i64(keys::SIGNIFICANT_EVENT_COUNT) + 1;
            store.set_i64(keys::SIGNIFICANT_EVENT_COUNT, event_count);
            tracing::debug!("significant event count: {}", event_count);
        }
        Reconciliation::ResetRequired => {
            restart_tracking(store, ResetKind::Event, now);
        }
    }

    store.flush()?;
    Ok(TrackingSnapshot::read(store))
}

fn stamp_first_use_if_unset(store: &dyn SettingsStore, now: DateTime<Utc>) {
    if store.get_f64(keys::FIRST_USE_DATE) == 0.0 {
        store.set_f64(keys::FIRST_USE_DATE, now.timestamp() as f64);
    }
}
