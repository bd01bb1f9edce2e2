//! The eligibility engine.
//!
//! Two pure predicates over a [`TrackingSnapshot`]: [`is_eligible`] answers
//! "have the usage thresholds been met", [`is_prompt_appropriate`] answers
//! "is showing a prompt acceptable right now". A prompt is shown only when
//! both hold; the forced-show path bypasses both.

use chrono::{DateTime, Utc};

use crate::config::RatingConfig;
use crate::tracking::TrackingSnapshot;

const SECS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// Have the configured usage thresholds been met?
///
/// Checks run in order and short-circuit: debug bypass, days since first
/// use, use count, significant events, reminder cooldown. A negative
/// `significant_events_until_prompt` disables that gate (any non-negative
/// count satisfies it). A `reminder_request_date` of 0 trivially passes the
/// cooldown.
pub fn is_eligible(
    snapshot: &TrackingSnapshot,
    config: &RatingConfig,
    now: DateTime<Utc>,
) -> bool {
    if config.debug_mode {
        return true;
    }

    let now_secs = now.timestamp() as f64;

    let time_since_first_use = now_secs - snapshot.first_use_date;
    if time_since_first_use < f64::from(config.days_until_prompt) * SECS_PER_DAY {
        return false;
    }

    if snapshot.use_count < config.uses_until_prompt {
        return false;
    }

    if snapshot.significant_event_count < config.significant_events_until_prompt {
        return false;
    }

    let time_since_reminder = now_secs - snapshot.reminder_request_date;
    if time_since_reminder < config.time_before_reminding * SECS_PER_DAY {
        return false;
    }

    true
}

/// Is a prompt acceptable right now, independent of usage thresholds?
///
/// False whenever the user has already rated or declined the tracked
/// version, a prompt is currently displayed, or the network is unreachable
/// (the collaborator reports reachability; the built-in stub reports true).
pub fn is_prompt_appropriate(
    snapshot: &TrackingSnapshot,
    network_reachable: bool,
    prompt_displayed: bool,
) -> bool {
    network_reachable
        && !snapshot.declined_to_rate
        && !snapshot.rated_current_version
        && !prompt_displayed
}
