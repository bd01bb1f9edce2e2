//! The presentation collaborator boundary.
//!
//! Everything UI-shaped lives behind [`Presenter`]: showing the prompt and
//! waiting for the user's answer, dismissing it, opening a store listing,
//! and (where the platform has one) presenting an in-app store view. The
//! core never touches a window system.

use crate::config::RatingConfig;
use crate::error::PresentError;

/// What the user chose when the prompt was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    /// Rate now; opens the store listing.
    Rate,
    /// Remind me later; starts the reminder cooldown.
    Later,
    /// No thanks; a terminal decline for this version.
    Cancel,
}

/// Resolved prompt text: config overrides applied over app-name defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContent {
    pub title: String,
    pub message: String,
    pub rate_label: String,
    pub later_label: String,
    pub cancel_label: String,
}

impl PromptContent {
    /// Default strings built from the application's display name.
    pub fn for_app(app_name: &str) -> Self {
        Self {
            title: format!("Rate {app_name}"),
            message: format!(
                "If you enjoy using {app_name}, would you mind taking a moment to rate it? \
                 It won't take more than a minute. Thanks for your support!"
            ),
            rate_label: format!("Rate {app_name}"),
            later_label: "Remind me later".to_string(),
            cancel_label: "No, Thanks".to_string(),
        }
    }

    /// Defaults with any configured overrides applied on top.
    pub fn resolve(config: &RatingConfig, app_name: &str) -> Self {
        let mut content = Self::for_app(app_name);
        if let Some(title) = &config.alert_title {
            content.title = title.clone();
        }
        if let Some(message) = &config.alert_message {
            content.message = message.clone();
        }
        if let Some(label) = &config.alert_rate_label {
            content.rate_label = label.clone();
        }
        if let Some(label) = &config.alert_later_label {
            content.later_label = label.clone();
        }
        if let Some(label) = &config.alert_cancel_label {
            content.cancel_label = label.clone();
        }
        content
    }
}

/// External collaborator that owns all UI concerns.
///
/// `present_prompt` is synchronous from the coordinator's perspective: it
/// blocks until the user answers (or the prompt is torn down), marshaling
/// onto whatever thread its UI requires. Implementations decide what a
/// "prompt" looks like; the core only supplies the text.
pub trait Presenter: Send + Sync {
    /// Show the prompt and wait for a choice. `show_later_button` omits the
    /// remind-later option when false.
    ///
    /// # Errors
    /// Any error aborts the prompt attempt without recording a choice;
    /// [`PresentError::Dismissed`] is the teardown-before-answer case.
    fn present_prompt(
        &self,
        content: &PromptContent,
        show_later_button: bool,
    ) -> Result<PromptChoice, PresentError>;

    /// Tear down a currently displayed prompt, if any. The blocked
    /// `present_prompt` call then returns [`PresentError::Dismissed`].
    fn dismiss_prompt(&self);

    /// Open the store review page at `url`.
    ///
    /// # Errors
    /// Reported when the listing cannot be opened; no state is recorded
    /// beyond the already-written rated flag.
    fn open_store_listing(&self, url: &str) -> Result<(), PresentError>;

    /// Whether an in-app modal store view is available.
    fn supports_modal_store_view(&self) -> bool {
        false
    }

    /// Present the in-app store view for `app_id`, blocking until the user
    /// closes it.
    ///
    /// # Errors
    /// Defaults to unsupported; platforms with a store view override both
    /// this and [`supports_modal_store_view`](Presenter::supports_modal_store_view).
    fn present_modal_store_view(&self, app_id: &str, _animated: bool) -> Result<(), PresentError> {
        let _ = app_id;
        Err(PresentError::Unsupported("modal store view".to_string()))
    }

    /// Network reachability as seen by the presentation layer. The default
    /// stub always reports connected; a real implementation returning false
    /// short-circuits prompting as "not appropriate", never as an error.
    fn is_network_reachable(&self) -> bool {
        true
    }
}
