//! Prompt coordination.
//!
//! [`PromptCoordinator`] ties the pieces together: host signals enter here,
//! get serialized onto the event worker, mutate the tracking record, and
//! (when both eligibility and appropriateness hold) drive the presentation
//! collaborator. The user's choice is written back through the settings
//! store before the prompt returns to hidden.
//!
//! ## Visibility state machine
//!
//! ```text
//! Hidden -> Displaying -> {accepted | declined | deferred | dismissed} -> Hidden
//! ```
//!
//! Accepting sets `ratedCurrentVersion` and opens the store listing,
//! declining sets `declinedToRate`, deferring stamps `reminderRequestDate`.
//! A dismissal (host lost foreground focus) records nothing.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::config::{HostInfo, RatingConfig};
use crate::eligibility;
use crate::error::{ConfigError, Result};
use crate::hooks::PromptHooks;
use crate::presentation::{Presenter, PromptChoice, PromptContent};
use crate::review_url;
use crate::serializer::EventSerializer;
use crate::store::{keys, SettingsStore};
use crate::tracking::{self, TrackingSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Hidden,
    Displaying,
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Launch,
    SignificantEvent,
}

/// Orchestrates tracking, eligibility, and presentation.
pub struct PromptCoordinator {
    inner: Arc<Inner>,
    serializer: EventSerializer,
}

struct Inner {
    config: RatingConfig,
    host: HostInfo,
    store: Arc<dyn SettingsStore>,
    presenter: Arc<dyn Presenter>,
    hooks: PromptHooks,
    visibility: Mutex<Visibility>,
}

impl PromptCoordinator {
    /// Build a coordinator with no lifecycle hooks.
    pub fn new(
        config: RatingConfig,
        host: HostInfo,
        store: Arc<dyn SettingsStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self::with_hooks(config, host, store, presenter, PromptHooks::default())
    }

    /// Build a coordinator with lifecycle hooks.
    pub fn with_hooks(
        config: RatingConfig,
        host: HostInfo,
        store: Arc<dyn SettingsStore>,
        presenter: Arc<dyn Presenter>,
        hooks: PromptHooks,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                host,
                store,
                presenter,
                hooks,
                visibility: Mutex::new(Visibility::Hidden),
            }),
            serializer: EventSerializer::new(),
        }
    }

    /// Record an application launch (or return to foreground).
    ///
    /// Returns immediately; the increment and evaluation run serialized on
    /// the event worker. When `can_prompt` is false the counters still
    /// advance but no prompt is considered.
    pub fn record_launch(&self, can_prompt: bool) {
        let inner = Arc::clone(&self.inner);
        self.serializer
            .submit(move || inner.increment_and_evaluate(EventKind::Launch, can_prompt));
    }

    /// Record a significant event. Same contract as [`record_launch`](Self::record_launch).
    pub fn record_significant_event(&self, can_prompt: bool) {
        let inner = Arc::clone(&self.inner);
        self.serializer
            .submit(move || inner.increment_and_evaluate(EventKind::SignificantEvent, can_prompt));
    }

    /// The host is about to lose foreground focus: hide a displayed prompt
    /// without recording anything.
    pub fn app_will_resign_active(&self) {
        self.inner.hide_prompt();
    }

    /// Show the prompt if appropriate, bypassing the usage thresholds.
    ///
    /// Honors the declined/rated/visible/network checks but not
    /// [`eligibility::is_eligible`]. Runs on the calling thread.
    ///
    /// # Errors
    /// Propagates presentation failures and a missing app id on accept.
    pub fn show_prompt_if_appropriate(&self) -> Result<()> {
        let snapshot = self.snapshot();
        let displaying = self.inner.is_displaying();
        if !eligibility::is_prompt_appropriate(
            &snapshot,
            self.inner.presenter.is_network_reachable(),
            displaying,
        ) {
            return Ok(());
        }
        self.inner.run_prompt_flow(true)
    }

    /// Show the prompt unconditionally, bypassing both eligibility and
    /// appropriateness. `show_later_button` omits the remind-later option.
    ///
    /// # Errors
    /// Propagates presentation failures and a missing app id on accept.
    pub fn force_show_prompt(&self, show_later_button: bool) -> Result<()> {
        self.inner.run_prompt_flow(show_later_button)
    }

    /// Current tracking record.
    pub fn snapshot(&self) -> TrackingSnapshot {
        TrackingSnapshot::read(&*self.inner.store)
    }

    /// Block until every previously recorded event has been processed.
    pub fn wait_idle(&self) {
        self.serializer.wait_idle();
    }
}

impl Inner {
    fn is_displaying(&self) -> bool {
        *self.visibility.lock().expect("visibility lock poisoned") == Visibility::Displaying
    }

    fn set_hidden(&self) {
        *self.visibility.lock().expect("visibility lock poisoned") = Visibility::Hidden;
    }

    /// The serialized unit of work: reconcile + increment + flush, then
    /// evaluate and possibly prompt.
    fn increment_and_evaluate(&self, kind: EventKind, can_prompt: bool) {
        let now = Utc::now();
        let applied = match kind {
            EventKind::Launch => tracking::apply_launch(&*self.store, &self.host.app_version, now),
            EventKind::SignificantEvent => {
                tracking::apply_significant_event(&*self.store, &self.host.app_version, now)
            }
        };

        let snapshot = match applied {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("failed to persist tracking state: {}", e);
                return;
            }
        };

        if !can_prompt {
            return;
        }
        if !eligibility::is_eligible(&snapshot, &self.config, now) {
            return;
        }
        if !eligibility::is_prompt_appropriate(
            &snapshot,
            self.presenter.is_network_reachable(),
            self.is_displaying(),
        ) {
            return;
        }

        if let Err(e) = self.run_prompt_flow(true) {
            tracing::warn!("prompt attempt aborted: {}", e);
        }
    }

    /// Display the prompt and record the outcome.
    ///
    /// Presentation failures abort without touching the store. The veto
    /// hook may suppress the display; that is not an error.
    fn run_prompt_flow(&self, show_later_button: bool) -> Result<()> {
        if !self.hooks.allows_display() {
            tracing::debug!("prompt display vetoed by hook");
            return Ok(());
        }

        {
            let mut visibility = self.visibility.lock().expect("visibility lock poisoned");
            if *visibility == Visibility::Displaying {
                return Ok(());
            }
            *visibility = Visibility::Displaying;
        }

        let content = PromptContent::resolve(&self.config, &self.host.app_name);
        let choice = match self.presenter.present_prompt(&content, show_later_button) {
            Ok(choice) => choice,
            Err(e) => {
                self.set_hidden();
                return Err(e.into());
            }
        };

        PromptHooks::fire(&self.hooks.did_display);
        let result = self.record_choice(choice);
        self.set_hidden();
        result
    }

    fn record_choice(&self, choice: PromptChoice) -> Result<()> {
        match choice {
            PromptChoice::Rate => {
                self.store.set_bool(keys::RATED_CURRENT_VERSION, true);
                self.store.flush()?;
                PromptHooks::fire(&self.hooks.did_opt_to_rate);
                self.open_store_listing()
            }
            PromptChoice::Later => {
                self.store
                    .set_f64(keys::REMINDER_REQUEST_DATE, Utc::now().timestamp() as f64);
                self.store.flush()?;
                PromptHooks::fire(&self.hooks.did_opt_to_remind_later);
                Ok(())
            }
            PromptChoice::Cancel => {
                self.store.set_bool(keys::DECLINED_TO_RATE, true);
                self.store.flush()?;
                PromptHooks::fire(&self.hooks.did_decline);
                Ok(())
            }
        }
    }

    /// Open the store listing: in-app modal view when the platform and
    /// presenter support it, else the OS-version review URL.
    fn open_store_listing(&self) -> Result<()> {
        let app_id = self
            .config
            .app_id
            .as_deref()
            .ok_or(ConfigError::MissingAppId)?;

        if review_url::opens_in_app_store(&self.host.os_version)
            && self.presenter.supports_modal_store_view()
        {
            let animated = self.config.use_animation;
            PromptHooks::fire_animated(&self.hooks.will_present_modal, animated);
            self.presenter.present_modal_store_view(app_id, animated)?;
            PromptHooks::fire_animated(&self.hooks.did_dismiss_modal, animated);
            Ok(())
        } else {
            let url = review_url::review_url(&self.host.os_version, app_id);
            self.presenter.open_store_listing(&url)?;
            Ok(())
        }
    }

    fn hide_prompt(&self) {
        let mut visibility = self.visibility.lock().expect("visibility lock poisoned");
        if *visibility == Visibility::Displaying {
            tracing::debug!("hiding rating prompt");
            self.presenter.dismiss_prompt();
            *visibility = Visibility::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, PresentError};
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    /// Presenter that returns a scripted choice and records every call.
    struct ScriptedPresenter {
        choice: StdMutex<std::result::Result<PromptChoice, PresentError>>,
        prompts: AtomicUsize,
        opened_urls: StdMutex<Vec<String>>,
        later_buttons: StdMutex<Vec<bool>>,
    }

    impl ScriptedPresenter {
        fn answering(choice: PromptChoice) -> Self {
            Self {
                choice: StdMutex::new(Ok(choice)),
                prompts: AtomicUsize::new(0),
                opened_urls: StdMutex::new(Vec::new()),
                later_buttons: StdMutex::new(Vec::new()),
            }
        }

        fn failing(error: PresentError) -> Self {
            Self {
                choice: StdMutex::new(Err(error)),
                prompts: AtomicUsize::new(0),
                opened_urls: StdMutex::new(Vec::new()),
                later_buttons: StdMutex::new(Vec::new()),
            }
        }

        fn prompt_count(&self) -> usize {
            self.prompts.load(Ordering::SeqCst)
        }
    }

    impl Presenter for ScriptedPresenter {
        fn present_prompt(
            &self,
            _content: &PromptContent,
            show_later_button: bool,
        ) -> std::result::Result<PromptChoice, PresentError> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            self.later_buttons.lock().unwrap().push(show_later_button);
            match &*self.choice.lock().unwrap() {
                Ok(choice) => Ok(*choice),
                Err(PresentError::NoAnchor) => Err(PresentError::NoAnchor),
                Err(PresentError::Dismissed) => Err(PresentError::Dismissed),
                Err(e) => Err(PresentError::Failed(e.to_string())),
            }
        }

        fn dismiss_prompt(&self) {}

        fn open_store_listing(&self, url: &str) -> std::result::Result<(), PresentError> {
            self.opened_urls.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn eligible_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set_str(keys::CURRENT_VERSION, "1.0");
        store.set_f64(
            keys::FIRST_USE_DATE,
            (Utc::now() - chrono::Duration::days(31)).timestamp() as f64,
        );
        store.set_i64(keys::USE_COUNT, 19);
        store
    }

    fn config_with_app_id() -> RatingConfig {
        let mut config = RatingConfig::default();
        config.app_id = Some("4815162342".to_string());
        config
    }

    fn host() -> HostInfo {
        HostInfo {
            app_name: "Orbit".to_string(),
            app_version: "1.0".to_string(),
            os_version: "9.0".to_string(),
        }
    }

    #[test]
    fn eligible_launch_prompts_and_accept_records_rating() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert_eq!(presenter.prompt_count(), 1);
        assert!(store.get_bool(keys::RATED_CURRENT_VERSION));
        let urls = presenter.opened_urls.lock().unwrap();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("id=4815162342"));
    }

    #[test]
    fn decline_sets_terminal_flag_and_blocks_future_prompts() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Cancel));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.record_launch(true);
        coordinator.wait_idle();
        assert!(store.get_bool(keys::DECLINED_TO_RATE));

        // Declined is terminal: further launches never prompt.
        coordinator.record_launch(true);
        coordinator.wait_idle();
        assert_eq!(presenter.prompt_count(), 1);
    }

    #[test]
    fn defer_stamps_reminder_date() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Later));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        let before = Utc::now().timestamp() as f64;
        coordinator.record_launch(true);
        coordinator.wait_idle();

        let reminder = store.get_f64(keys::REMINDER_REQUEST_DATE);
        assert!(reminder >= before);
        // Cooldown now blocks the next prompt.
        coordinator.record_launch(true);
        coordinator.wait_idle();
        assert_eq!(presenter.prompt_count(), 1);
    }

    #[test]
    fn not_eligible_never_presents() {
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert_eq!(presenter.prompt_count(), 0);
        assert_eq!(store.get_i64(keys::USE_COUNT), 1);
    }

    #[test]
    fn can_prompt_false_still_counts_but_never_prompts() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.record_launch(false);
        coordinator.wait_idle();

        assert_eq!(presenter.prompt_count(), 0);
        assert_eq!(store.get_i64(keys::USE_COUNT), 20);
    }

    #[test]
    fn presentation_failure_aborts_without_mutating_state() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::failing(PresentError::NoAnchor));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert!(!store.get_bool(keys::RATED_CURRENT_VERSION));
        assert!(!store.get_bool(keys::DECLINED_TO_RATE));
        assert_eq!(store.get_f64(keys::REMINDER_REQUEST_DATE), 0.0);
        // The failed attempt returned the prompt to hidden; a forced show
        // can run again.
        assert!(!coordinator.inner.is_displaying());
    }

    #[test]
    fn force_show_bypasses_eligibility_and_appropriateness() {
        let store = Arc::new(MemoryStore::new());
        store.set_bool(keys::DECLINED_TO_RATE, true);
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Later));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.force_show_prompt(true).unwrap();

        assert_eq!(presenter.prompt_count(), 1);
        assert_eq!(presenter.later_buttons.lock().unwrap()[0], true);
    }

    #[test]
    fn force_show_can_omit_later_button() {
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Cancel));
        let coordinator =
            PromptCoordinator::new(config_with_app_id(), host(), store, presenter.clone());

        coordinator.force_show_prompt(false).unwrap();

        assert_eq!(presenter.later_buttons.lock().unwrap()[0], false);
    }

    #[test]
    fn checked_show_honors_appropriateness_but_not_eligibility() {
        // Zero counters: not eligible, but nothing makes it inappropriate.
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Later));
        let coordinator = PromptCoordinator::new(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        coordinator.show_prompt_if_appropriate().unwrap();
        assert_eq!(presenter.prompt_count(), 1);

        // Rated makes it inappropriate; checked show is now a no-op.
        store.set_bool(keys::RATED_CURRENT_VERSION, true);
        coordinator.show_prompt_if_appropriate().unwrap();
        assert_eq!(presenter.prompt_count(), 1);
    }

    #[test]
    fn veto_hook_suppresses_display_without_state_change() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let mut hooks = PromptHooks::new();
        hooks.should_display = Some(Box::new(|| false));
        let coordinator = PromptCoordinator::with_hooks(
            config_with_app_id(),
            host(),
            store.clone(),
            presenter.clone(),
            hooks,
        );

        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert_eq!(presenter.prompt_count(), 0);
        assert!(!store.get_bool(keys::RATED_CURRENT_VERSION));
    }

    #[test]
    fn choice_hooks_fire() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let displayed = Arc::new(AtomicUsize::new(0));
        let rated = Arc::new(AtomicUsize::new(0));

        let mut hooks = PromptHooks::new();
        let counter = Arc::clone(&displayed);
        hooks.did_display = Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&rated);
        hooks.did_opt_to_rate = Some(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let coordinator =
            PromptCoordinator::with_hooks(config_with_app_id(), host(), store, presenter, hooks);
        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert_eq!(displayed.load(Ordering::SeqCst), 1);
        assert_eq!(rated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn accept_without_app_id_is_a_hard_error() {
        let store = Arc::new(MemoryStore::new());
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let coordinator = PromptCoordinator::new(
            RatingConfig::default(),
            host(),
            store.clone(),
            presenter.clone(),
        );

        let result = coordinator.force_show_prompt(true);

        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::MissingAppId))
        ));
        // The rating choice itself was recorded before the precondition
        // failed; only the store-listing open is aborted.
        assert!(store.get_bool(keys::RATED_CURRENT_VERSION));
        assert!(presenter.opened_urls.lock().unwrap().is_empty());
    }

    #[test]
    fn debug_mode_prompts_on_first_launch() {
        let store = Arc::new(MemoryStore::new());
        let mut config = config_with_app_id();
        config.debug_mode = true;
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Later));
        let coordinator = PromptCoordinator::new(config, host(), store, presenter.clone());

        coordinator.record_launch(true);
        coordinator.wait_idle();

        assert_eq!(presenter.prompt_count(), 1);
    }

    #[test]
    fn version_7_host_accept_opens_v7_url() {
        let store = eligible_store();
        let presenter = Arc::new(ScriptedPresenter::answering(PromptChoice::Rate));
        let mut host = host();
        host.os_version = "7.5".to_string();
        let coordinator =
            PromptCoordinator::new(config_with_app_id(), host, store, presenter.clone());

        coordinator.record_launch(true);
        coordinator.wait_idle();

        let urls = presenter.opened_urls.lock().unwrap();
        assert_eq!(urls[0], "itms-apps://itunes.apple.com/app/id4815162342");
    }
}
