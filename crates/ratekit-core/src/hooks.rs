//! Optional lifecycle callbacks.
//!
//! Each hook is independently optional and fires at one transition of the
//! prompt state machine. None of them can alter the machine except
//! `should_display`, which may veto the display.

/// Plain notification callback.
pub type Hook = Box<dyn Fn() + Send + Sync>;
/// Veto callback: return false to suppress the display.
pub type VetoHook = Box<dyn Fn() -> bool + Send + Sync>;
/// Callback receiving the configured animation flag.
pub type AnimatedHook = Box<dyn Fn(bool) + Send + Sync>;

/// Capability set of prompt lifecycle callbacks. Unset fields are no-ops.
#[derive(Default)]
pub struct PromptHooks {
    /// May veto the display; called before anything is shown.
    pub should_display: Option<VetoHook>,
    /// The prompt was displayed.
    pub did_display: Option<Hook>,
    /// The user permanently declined.
    pub did_decline: Option<Hook>,
    /// The user opted to rate.
    pub did_opt_to_rate: Option<Hook>,
    /// The user asked to be reminded later.
    pub did_opt_to_remind_later: Option<Hook>,
    /// The in-app store view is about to be presented.
    pub will_present_modal: Option<AnimatedHook>,
    /// The in-app store view was dismissed.
    pub did_dismiss_modal: Option<AnimatedHook>,
}

impl PromptHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// True unless a veto hook is present and returns false.
    pub(crate) fn allows_display(&self) -> bool {
        self.should_display.as_ref().map_or(true, |hook| hook())
    }

    pub(crate) fn fire(hook: &Option<Hook>) {
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) fn fire_animated(hook: &Option<AnimatedHook>, animated: bool) {
        if let Some(hook) = hook {
            hook(animated);
        }
    }
}

impl std::fmt::Debug for PromptHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptHooks")
            .field("should_display", &self.should_display.is_some())
            .field("did_display", &self.did_display.is_some())
            .field("did_decline", &self.did_decline.is_some())
            .field("did_opt_to_rate", &self.did_opt_to_rate.is_some())
            .field(
                "did_opt_to_remind_later",
                &self.did_opt_to_remind_later.is_some(),
            )
            .field("will_present_modal", &self.will_present_modal.is_some())
            .field("did_dismiss_modal", &self.did_dismiss_modal.is_some())
            .finish()
    }
}
