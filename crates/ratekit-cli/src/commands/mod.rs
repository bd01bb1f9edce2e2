pub mod config;
pub mod event;
pub mod launch;
pub mod prompt;
pub mod reset;
pub mod status;

use std::sync::Arc;

use ratekit_core::{FileStore, Profile, PromptCoordinator};

use crate::presenter::TerminalPresenter;

/// Build the coordinator every subcommand drives: persisted profile,
/// default settings store, terminal presenter.
pub fn build_coordinator() -> Result<PromptCoordinator, Box<dyn std::error::Error>> {
    let profile = Profile::load_or_default();
    let store = Arc::new(FileStore::open_default()?);
    let presenter = Arc::new(TerminalPresenter::new());
    Ok(PromptCoordinator::new(
        profile.rating,
        profile.host,
        store,
        presenter,
    ))
}
