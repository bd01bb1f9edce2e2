//! # Ratekit Core Library
//!
//! This library decides, from local usage signals, when to ask a user to
//! rate an application, and persists the decision state across launches.
//! It implements a CLI-first philosophy: everything is exercisable through
//! the standalone `ratekit-cli` binary, with host applications embedding
//! the same core library behind their own presentation layer.
//!
//! ## Architecture
//!
//! - **Settings store**: durable key/value storage for the tracking record;
//!   all other components depend on the trait, never on a storage mechanism
//! - **Tracking**: version-scoped counters with atomic reset on upgrade
//! - **Eligibility**: pure threshold predicates over a tracking snapshot
//! - **Event serializer**: one worker, strict FIFO, no overlapping mutation
//! - **Coordinator**: the prompt visibility state machine and choice recording
//!
//! ## Key Components
//!
//! - [`PromptCoordinator`]: entry point for host signals
//! - [`SettingsStore`]: storage abstraction ([`FileStore`], [`MemoryStore`])
//! - [`RatingConfig`]: immutable thresholds and prompt options
//! - [`Presenter`]: the external presentation collaborator

pub mod config;
pub mod coordinator;
pub mod eligibility;
pub mod error;
pub mod hooks;
pub mod presentation;
pub mod review_url;
pub mod serializer;
pub mod store;
pub mod tracking;

pub use config::{HostInfo, Profile, RatingConfig};
pub use coordinator::PromptCoordinator;
pub use error::{ConfigError, CoreError, PresentError, Result, StoreError};
pub use hooks::PromptHooks;
pub use presentation::{Presenter, PromptChoice, PromptContent};
pub use serializer::EventSerializer;
pub use store::{FileStore, MemoryStore, SettingsStore};
pub use tracking::{ResetKind, TrackingSnapshot};
