//! # notifreeze-adapter-virtual
//!
//! A small in-process host for the freeze monitor, used by the daemon and by
//! integration tests.
//!
//! | Port | Implementation | Behaviour |
//! |------|----------------|-----------|
//! | `StateStore` | [`VirtualStateStore`] | In-memory entities; pushes changes of subscribed entities |
//! | `Scheduler` | [`TokioScheduler`] | One spawned, abortable `tokio` task per timer |
//! | `Notifier` | [`LogNotifier`] | Logs and records every notification |
//!
//! [`VirtualHost`] owns the receiving ends of the change and timer channels
//! and feeds them to the monitor one at a time.
//!
//! ## Dependency rule
//!
//! Depends on `notifreeze-app` (port traits) and `notifreeze-domain` only.

pub mod config;
pub mod error;
mod host;
mod notifier;
mod scheduler;
mod state_store;

pub use config::{ScenarioStep, VirtualConfig, VirtualEntity};
pub use error::VirtualError;
pub use host::VirtualHost;
pub use notifier::{LogNotifier, SentNotification};
pub use scheduler::{FiredTimer, TokioScheduler};
pub use state_store::VirtualStateStore;
