//! # notifreeze-app
//!
//! Application layer — the freeze monitor and the **port definitions** (traits)
//! of the host it runs in.
//!
//! ## Responsibilities
//! - Define **port traits** the host must implement:
//!   - `StateStore` — read entity states, list entities, subscribe to changes
//!   - `Scheduler` — schedule and cancel one-shot reminders
//!   - `Notifier` — dispatch a notification
//! - Resolve the declarative configuration against the host (`setup`)
//! - React to state changes and timer firings (`FreezeMonitor`)
//!
//! ## Dependency rule
//! Depends on `notifreeze-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod monitor;
pub mod ports;
pub mod setup;

#[cfg(test)]
pub(crate) mod testing;
