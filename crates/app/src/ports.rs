//! Port definitions — traits the host implements.
//!
//! The monitor never talks to the host directly; every interaction goes
//! through one of these traits so that any runtime (or a test fake) can
//! drive it.

pub mod notifier;
pub mod scheduler;
pub mod state_store;

pub use notifier::Notifier;
pub use scheduler::Scheduler;
pub use state_store::StateStore;
