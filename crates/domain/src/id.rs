//! Opaque timer handles backed by UUIDs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle returned by the host scheduler for a pending reminder.
///
/// Only the scheduler that issued a handle can interpret it; the monitor
/// stores it so the timer can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(uuid::Uuid);

impl Default for TimerHandle {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl TimerHandle {
    /// Generate a new random handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
