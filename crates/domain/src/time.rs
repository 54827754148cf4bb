//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for `last_changed` values.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Time elapsed since `since`, clamped at zero for timestamps in the future.
#[must_use]
pub fn elapsed_since(since: Timestamp, now: Timestamp) -> TimeDelta {
    (now - since).max(TimeDelta::zero())
}
