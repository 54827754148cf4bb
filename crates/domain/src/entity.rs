//! Entity — a uniquely identified sensor tracked by the host state store.
//!
//! NotiFreeze never owns entities. It refers to them by [`EntityId`] and reads
//! their state through the host on every use.

mod state;

pub use state::EntityState;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Host entity identifier in `<domain>.<object_id>` form
/// (e.g. `binary_sensor.door_window_kitchen`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Validate and wrap an entity identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEntityId`] unless the value contains
    /// exactly one `.` with non-empty text on both sides.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        match value.split_once('.') {
            Some((domain, object_id))
                if !domain.is_empty() && !object_id.is_empty() && !object_id.contains('.') =>
            {
                Ok(Self(value))
            }
            _ => Err(ValidationError::InvalidEntityId(value)),
        }
    }

    /// The domain part (`binary_sensor` in `binary_sensor.door_window_kitchen`).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('.').map_or("", |(domain, _)| domain)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Point-in-time view of an entity as listed by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity_id: EntityId,
    /// Raw state string (`on`, `21.5`, `unavailable`, …).
    pub state: String,
    pub friendly_name: Option<String>,
    pub last_changed: Timestamp,
}

/// A state transition pushed by the host for a subscribed entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub entity_id: EntityId,
    pub old: EntityState,
    pub new: EntityState,
}

impl StateChange {
    /// `off → on`: a door or window was opened.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.old == EntityState::Off && self.new == EntityState::On
    }

    /// `on → off`: a door or window was closed.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.old == EntityState::On && self.new == EntityState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> EntityId {
        EntityId::new(value).unwrap()
    }

    #[test]
    fn should_expose_domain_part() {
        let entity = id("binary_sensor.door_window_kitchen");
        assert_eq!(entity.domain(), "binary_sensor");
    }

    #[test]
    fn should_reject_id_without_dot() {
        assert_eq!(
            EntityId::new("kitchen"),
            Err(ValidationError::InvalidEntityId("kitchen".to_string()))
        );
    }

    #[test]
    fn should_reject_id_with_empty_half() {
        assert!(EntityId::new(".kitchen").is_err());
        assert!(EntityId::new("sensor.").is_err());
    }

    #[test]
    fn should_reject_id_with_two_dots() {
        assert!(EntityId::new("sensor.temperature.kitchen").is_err());
    }

    #[test]
    fn should_deserialize_from_plain_string() {
        let parsed: EntityId = serde_json::from_str("\"sensor.temperature_kitchen\"").unwrap();
        assert_eq!(parsed, id("sensor.temperature_kitchen"));
    }

    #[test]
    fn should_fail_to_deserialize_invalid_id() {
        assert!(serde_json::from_str::<EntityId>("\"garbage\"").is_err());
    }

    #[test]
    fn should_detect_opening_and_closing_transitions() {
        let opening = StateChange {
            entity_id: id("binary_sensor.door_window_kitchen"),
            old: EntityState::Off,
            new: EntityState::On,
        };
        assert!(opening.is_opening());
        assert!(!opening.is_closing());

        let closing = StateChange {
            old: EntityState::On,
            new: EntityState::Off,
            ..opening.clone()
        };
        assert!(closing.is_closing());
        assert!(!closing.is_opening());
    }

    #[test]
    fn should_treat_unavailable_to_on_as_neither() {
        let change = StateChange {
            entity_id: id("binary_sensor.door_window_kitchen"),
            old: EntityState::Unavailable,
            new: EntityState::On,
        };
        assert!(!change.is_opening());
        assert!(!change.is_closing());
    }
}
