//! Room — a named group of door/window and indoor temperature sensors.

use std::collections::{BTreeSet, HashMap};

use crate::entity::EntityId;
use crate::error::{NotiFreezeError, ValidationError};
use crate::id::TimerHandle;

/// A watched room and its pending reminders.
///
/// The timer map is private: [`track_timer`](Self::track_timer) and
/// [`take_timer`](Self::take_timer) are the only ways to change it, which
/// keeps at most one pending reminder per door/window sensor.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub door_window: BTreeSet<EntityId>,
    pub temperature: BTreeSet<EntityId>,
    /// Extra data attached to this room's notifications.
    pub push_data: serde_json::Value,
    timers: HashMap<EntityId, TimerHandle>,
}

impl Room {
    /// Create a builder for constructing a [`Room`].
    #[must_use]
    pub fn builder() -> RoomBuilder {
        RoomBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`NotiFreezeError::Validation`] when `name` is empty.
    pub fn validate(&self) -> Result<(), NotiFreezeError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Whether the room has at least one door/window and one indoor sensor.
    #[must_use]
    pub fn is_watchable(&self) -> bool {
        !self.door_window.is_empty() && !self.temperature.is_empty()
    }

    #[must_use]
    pub fn watches(&self, entity_id: &EntityId) -> bool {
        self.door_window.contains(entity_id)
    }

    /// Record the pending reminder for `entity_id`.
    ///
    /// Returns the handle it replaces, which the caller must cancel.
    pub fn track_timer(&mut self, entity_id: EntityId, handle: TimerHandle) -> Option<TimerHandle> {
        self.timers.insert(entity_id, handle)
    }

    /// Forget the pending reminder for `entity_id`, returning its handle.
    pub fn take_timer(&mut self, entity_id: &EntityId) -> Option<TimerHandle> {
        self.timers.remove(entity_id)
    }

    #[must_use]
    pub fn timer(&self, entity_id: &EntityId) -> Option<TimerHandle> {
        self.timers.get(entity_id).copied()
    }

    /// Number of sensors with a pending reminder.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

/// Step-by-step builder for [`Room`].
#[derive(Debug, Default)]
pub struct RoomBuilder {
    name: Option<String>,
    door_window: BTreeSet<EntityId>,
    temperature: BTreeSet<EntityId>,
    push_data: Option<serde_json::Value>,
}

impl RoomBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn door_window(mut self, entity_id: EntityId) -> Self {
        self.door_window.insert(entity_id);
        self
    }

    #[must_use]
    pub fn door_windows(mut self, entity_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.door_window.extend(entity_ids);
        self
    }

    #[must_use]
    pub fn temperature(mut self, entity_id: EntityId) -> Self {
        self.temperature.insert(entity_id);
        self
    }

    #[must_use]
    pub fn temperatures(mut self, entity_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.temperature.extend(entity_ids);
        self
    }

    #[must_use]
    pub fn push_data(mut self, data: serde_json::Value) -> Self {
        self.push_data = Some(data);
        self
    }

    /// Consume the builder, validate, and return a [`Room`].
    ///
    /// # Errors
    ///
    /// Returns [`NotiFreezeError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Room, NotiFreezeError> {
        let room = Room {
            name: self.name.unwrap_or_default(),
            door_window: self.door_window,
            temperature: self.temperature,
            push_data: self
                .push_data
                .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new())),
            timers: HashMap::new(),
        };
        room.validate()?;
        Ok(room)
    }
}
