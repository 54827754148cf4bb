//! Reminder — the payload carried by a scheduled timer.

use crate::entity::EntityId;

/// What the monitor needs to re-check a sensor when its timer fires.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// The door/window sensor that was opened.
    pub entity_id: EntityId,
    /// Name of the room owning the sensor.
    pub room: String,
    /// 1 for the first reminder, incremented on every reschedule.
    pub counter: u32,
    /// Indoor temperature when the sensor was opened.
    pub initial: f64,
}

impl Reminder {
    /// First reminder after `entity_id` opened with indoor temperature `initial`.
    #[must_use]
    pub fn first(entity_id: EntityId, room: impl Into<String>, initial: f64) -> Self {
        Self {
            entity_id,
            room: room.into(),
            counter: 1,
            initial,
        }
    }

    /// The follow-up reminder, keeping the same `initial` temperature.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            counter: self.counter.saturating_add(1),
            ..self.clone()
        }
    }
}
