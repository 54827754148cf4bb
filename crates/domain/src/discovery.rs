//! Sensor auto-discovery by naming convention.
//!
//! A sensor belongs to a room when its entity id contains the sensor-kind
//! keyword and either its entity id or its friendly name mentions the room.

use crate::entity::{EntityId, EntitySnapshot};

/// Entity id marker of door/window binary sensors.
pub const KEYWORD_DOOR_WINDOW: &str = "binary_sensor.door_window_";
/// Entity id marker of temperature sensors.
pub const KEYWORD_TEMPERATURE: &str = "sensor.temperature_";

/// Return the ids of all `states` matching `keyword` and `room_alias`.
///
/// The room match is a case-insensitive substring search over
/// `entity_id|friendly_name`.
#[must_use]
pub fn find_sensors(keyword: &str, room_alias: &str, states: &[EntitySnapshot]) -> Vec<EntityId> {
    let room = room_alias.to_lowercase();

    states
        .iter()
        .filter(|snapshot| snapshot.entity_id.as_str().contains(keyword))
        .filter(|snapshot| {
            let haystack = format!(
                "{}|{}",
                snapshot.entity_id,
                snapshot.friendly_name.as_deref().unwrap_or_default()
            )
            .to_lowercase();
            haystack.contains(&room)
        })
        .map(|snapshot| snapshot.entity_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    fn snapshot(entity_id: &str, friendly_name: Option<&str>) -> EntitySnapshot {
        EntitySnapshot {
            entity_id: EntityId::new(entity_id).unwrap(),
            state: "off".to_string(),
            friendly_name: friendly_name.map(str::to_string),
            last_changed: now(),
        }
    }

    #[test]
    fn should_match_room_name_in_friendly_name() {
        let states = vec![
            snapshot("binary_sensor.door_window_1", Some("Kitchen Window")),
            snapshot("binary_sensor.door_window_2", Some("Living Room Window")),
        ];
        let found = find_sensors(KEYWORD_DOOR_WINDOW, "kitchen", &states);
        assert_eq!(found, vec![states[0].entity_id.clone()]);
    }

    #[test]
    fn should_match_room_name_in_entity_id() {
        let states = vec![snapshot("sensor.temperature_bathroom", None)];
        let found = find_sensors(KEYWORD_TEMPERATURE, "Bathroom", &states);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn should_require_keyword_in_entity_id() {
        let states = vec![
            snapshot("sensor.humidity_kitchen", Some("Kitchen Humidity")),
            snapshot("binary_sensor.motion_kitchen", Some("Kitchen Motion")),
        ];
        assert!(find_sensors(KEYWORD_TEMPERATURE, "kitchen", &states).is_empty());
        assert!(find_sensors(KEYWORD_DOOR_WINDOW, "kitchen", &states).is_empty());
    }

    #[test]
    fn should_return_empty_when_nothing_matches() {
        assert!(find_sensors(KEYWORD_DOOR_WINDOW, "attic", &[]).is_empty());
    }
}
