//! Declarative NotiFreeze configuration, as read from the `[notifreeze]` table.
//!
//! Every field has a default so that partial configuration parses. Semantic
//! checks (notify service present, outdoor sensors exist, …) happen when the
//! app layer resolves the configuration against the host.

use std::time::Duration;

use serde::Deserialize;

use crate::message::{Locale, MessageOverrides};
use crate::notify::PushConfig;

/// Default maximum tolerated |outdoor − indoor| in °C.
pub const DEFAULT_MAX_DIFFERENCE: f64 = 5.0;
/// Default delay before the first reminder, in minutes.
pub const DEFAULT_INITIAL_DELAY_MIN: u64 = 5;
/// Default delay between reminders, in minutes.
pub const DEFAULT_REMINDER_DELAY_MIN: u64 = 3;

const SECONDS_PER_MIN: u64 = 60;

/// Top-level component configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotiFreezeConfig {
    /// Notification service, e.g. `notify.mobile_app_phone`.
    pub notify_service: Option<String>,
    /// Outdoor temperature sensors.
    pub outdoor: EntityList,
    /// Rooms to watch.
    pub rooms: Vec<RoomConfig>,
    /// Maximum tolerated |outdoor − indoor| in °C.
    pub max_difference: f64,
    pub delays: Delays,
    pub locale: Locale,
    /// Custom message templates replacing the locale's.
    pub messages: MessageOverrides,
    /// Notify even when the indoor temperature did not change.
    pub always_notify: bool,
    /// iOS push settings attached to every notification.
    pub push: Option<PushConfig>,
}

impl Default for NotiFreezeConfig {
    fn default() -> Self {
        Self {
            notify_service: None,
            outdoor: EntityList::default(),
            rooms: Vec::new(),
            max_difference: DEFAULT_MAX_DIFFERENCE,
            delays: Delays::default(),
            locale: Locale::default(),
            messages: MessageOverrides::default(),
            always_notify: false,
            push: None,
        }
    }
}

/// Reminder delays, given in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Delays {
    /// Minutes between opening and the first reminder.
    pub initial: u64,
    /// Minutes between subsequent reminders.
    pub reminder: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_DELAY_MIN,
            reminder: DEFAULT_REMINDER_DELAY_MIN,
        }
    }
}

impl Delays {
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial.saturating_mul(SECONDS_PER_MIN))
    }

    #[must_use]
    pub fn reminder_delay(&self) -> Duration {
        Duration::from_secs(self.reminder.saturating_mul(SECONDS_PER_MIN))
    }
}

/// One entity id or a list of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct EntityList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for EntityList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(id) => Self(vec![id]),
            OneOrMany::Many(ids) => Self(ids),
        }
    }
}

impl EntityList {
    #[must_use]
    pub fn new(ids: Vec<String>) -> Self {
        Self(ids)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A room is either a bare name (everything auto-discovered) or a table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoomConfig {
    Name(String),
    Detailed(RoomDetails),
}

/// Explicit room settings. Missing sensor lists fall back to discovery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomDetails {
    pub name: String,
    /// Name used to discover sensors when it differs from `name`.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub door_window: Option<EntityList>,
    #[serde(default)]
    pub indoor: Option<EntityList>,
}

impl RoomConfig {
    /// Configured room name, as written.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed(details) => &details.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = NotiFreezeConfig::default();
        assert!(config.notify_service.is_none());
        assert!(config.outdoor.is_empty());
        assert!((config.max_difference - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.delays.initial, 5);
        assert_eq!(config.delays.reminder, 3);
        assert_eq!(config.locale, Locale::EnUs);
        assert!(!config.always_notify);
    }

    #[test]
    fn should_convert_delays_to_durations() {
        let delays = Delays::default();
        assert_eq!(delays.initial_delay(), Duration::from_secs(300));
        assert_eq!(delays.reminder_delay(), Duration::from_secs(180));
    }

    #[test]
    fn should_saturate_delays_when_minutes_are_huge() {
        let delays = Delays {
            initial: u64::MAX,
            reminder: u64::MAX / 2,
        };
        assert_eq!(delays.initial_delay(), Duration::from_secs(u64::MAX));
        assert_eq!(delays.reminder_delay(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            notify_service = "notify.mobile_app_phone"
            outdoor = ["sensor.temperature_garden", "sensor.temperature_balcony"]
            max_difference = 3.5
            locale = "de_DE"
            always_notify = true
            rooms = [
                "bathroom",
                { name = "kitchen", alias = "kueche", door_window = "binary_sensor.door_window_kitchen" },
            ]

            [delays]
            initial = 2
            reminder = 10

            [messages]
            since = "{room_name} open"
        "#;
        let config: NotiFreezeConfig = toml::from_str(toml).unwrap();

        assert_eq!(
            config.notify_service.as_deref(),
            Some("notify.mobile_app_phone")
        );
        assert_eq!(
            config.outdoor.iter().collect::<Vec<_>>(),
            vec!["sensor.temperature_garden", "sensor.temperature_balcony"]
        );
        assert!((config.max_difference - 3.5).abs() < f64::EPSILON);
        assert_eq!(config.locale, Locale::DeDe);
        assert!(config.always_notify);
        assert_eq!(config.delays, Delays { initial: 2, reminder: 10 });
        assert_eq!(config.messages.since.as_deref(), Some("{room_name} open"));
        assert!(config.messages.change.is_none());

        assert_eq!(config.rooms.len(), 2);
        assert_eq!(config.rooms[0], RoomConfig::Name("bathroom".to_string()));
        let RoomConfig::Detailed(kitchen) = &config.rooms[1] else {
            panic!("expected detailed room");
        };
        assert_eq!(kitchen.alias.as_deref(), Some("kueche"));
        assert_eq!(
            kitchen.door_window,
            Some(EntityList::new(vec![
                "binary_sensor.door_window_kitchen".to_string()
            ]))
        );
        assert!(kitchen.indoor.is_none());
    }

    #[test]
    fn should_accept_single_outdoor_sensor_as_string() {
        let config: NotiFreezeConfig =
            toml::from_str(r#"outdoor = "sensor.temperature_garden""#).unwrap();
        assert_eq!(
            config.outdoor.iter().collect::<Vec<_>>(),
            vec!["sensor.temperature_garden"]
        );
    }

    #[test]
    fn should_keep_default_reminder_when_only_initial_delay_given() {
        let config: NotiFreezeConfig = toml::from_str("[delays]\ninitial = 1").unwrap();
        assert_eq!(config.delays, Delays { initial: 1, reminder: 3 });
    }

    #[test]
    fn should_reject_unknown_locale() {
        assert!(toml::from_str::<NotiFreezeConfig>(r#"locale = "xx_XX""#).is_err());
    }

    #[test]
    fn should_return_room_name_for_both_forms() {
        let bare = RoomConfig::Name("hall".to_string());
        let detailed = RoomConfig::Detailed(RoomDetails {
            name: "attic".to_string(),
            alias: None,
            door_window: None,
            indoor: None,
        });
        assert_eq!(bare.name(), "hall");
        assert_eq!(detailed.name(), "attic");
    }
}
