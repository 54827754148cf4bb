//! Entity state — the current open/closed state of a binary sensor.

use serde::{Deserialize, Serialize};

/// Discrete state of a door/window binary sensor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    On,
    Off,
    #[default]
    Unknown,
    Unavailable,
}

impl EntityState {
    /// Interpret a raw host state string. Anything unrecognised is [`Unknown`](Self::Unknown).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "on" => Self::On,
            "off" => Self::Off,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(EntityState::default(), EntityState::Unknown);
    }

    #[test]
    fn should_parse_host_state_strings() {
        assert_eq!(EntityState::parse("on"), EntityState::On);
        assert_eq!(EntityState::parse("off"), EntityState::Off);
        assert_eq!(EntityState::parse("unavailable"), EntityState::Unavailable);
        assert_eq!(EntityState::parse("21.5"), EntityState::Unknown);
    }

    #[test]
    fn should_display_lowercase_variant_name() {
        assert_eq!(EntityState::On.to_string(), "on");
        assert_eq!(EntityState::Off.to_string(), "off");
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let json = serde_json::to_string(&EntityState::On).unwrap();
        assert_eq!(json, "\"on\"");
        let parsed: EntityState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EntityState::On);
    }
}
