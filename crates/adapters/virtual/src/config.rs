//! Virtual host configuration — simulated entities and a scripted scenario.

use serde::Deserialize;

/// Configuration for the virtual host.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Entities known to the host at startup.
    pub entities: Vec<VirtualEntity>,
    /// Timed state changes played after startup.
    pub scenario: Vec<ScenarioStep>,
}

/// A simulated entity.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualEntity {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

/// Set `entity_id` to `state`, `after_secs` seconds after the scenario starts.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioStep {
    pub after_secs: u64,
    pub entity_id: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_empty_home() {
        let config = VirtualConfig::default();
        assert!(config.entities.is_empty());
        assert!(config.scenario.is_empty());
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            [[entities]]
            entity_id = "binary_sensor.door_window_kitchen"
            state = "off"
            friendly_name = "Kitchen Window"

            [[entities]]
            entity_id = "sensor.temperature_kitchen"
            state = "21.5"

            [[scenario]]
            after_secs = 10
            entity_id = "binary_sensor.door_window_kitchen"
            state = "on"
        "#;
        let config: VirtualConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.entities.len(), 2);
        assert_eq!(
            config.entities[0].friendly_name.as_deref(),
            Some("Kitchen Window")
        );
        assert!(config.entities[1].friendly_name.is_none());
        assert_eq!(config.scenario[0].after_secs, 10);
        assert_eq!(config.scenario[0].state, "on");
    }
}
