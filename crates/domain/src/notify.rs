//! Notification target and per-room push payloads.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::ValidationError;

/// A host notification service such as `notify.mobile_app_phone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotifyService {
    domain: String,
    service: String,
}

impl NotifyService {
    /// Parse `notify.<name>` (or `notify/<name>`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNotifyService`] if either half is
    /// missing or empty.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        match trimmed.split_once(['.', '/']) {
            Some((domain, service)) if !domain.is_empty() && !service.is_empty() => Ok(Self {
                domain: domain.to_string(),
                service: service.to_string(),
            }),
            _ => Err(ValidationError::InvalidNotifyService(value.to_string())),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for NotifyService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.service)
    }
}

/// iOS push settings shared by all rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Set the app badge to 1.
    pub badge: bool,
    /// Notification thread; a trailing `-` gets the room name appended.
    pub thread_id: Option<String>,
    /// Collapse id; a trailing `-` gets the room name appended.
    pub apns_collapse_id: Option<String>,
}

impl PushConfig {
    /// Build the notification `data` payload for `room_name`.
    #[must_use]
    pub fn data_for(&self, room_name: &str) -> Value {
        let mut push = Map::new();
        let mut apns_headers = Map::new();

        if self.badge {
            push.insert("badge".to_string(), json!(1));
        }
        if let Some(thread_id) = &self.thread_id {
            push.insert("thread-id".to_string(), json!(per_room(thread_id, room_name)));
        }
        if let Some(collapse_id) = &self.apns_collapse_id {
            apns_headers.insert(
                "apns-collapse-id".to_string(),
                json!(per_room(collapse_id, room_name)),
            );
        }

        json!({ "push": push, "apns_headers": apns_headers })
    }
}

fn per_room(id: &str, room_name: &str) -> String {
    if id.ends_with('-') {
        format!("{id}{room_name}").to_lowercase()
    } else {
        id.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_dotted_notify_service() {
        let service = NotifyService::parse("notify.mobile_app_phone").unwrap();
        assert_eq!(service.domain(), "notify");
        assert_eq!(service.service(), "mobile_app_phone");
        assert_eq!(service.to_string(), "notify.mobile_app_phone");
    }

    #[test]
    fn should_parse_slashed_notify_service() {
        let service = NotifyService::parse("notify/family").unwrap();
        assert_eq!(service.to_string(), "notify.family");
    }

    #[test]
    fn should_reject_notify_service_without_name() {
        assert!(NotifyService::parse("notify").is_err());
        assert!(NotifyService::parse("notify.").is_err());
        assert!(NotifyService::parse("").is_err());
    }

    #[test]
    fn should_append_room_to_ids_ending_with_dash() {
        let push = PushConfig {
            badge: true,
            thread_id: Some("NotiFreeze-".to_string()),
            apns_collapse_id: Some("Freeze".to_string()),
        };
        assert_eq!(
            push.data_for("Kitchen"),
            json!({
                "push": { "badge": 1, "thread-id": "notifreeze-kitchen" },
                "apns_headers": { "apns-collapse-id": "freeze" },
            })
        );
    }

    #[test]
    fn should_build_empty_sections_without_settings() {
        assert_eq!(
            PushConfig::default().data_for("Kitchen"),
            json!({ "push": {}, "apns_headers": {} })
        );
    }
}
