//! Notification messages — locale templates and their rendering.
//!
//! Templates use `{placeholder}` markers:
//!
//! | Placeholder | Value |
//! |-------------|-------|
//! | `{room_name}` | Room name (`Kitchen`) |
//! | `{entity_name}` | Sensor name with the room name stripped (`Window`) |
//! | `{open_since}` | Time since the sensor opened (`6min`, `6min 30sec`, `42sec`) |
//! | `{initial}` | Indoor temperature when the sensor opened |
//! | `{indoor}` | Current indoor temperature |
//! | `{indoor_difference}` | Signed change since opening (`+2.3`) |

use chrono::TimeDelta;
use serde::Deserialize;

/// Supported message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "de_DE")]
    DeDe,
    #[serde(rename = "pl_PL")]
    PlPl,
}

impl Locale {
    /// Built-in templates for this locale.
    #[must_use]
    pub fn templates(self) -> MessageTemplates {
        let (since, change) = match self {
            Self::EnUs => (
                "{room_name} {entity_name} open since {open_since}: {initial}°C",
                "{room_name} {entity_name} open since {open_since}: {initial}°C → {indoor}°C ({indoor_difference}°C)",
            ),
            Self::DeDe => (
                "{room_name} {entity_name} offen seit {open_since}: {initial}°C",
                "{room_name} {entity_name} offen seit {open_since}: {initial}°C → {indoor}°C ({indoor_difference}°C)",
            ),
            Self::PlPl => (
                "{room_name} {entity_name} otwarte od {open_since}: {initial}°C",
                "{room_name} {entity_name} otwarte od {open_since}: {initial}°C → {indoor}°C ({indoor_difference}°C)",
            ),
        };
        MessageTemplates {
            since: since.to_string(),
            change: change.to_string(),
        }
    }
}

/// User-supplied templates; each one replaces the locale's when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageOverrides {
    pub since: Option<String>,
    pub change: Option<String>,
}

/// The pair of templates used to build reminders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    /// Used when the indoor temperature is unchanged since opening.
    pub since: String,
    /// Used when the indoor temperature moved since opening.
    pub change: String,
}

impl MessageTemplates {
    /// Locale templates with `overrides` applied on top.
    #[must_use]
    pub fn resolve(locale: Locale, overrides: &MessageOverrides) -> Self {
        let defaults = locale.templates();
        Self {
            since: overrides.since.clone().unwrap_or(defaults.since),
            change: overrides.change.clone().unwrap_or(defaults.change),
        }
    }

    /// Render a reminder, picking `since` or `change` depending on whether
    /// the indoor temperature moved (at one-decimal precision).
    ///
    /// Placeholders are substituted in a single pass, so values that happen
    /// to contain `{...}` are copied verbatim. Unknown placeholders are kept.
    #[must_use]
    pub fn render(&self, ctx: &MessageContext<'_>) -> String {
        let template = if ctx.is_unchanged() {
            &self.since
        } else {
            &self.change
        };

        let mut out = String::with_capacity(template.len() + 32);
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            let Some(close) = tail.find('}') else {
                rest = tail;
                break;
            };
            let key = &tail[1..close];
            if key.contains('{') {
                out.push('{');
                rest = &tail[1..];
                continue;
            }
            match ctx.value(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&tail[..=close]),
            }
            rest = &tail[close + 1..];
        }
        out.push_str(rest);
        out
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub room_name: &'a str,
    pub entity_name: &'a str,
    pub open_for: TimeDelta,
    pub initial: f64,
    pub indoor: f64,
}

impl MessageContext<'_> {
    /// Indoor change since the sensor opened, rounded to one decimal.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn indoor_difference(&self) -> f64 {
        self.difference_tenths() as f64 / 10.0
    }

    /// Whether the indoor temperature is the same as at opening, at display precision.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.difference_tenths() == 0
    }

    fn difference_tenths(&self) -> i64 {
        tenths(self.indoor) - tenths(self.initial)
    }

    fn value(&self, placeholder: &str) -> Option<String> {
        let value = match placeholder {
            "room_name" => self.room_name.to_string(),
            "entity_name" => self.entity_name.to_string(),
            "open_since" => format_open_since(self.open_for),
            "initial" => format_tenths(tenths(self.initial), false),
            "indoor" => format_tenths(tenths(self.indoor), false),
            "indoor_difference" => format_tenths(self.difference_tenths(), true),
            _ => return None,
        };
        Some(value)
    }
}

/// Temperatures are compared and displayed in integer tenths, rounded half
/// away from zero, so the shown values always agree with the comparison.
#[allow(clippy::cast_possible_truncation)]
fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

fn format_tenths(value: i64, signed: bool) -> String {
    let sign = match (value < 0, signed) {
        (true, _) => "-",
        (false, true) => "+",
        (false, false) => "",
    };
    let magnitude = value.unsigned_abs();
    format!("{sign}{}.{}", magnitude / 10, magnitude % 10)
}

/// Human-readable time since opening.
///
/// Under a minute: `42sec`. Otherwise whole minutes, with the seconds only
/// shown when they are far enough from a full minute (10–50 sec).
#[must_use]
pub fn format_open_since(open_for: TimeDelta) -> String {
    let total = open_for.num_seconds().max(0);
    let (minutes, seconds) = (total / 60, total % 60);

    if minutes == 0 {
        format!("{seconds}sec")
    } else if (10..=50).contains(&seconds) {
        format!("{minutes}min {seconds}sec")
    } else {
        format!("{minutes}min")
    }
}

/// Strip the room name out of a sensor's friendly name
/// (`Kitchen Window` in room `Kitchen` → `Window`).
#[must_use]
pub fn trim_entity_name(friendly_name: &str, room_name: &str) -> String {
    if room_name.is_empty() {
        return friendly_name.trim().to_string();
    }
    friendly_name.replace(room_name, "").trim().to_string()
}

/// First character upper-cased, the rest lower-cased (`living ROOM` → `Living room`).
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
