//! Temperature readings, aggregation and the indoor/outdoor comparison.

use crate::entity::EntityId;
use crate::error::ValidationError;

/// Parse a raw sensor state into °C. `unknown`, `unavailable`, and
/// non-finite values yield `None`.
#[must_use]
pub fn parse_reading(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Result of averaging a set of sensors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Mean over the valid readings, `None` when there are none.
    pub mean: Option<f64>,
    /// Sensors whose state could not be used, with the raw state (if any).
    pub invalid: Vec<(EntityId, Option<String>)>,
}

impl Aggregate {
    /// Average the given `(sensor, raw state)` pairs, skipping unusable states.
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, Option<String>)>,
    {
        let mut sum = 0.0;
        let mut count = 0_u32;
        let mut invalid = Vec::new();

        for (sensor, raw) in states {
            match raw.as_deref().and_then(parse_reading) {
                Some(value) => {
                    sum += value;
                    count += 1;
                }
                None => invalid.push((sensor, raw)),
            }
        }

        let mean = (count > 0).then(|| sum / f64::from(count));
        Self { mean, invalid }
    }
}

/// Indoor and outdoor means of a room at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    pub outdoor: f64,
    pub indoor: f64,
}

impl Delta {
    /// `outdoor − indoor`, rounded to two decimals. Negative when it is colder outside.
    #[must_use]
    pub fn value(&self) -> f64 {
        ((self.outdoor - self.indoor) * 100.0).round() / 100.0
    }
}

/// Maximum tolerated |outdoor − indoor|.
///
/// The comparison always uses the absolute delta with a strict `>`, so a
/// hot summer day with the window open is reported just like a frosty one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold(f64);

impl Threshold {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidMaxDifference`] for negative or
    /// non-finite values.
    pub fn new(max_difference: f64) -> Result<Self, ValidationError> {
        if max_difference.is_finite() && max_difference >= 0.0 {
            Ok(Self(max_difference))
        } else {
            Err(ValidationError::InvalidMaxDifference(max_difference))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn is_exceeded_by(self, delta: &Delta) -> bool {
        delta.value().abs() > self.0
    }
}
