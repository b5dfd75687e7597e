//! Engine configuration.
//!
//! Every knob has a default, so an empty JSON object is a valid document:
//!
//! ```rust,ignore
//! let config = EngineConfig::from_json(r#"{ "time_zone": "Europe/Berlin" }"#)?;
//! assert_eq!(config.rounding, DayRounding::HalfAwayFromZero);
//! ```

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default limit on nested delegation depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tie-breaking rule used when an elapsed time is exactly `N.5` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayRounding {
    /// `2.5 -> 3`, `-2.5 -> -3`.
    #[default]
    HalfAwayFromZero,
    /// `2.5 -> 2`, `3.5 -> 4`, `-2.5 -> -2`.
    HalfEven,
}

/// What to do when a record refuses to hand out a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Surface [`Error::ValueAccess`](crate::Error::ValueAccess).
    #[default]
    Fatal,
    /// Treat the affected rule as satisfied and log a warning.
    FailOpen,
}

/// Knobs shared by every call on a [`ValidationContext`](crate::ValidationContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Tie rule for day rounding.
    pub rounding: DayRounding,
    /// Value-access failure discipline.
    pub access_failure: AccessPolicy,
    /// Zone used to place naive dates and date-times on the timeline.
    pub time_zone: Tz,
    /// Maximum nested delegation depth.
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rounding: DayRounding::default(),
            access_failure: AccessPolicy::default(),
            time_zone: Tz::UTC,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    /// Sets the rounding tie rule.
    pub fn with_rounding(mut self, rounding: DayRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Sets the value-access failure policy.
    pub fn with_access_failure(mut self, policy: AccessPolicy) -> Self {
        self.access_failure = policy;
        self
    }

    /// Sets the zone for naive temporal values.
    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Sets the nested depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
