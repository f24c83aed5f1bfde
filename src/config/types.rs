//! Configuration types for the care engine.
//!
//! Every section and field has a default, so an empty YAML document (or no
//! file at all) yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Settings for the recurrence evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// How many days ahead `next_covered` looks before giving up.
    pub next_occurrence_horizon_days: u32,
    /// How many dates a `specific_dates` label lists before switching to a count.
    pub max_listed_dates: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            next_occurrence_horizon_days: 30,
            max_listed_dates: 3,
        }
    }
}

/// Settings for the gap detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Number of days, starting today, scanned for unscheduled dates.
    pub horizon_days: u32,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self { horizon_days: 14 }
    }
}

/// Settings for the missed-occurrence classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissedConfig {
    /// Days a daily/weekly schedule may run without any serving before it
    /// counts as missed.
    pub staleness_days: i64,
}

impl Default for MissedConfig {
    fn default() -> Self {
        Self { staleness_days: 3 }
    }
}

/// Settings for expiry urgency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryConfig {
    /// Items expiring within this many days (after today) are "expiring soon".
    pub expiring_soon_days: i64,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: 2,
        }
    }
}

/// Labels used when rendering schedules for display.
///
/// Templates use `{date}` and `{count}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleLabels {
    /// Weekday names, Sunday first. Exactly seven entries.
    pub weekdays: Vec<String>,
    /// Label for a daily schedule.
    pub daily: String,
    /// Suffix template for a schedule that starts in the future.
    pub starting_from: String,
    /// Template for a long `specific_dates` list.
    pub date_count: String,
    /// Label for a missing or invalid schedule.
    pub unscheduled: String,
    /// Separator between listed weekdays or dates.
    pub separator: String,
}

impl Default for ScheduleLabels {
    fn default() -> Self {
        Self {
            weekdays: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            daily: "daily".to_string(),
            starting_from: "from {date}".to_string(),
            date_count: "{count} dates".to_string(),
            unscheduled: "unscheduled".to_string(),
            separator: ", ".to_string(),
        }
    }
}

impl ScheduleLabels {
    /// Returns the label for weekday number `day` (0 = Sunday).
    pub fn weekday(&self, day: u8) -> &str {
        self.weekdays
            .get(usize::from(day))
            .map(String::as_str)
            .unwrap_or("?")
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recurrence evaluator settings.
    pub schedule: ScheduleConfig,
    /// Gap detector settings.
    pub gaps: GapConfig,
    /// Missed-occurrence classifier settings.
    pub missed: MissedConfig,
    /// Expiry urgency settings.
    pub expiry: ExpiryConfig,
    /// Display labels.
    pub labels: ScheduleLabels,
}

impl EngineConfig {
    /// Checks values that deserialize fine but make no sense to the engine.
    pub fn validate(&self) -> EngineResult<()> {
        if self.labels.weekdays.len() != 7 {
            return Err(EngineError::InvalidConfig {
                field: "labels.weekdays".to_string(),
                message: format!("expected 7 labels, found {}", self.labels.weekdays.len()),
            });
        }
        if self.schedule.next_occurrence_horizon_days == 0 {
            return Err(EngineError::InvalidConfig {
                field: "schedule.next_occurrence_horizon_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.gaps.horizon_days == 0 {
            return Err(EngineError::InvalidConfig {
                field: "gaps.horizon_days".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.missed.staleness_days < 0 {
            return Err(EngineError::InvalidConfig {
                field: "missed.staleness_days".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.expiry.expiring_soon_days < 0 {
            return Err(EngineError::InvalidConfig {
                field: "expiry.expiring_soon_days".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
