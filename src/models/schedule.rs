//! Serving schedule model.
//!
//! A serving schedule is the recurrence rule attached to a care item. The four
//! recurrence shapes are a closed sum type ([`ScheduleKind`]) tagged by `type`
//! on the wire, with the time slot and note shared across all of them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Highest valid weekday number (Saturday, with Sunday = 0).
pub const MAX_WEEKDAY: u8 = 6;

/// The part of the day an item is meant to be served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// Served with breakfast.
    Breakfast,
    /// Served with lunch.
    Lunch,
    /// Served with dinner.
    Dinner,
    /// Served as an afternoon snack.
    Snack,
    /// No preferred time.
    Anytime,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlot::Breakfast => write!(f, "breakfast"),
            TimeSlot::Lunch => write!(f, "lunch"),
            TimeSlot::Dinner => write!(f, "dinner"),
            TimeSlot::Snack => write!(f, "snack"),
            TimeSlot::Anytime => write!(f, "anytime"),
        }
    }
}

/// Discriminant of a [`ScheduleKind`], without its payload.
///
/// Used by callers that filter schedules by shape, such as the gap detector's
/// exclusions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// A single date.
    Once,
    /// Every day.
    Daily,
    /// Selected weekdays.
    Weekly,
    /// An explicit list of dates.
    SpecificDates,
}

/// The recurrence rule of a serving schedule.
///
/// Required payload fields are optional in the type so that incomplete
/// records coming from user input still deserialize. Such a schedule is
/// invalid (see [`ScheduleKind::is_valid`]) and simply never covers a date.
///
/// # Example
///
/// ```
/// use care_engine::models::ScheduleKind;
///
/// let kind: ScheduleKind =
///     serde_json::from_str(r#"{"type":"weekly","startDate":"2024-01-01","weekdays":[1,3,5]}"#)
///         .unwrap();
/// assert!(kind.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ScheduleKind {
    /// Served on exactly one date.
    Once {
        /// The serving date.
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    /// Served every day, optionally from a start date.
    Daily {
        /// First day of service, inclusive.
        #[serde(default)]
        start_date: Option<NaiveDate>,
    },
    /// Served on selected weekdays (0 = Sunday .. 6 = Saturday).
    Weekly {
        /// First day of service, inclusive.
        #[serde(default)]
        start_date: Option<NaiveDate>,
        /// Weekday numbers the item is served on.
        #[serde(default)]
        weekdays: BTreeSet<u8>,
    },
    /// Served on an explicit set of dates.
    SpecificDates {
        /// The serving dates, kept sorted.
        #[serde(default)]
        dates: BTreeSet<NaiveDate>,
    },
}

impl ScheduleKind {
    /// Returns the discriminant of this rule.
    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            ScheduleKind::Once { .. } => ScheduleType::Once,
            ScheduleKind::Daily { .. } => ScheduleType::Daily,
            ScheduleKind::Weekly { .. } => ScheduleType::Weekly,
            ScheduleKind::SpecificDates { .. } => ScheduleType::SpecificDates,
        }
    }

    /// Returns true if the rule carries everything its shape needs.
    ///
    /// - `once` needs a date
    /// - `weekly` needs at least one weekday in 0..=6
    /// - `specific_dates` needs at least one date
    /// - `daily` is always valid
    pub fn is_valid(&self) -> bool {
        match self {
            ScheduleKind::Once { date } => date.is_some(),
            ScheduleKind::Daily { .. } => true,
            ScheduleKind::Weekly { weekdays, .. } => weekdays.iter().any(|d| *d <= MAX_WEEKDAY),
            ScheduleKind::SpecificDates { dates } => !dates.is_empty(),
        }
    }

    /// Returns the start gate of a recurring rule.
    ///
    /// Only `daily` and `weekly` rules have one; `once` and `specific_dates`
    /// return `None`.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            ScheduleKind::Daily { start_date } | ScheduleKind::Weekly { start_date, .. } => {
                *start_date
            }
            ScheduleKind::Once { .. } | ScheduleKind::SpecificDates { .. } => None,
        }
    }

    /// Returns the weekday numbers in 0..=6, ascending. Out-of-range values are dropped.
    pub fn active_weekdays(&self) -> Vec<u8> {
        match self {
            ScheduleKind::Weekly { weekdays, .. } => weekdays
                .iter()
                .copied()
                .filter(|d| *d <= MAX_WEEKDAY)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns true for rules that repeat (`daily`, `weekly`).
    pub fn is_recurring(&self) -> bool {
        matches!(
            self,
            ScheduleKind::Daily { .. } | ScheduleKind::Weekly { .. }
        )
    }
}

/// A serving schedule: a recurrence rule plus display metadata.
///
/// # Example
///
/// ```
/// use care_engine::models::{ServingSchedule, TimeSlot};
/// use chrono::NaiveDate;
///
/// let schedule = ServingSchedule::weekly(
///     Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
///     [1, 3, 5],
/// )
/// .with_time_slot(TimeSlot::Snack);
///
/// assert_eq!(schedule.time_slot, Some(TimeSlot::Snack));
/// assert!(schedule.kind.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingSchedule {
    /// The recurrence rule.
    #[serde(flatten)]
    pub kind: ScheduleKind,
    /// Preferred time of day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    /// Free-text instructions for staff.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ServingSchedule {
    /// Creates a schedule from a bare rule.
    pub fn new(kind: ScheduleKind) -> Self {
        Self {
            kind,
            time_slot: None,
            note: None,
        }
    }

    /// A one-off schedule on `date`.
    pub fn once(date: NaiveDate) -> Self {
        Self::new(ScheduleKind::Once { date: Some(date) })
    }

    /// A daily schedule, optionally gated by a start date.
    pub fn daily(start_date: Option<NaiveDate>) -> Self {
        Self::new(ScheduleKind::Daily { start_date })
    }

    /// A weekly schedule on the given weekday numbers (0 = Sunday).
    pub fn weekly(start_date: Option<NaiveDate>, weekdays: impl IntoIterator<Item = u8>) -> Self {
        Self::new(ScheduleKind::Weekly {
            start_date,
            weekdays: weekdays.into_iter().collect(),
        })
    }

    /// A schedule on an explicit set of dates.
    pub fn specific_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self::new(ScheduleKind::SpecificDates {
            dates: dates.into_iter().collect(),
        })
    }

    /// Sets the preferred time slot.
    pub fn with_time_slot(mut self, time_slot: TimeSlot) -> Self {
        self.time_slot = Some(time_slot);
        self
    }

    /// Sets the staff note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Shorthand for `self.kind.schedule_type()`.
    pub fn schedule_type(&self) -> ScheduleType {
        self.kind.schedule_type()
    }
}

/// Deserializes an optional schedule, mapping a malformed record to `None`.
///
/// Schedules are family-entered, so an unknown `type`, a weekday outside
/// `u8`, an impossible date or a missing tag must not take the surrounding
/// record down with it. A schedule dropped here covers no date.
pub(crate) fn deserialize_lenient<'de, D>(
    deserializer: D,
) -> Result<Option<ServingSchedule>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match ServingSchedule::deserialize(&raw) {
        Ok(schedule) => Ok(Some(schedule)),
        Err(e) => {
            warn!(schedule = %raw, error = %e, "Ignoring malformed serving schedule");
            Ok(None)
        }
    }
}
