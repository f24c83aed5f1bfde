//! Resident-level calendar marks: skip dates and derived unscheduled dates.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A date explicitly marked "no service expected" for a resident.
///
/// Skip dates are never edited; a caregiver creates or removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipDate {
    /// The resident the mark applies to.
    pub resident_id: String,
    /// The skipped date.
    pub date: NaiveDate,
    /// Why no service is expected (hospital visit, family outing).
    #[serde(default)]
    pub reason: Option<String>,
    /// When the mark was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SkipDate {
    /// Creates a skip mark with no reason.
    pub fn new(resident_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            resident_id: resident_id.into(),
            date,
            reason: None,
            created_at: None,
        }
    }
}

/// A date in the horizon that no active item's schedule covers.
///
/// Derived on every query; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduledDate {
    /// The uncovered date.
    pub date: NaiveDate,
    /// Weekday number, 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// True on Saturday and Sunday.
    pub is_weekend: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_skip_date() {
        let json = r#"{"residentId":"res_01","date":"2024-01-07","reason":"family outing"}"#;
        let skip: SkipDate = serde_json::from_str(json).unwrap();

        assert_eq!(skip.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(skip.reason.as_deref(), Some("family outing"));
        assert!(skip.created_at.is_none());
    }

    #[test]
    fn test_serialize_unscheduled_date() {
        let gap = UnscheduledDate {
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
            day_of_week: 6,
            is_weekend: true,
        };
        let value = serde_json::to_value(gap).unwrap();

        assert_eq!(value["date"], "2024-01-06");
        assert_eq!(value["dayOfWeek"], 6);
        assert_eq!(value["isWeekend"], true);
    }
}
