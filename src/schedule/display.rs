//! Human-readable labels for serving schedules.
//!
//! Rendering is pure: the only notion of "now" is the `today` argument, used
//! to decide whether a start-date suffix is shown.

use chrono::NaiveDate;

use crate::calendar::format_short_date;
use crate::config::ScheduleLabels;
use crate::models::{ScheduleKind, ServingSchedule};

/// Default number of dates listed before a `specific_dates` label becomes a count.
pub const DEFAULT_MAX_LISTED_DATES: usize = 3;

/// Renders `schedule` as a short label.
///
/// - `once`: the date as `M/D`
/// - `daily`: the daily label, plus a start suffix if it starts after `today`
/// - `weekly`: weekday labels Sunday first, plus the same start suffix
/// - `specific_dates`: up to `max_listed_dates` dates, otherwise a count
///
/// Missing and incomplete schedules render as the "unscheduled" label.
///
/// # Example
///
/// ```
/// use care_engine::config::ScheduleLabels;
/// use care_engine::models::ServingSchedule;
/// use care_engine::schedule::display_schedule;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let labels = ScheduleLabels::default();
///
/// let weekly = ServingSchedule::weekly(None, [5, 1, 3]);
/// assert_eq!(display_schedule(Some(&weekly), today, &labels, 3), "Mon, Wed, Fri");
///
/// let daily = ServingSchedule::daily(NaiveDate::from_ymd_opt(2024, 1, 5));
/// assert_eq!(display_schedule(Some(&daily), today, &labels, 3), "daily (from 1/5)");
/// ```
pub fn display_schedule(
    schedule: Option<&ServingSchedule>,
    today: NaiveDate,
    labels: &ScheduleLabels,
    max_listed_dates: usize,
) -> String {
    let Some(schedule) = schedule else {
        return labels.unscheduled.clone();
    };
    if !schedule.kind.is_valid() {
        return labels.unscheduled.clone();
    }

    match &schedule.kind {
        ScheduleKind::Once { date } => (*date)
            .map(format_short_date)
            .unwrap_or_else(|| labels.unscheduled.clone()),
        ScheduleKind::Daily { start_date } => {
            with_start_suffix(labels.daily.clone(), *start_date, today, labels)
        }
        ScheduleKind::Weekly { start_date, .. } => {
            let days: Vec<&str> = schedule
                .kind
                .active_weekdays()
                .into_iter()
                .map(|day| labels.weekday(day))
                .collect();
            with_start_suffix(days.join(labels.separator.as_str()), *start_date, today, labels)
        }
        ScheduleKind::SpecificDates { dates } => {
            if dates.len() <= max_listed_dates {
                dates
                    .iter()
                    .map(|d| format_short_date(*d))
                    .collect::<Vec<_>>()
                    .join(labels.separator.as_str())
            } else {
                labels
                    .date_count
                    .replace("{count}", &dates.len().to_string())
            }
        }
    }
}

/// Renders `schedule` with the default English labels.
pub fn describe(schedule: Option<&ServingSchedule>, today: NaiveDate) -> String {
    display_schedule(
        schedule,
        today,
        &ScheduleLabels::default(),
        DEFAULT_MAX_LISTED_DATES,
    )
}

fn with_start_suffix(
    base: String,
    start_date: Option<NaiveDate>,
    today: NaiveDate,
    labels: &ScheduleLabels,
) -> String {
    match start_date {
        Some(start) if start > today => {
            let suffix = labels
                .starting_from
                .replace("{date}", &format_short_date(start));
            format!("{} ({})", base, suffix)
        }
        _ => base,
    }
}
