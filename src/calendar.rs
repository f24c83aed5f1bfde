//! Calendar utilities.
//!
//! Small date helpers shared by the schedule evaluator, gap detector and
//! missed-occurrence classifier. Weekdays are numbered Sunday = 0 through
//! Saturday = 6 throughout the crate, and weeks start on Sunday.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Canonical date format used in records and logs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Short month/day format used in display strings.
pub const SHORT_DATE_FORMAT: &str = "%-m/%-d";

/// Returns the weekday number of `date`, Sunday = 0 .. Saturday = 6.
///
/// # Example
///
/// ```
/// use care_engine::calendar::weekday_index;
/// use chrono::NaiveDate;
///
/// // 2024-01-03 is a Wednesday
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()), 3);
/// // 2024-01-07 is a Sunday
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()), 0);
/// ```
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Returns true on Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a date as `M/D` without zero padding.
///
/// # Example
///
/// ```
/// use care_engine::calendar::format_short_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(format_short_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "1/5");
/// ```
pub fn format_short_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` string. Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Adds `days` (which may be negative) to `date`, or `None` on overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Whole days from `from` to `to`; negative if `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Returns `days` consecutive dates starting at `start`.
///
/// Stops early at the end of the representable calendar.
pub fn date_range(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    start.iter_days().take(days as usize).collect()
}

/// Returns the Sunday..Saturday week containing `date`.
///
/// # Example
///
/// ```
/// use care_engine::calendar::week_bounds;
/// use chrono::NaiveDate;
///
/// let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
/// let (start, end) = week_bounds(wednesday);
/// assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
/// ```
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(weekday_index(date));
    let start = add_days(date, -offset).unwrap_or(NaiveDate::MIN);
    let end = add_days(start, 6).unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Returns the first and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}
