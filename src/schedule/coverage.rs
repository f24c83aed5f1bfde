//! Coverage and next-occurrence evaluation for serving schedules.

use chrono::NaiveDate;

use crate::calendar::{add_days, weekday_index};
use crate::models::{InventoryUnit, ScheduleKind, ServingSchedule};

/// Default number of days [`next_covered`] searches ahead.
pub const DEFAULT_NEXT_HORIZON_DAYS: u32 = 30;

/// Returns true if `schedule` expects the item to be served on `date`.
///
/// - `once`: the date matches
/// - `daily`: on or after the start date (any date when there is none)
/// - `weekly`: on or after the start date, on one of the listed weekdays
/// - `specific_dates`: the date is in the list
///
/// Incomplete rules (no date, no weekdays, no dates) never cover anything.
/// Only `daily` and `weekly` have a start gate.
///
/// # Example
///
/// ```
/// use care_engine::models::ServingSchedule;
/// use care_engine::schedule::is_covered;
/// use chrono::NaiveDate;
///
/// let schedule = ServingSchedule::weekly(
///     Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
///     [1, 3, 5],
/// );
///
/// // 2024-01-03 is a Wednesday
/// assert!(is_covered(&schedule, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()));
/// // 2023-12-25 is a Monday, but before the start date
/// assert!(!is_covered(&schedule, NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()));
/// ```
pub fn is_covered(schedule: &ServingSchedule, date: NaiveDate) -> bool {
    match &schedule.kind {
        ScheduleKind::Once { date: once } => *once == Some(date),
        ScheduleKind::Daily { start_date } => has_started(*start_date, date),
        ScheduleKind::Weekly {
            start_date,
            weekdays,
        } => has_started(*start_date, date) && weekdays.contains(&weekday_index(date)),
        ScheduleKind::SpecificDates { dates } => dates.contains(&date),
    }
}

/// Returns true if `unit` has a schedule covering `date`.
///
/// Units without a schedule are never covered.
pub fn is_unit_scheduled_on(unit: &InventoryUnit, date: NaiveDate) -> bool {
    unit.serving_schedule
        .as_ref()
        .is_some_and(|schedule| is_covered(schedule, date))
}

/// Returns the first covered date in `[from, from + horizon_days)`.
///
/// `daily` and `weekly` rules start scanning at the later of `from` and
/// their start date. `once` and `specific_dates` pick the earliest listed
/// date on or after `from` directly. Returns `None` when nothing falls
/// inside the horizon or the rule is incomplete.
///
/// # Example
///
/// ```
/// use care_engine::models::ServingSchedule;
/// use care_engine::schedule::{next_covered, DEFAULT_NEXT_HORIZON_DAYS};
/// use chrono::NaiveDate;
///
/// // Mondays only; 2024-01-03 is a Wednesday
/// let schedule = ServingSchedule::weekly(None, [1]);
/// let from = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
///
/// assert_eq!(
///     next_covered(&schedule, from, DEFAULT_NEXT_HORIZON_DAYS),
///     NaiveDate::from_ymd_opt(2024, 1, 8)
/// );
/// ```
pub fn next_covered(
    schedule: &ServingSchedule,
    from: NaiveDate,
    horizon_days: u32,
) -> Option<NaiveDate> {
    if horizon_days == 0 {
        return None;
    }
    let window_end = add_days(from, i64::from(horizon_days));
    let in_window = |date: NaiveDate| window_end.is_none_or(|end| date < end);

    match &schedule.kind {
        ScheduleKind::Once { date } => (*date).filter(|d| *d >= from && in_window(*d)),
        ScheduleKind::SpecificDates { dates } => {
            dates.range(from..).next().copied().filter(|d| in_window(*d))
        }
        ScheduleKind::Daily { start_date } => {
            let first = start_date.map_or(from, |start| start.max(from));
            Some(first).filter(|d| in_window(*d))
        }
        ScheduleKind::Weekly { start_date, .. } => {
            if !schedule.kind.is_valid() {
                return None;
            }
            let first = start_date.map_or(from, |start| start.max(from));
            first
                .iter_days()
                .take_while(|d| in_window(*d))
                .find(|d| is_covered(schedule, *d))
        }
    }
}

fn has_started(start_date: Option<NaiveDate>, date: NaiveDate) -> bool {
    start_date.is_none_or(|start| date >= start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemCategory;
    use std::collections::BTreeSet;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ==========================================================================
    // is_covered: once
    // ==========================================================================
    #[test]
    fn test_once_covers_only_its_date() {
        let schedule = ServingSchedule::once(date("2024-01-01"));
        assert!(is_covered(&schedule, date("2024-01-01")));
        assert!(!is_covered(&schedule, date("2024-01-02")));
        assert!(!is_covered(&schedule, date("2023-12-31")));
    }

    #[test]
    fn test_once_without_date_never_covers() {
        let schedule = ServingSchedule::new(ScheduleKind::Once { date: None });
        assert!(!is_covered(&schedule, date("2024-01-01")));
    }

    // ==========================================================================
    // is_covered: daily
    // ==========================================================================
    #[test]
    fn test_daily_without_start_covers_everything() {
        let schedule = ServingSchedule::daily(None);
        assert!(is_covered(&schedule, date("1999-01-01")));
        assert!(is_covered(&schedule, date("2024-06-30")));
    }

    #[test]
    fn test_daily_respects_start_date() {
        let schedule = ServingSchedule::daily(Some(date("2024-01-10")));
        assert!(!is_covered(&schedule, date("2024-01-09")));
        assert!(is_covered(&schedule, date("2024-01-10")));
        assert!(is_covered(&schedule, date("2024-01-11")));
    }

    // ==========================================================================
    // is_covered: weekly
    // ==========================================================================
    #[test]
    fn test_weekly_matches_listed_weekdays() {
        // Mon, Wed, Fri from 2024-01-01 (a Monday)
        let schedule = ServingSchedule::weekly(Some(date("2024-01-01")), [1, 3, 5]);

        assert!(is_covered(&schedule, date("2024-01-01"))); // Monday
        assert!(!is_covered(&schedule, date("2024-01-02"))); // Tuesday
        assert!(is_covered(&schedule, date("2024-01-03"))); // Wednesday
        assert!(is_covered(&schedule, date("2024-01-05"))); // Friday
        assert!(!is_covered(&schedule, date("2024-01-06"))); // Saturday
        assert!(!is_covered(&schedule, date("2024-01-07"))); // Sunday
    }

    #[test]
    fn test_weekly_before_start_is_not_covered() {
        let schedule = ServingSchedule::weekly(Some(date("2024-01-01")), [1, 3, 5]);
        // 2023-12-25 is a Monday
        assert!(!is_covered(&schedule, date("2023-12-25")));
    }

    #[test]
    fn test_weekly_sunday_is_zero() {
        let schedule = ServingSchedule::weekly(None, [0]);
        assert!(is_covered(&schedule, date("2024-01-07")));
        assert!(!is_covered(&schedule, date("2024-01-06")));
    }

    #[test]
    fn test_weekly_with_empty_weekdays_never_covers() {
        let schedule = ServingSchedule::weekly(None, Vec::<u8>::new());
        for d in date("2024-01-01").iter_days().take(7) {
            assert!(!is_covered(&schedule, d));
        }
    }

    #[test]
    fn test_weekly_ignores_out_of_range_weekdays() {
        let schedule = ServingSchedule::weekly(None, [7, 12]);
        for d in date("2024-01-01").iter_days().take(14) {
            assert!(!is_covered(&schedule, d));
        }
    }

    // ==========================================================================
    // is_covered: specific_dates
    // ==========================================================================
    #[test]
    fn test_specific_dates_membership() {
        let schedule =
            ServingSchedule::specific_dates([date("2024-01-02"), date("2024-01-09")]);
        assert!(is_covered(&schedule, date("2024-01-02")));
        assert!(is_covered(&schedule, date("2024-01-09")));
        assert!(!is_covered(&schedule, date("2024-01-03")));
    }

    #[test]
    fn test_specific_dates_empty_never_covers() {
        let schedule = ServingSchedule::new(ScheduleKind::SpecificDates {
            dates: BTreeSet::new(),
        });
        assert!(!is_covered(&schedule, date("2024-01-02")));
    }

    #[test]
    fn test_unit_without_schedule_is_never_scheduled() {
        let unit = InventoryUnit::new(
            "item_001",
            "res_01",
            "Pudding",
            ItemCategory::Dairy,
            date("2024-01-01"),
        );
        assert!(!is_unit_scheduled_on(&unit, date("2024-01-01")));

        let scheduled = unit.with_schedule(ServingSchedule::daily(None));
        assert!(is_unit_scheduled_on(&scheduled, date("2024-01-01")));
    }

    // ==========================================================================
    // next_covered
    // ==========================================================================
    #[test]
    fn test_next_covered_once_in_future() {
        let schedule = ServingSchedule::once(date("2024-01-10"));
        assert_eq!(
            next_covered(&schedule, date("2024-01-01"), 30),
            Some(date("2024-01-10"))
        );
    }

    #[test]
    fn test_next_covered_once_in_past_is_none() {
        let schedule = ServingSchedule::once(date("2024-01-10"));
        assert_eq!(next_covered(&schedule, date("2024-01-11"), 30), None);
    }

    #[test]
    fn test_next_covered_once_today() {
        let schedule = ServingSchedule::once(date("2024-01-10"));
        assert_eq!(
            next_covered(&schedule, date("2024-01-10"), 30),
            Some(date("2024-01-10"))
        );
    }

    #[test]
    fn test_next_covered_beyond_horizon_is_none() {
        let schedule = ServingSchedule::once(date("2024-03-01"));
        assert_eq!(next_covered(&schedule, date("2024-01-01"), 30), None);

        // Horizon is half-open: from + 30 is outside
        let edge = ServingSchedule::once(date("2024-01-31"));
        assert_eq!(next_covered(&edge, date("2024-01-01"), 30), None);
        let inside = ServingSchedule::once(date("2024-01-30"));
        assert_eq!(
            next_covered(&inside, date("2024-01-01"), 30),
            Some(date("2024-01-30"))
        );
    }

    #[test]
    fn test_next_covered_specific_dates_picks_earliest_upcoming() {
        let schedule = ServingSchedule::specific_dates([
            date("2024-01-02"),
            date("2024-01-12"),
            date("2024-01-20"),
        ]);
        assert_eq!(
            next_covered(&schedule, date("2024-01-05"), 30),
            Some(date("2024-01-12"))
        );
        assert_eq!(
            next_covered(&schedule, date("2024-01-12"), 30),
            Some(date("2024-01-12"))
        );
        assert_eq!(next_covered(&schedule, date("2024-01-21"), 30), None);
    }

    #[test]
    fn test_next_covered_daily_waits_for_start() {
        let schedule = ServingSchedule::daily(Some(date("2024-01-15")));
        assert_eq!(
            next_covered(&schedule, date("2024-01-01"), 30),
            Some(date("2024-01-15"))
        );
        assert_eq!(
            next_covered(&schedule, date("2024-01-20"), 30),
            Some(date("2024-01-20"))
        );
        assert_eq!(next_covered(&schedule, date("2024-01-01"), 10), None);
    }

    #[test]
    fn test_next_covered_weekly_scans_to_weekday() {
        // Saturdays only, starting 2024-01-10 (Wednesday)
        let schedule = ServingSchedule::weekly(Some(date("2024-01-10")), [6]);
        assert_eq!(
            next_covered(&schedule, date("2024-01-01"), 30),
            Some(date("2024-01-13"))
        );
    }

    #[test]
    fn test_next_covered_invalid_weekly_is_none() {
        let schedule = ServingSchedule::weekly(None, Vec::<u8>::new());
        assert_eq!(next_covered(&schedule, date("2024-01-01"), 30), None);
    }

    #[test]
    fn test_next_covered_zero_horizon_is_none() {
        let schedule = ServingSchedule::daily(None);
        assert_eq!(next_covered(&schedule, date("2024-01-01"), 0), None);
    }
}
