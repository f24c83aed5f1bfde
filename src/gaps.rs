//! Unscheduled-date (gap) detection.
//!
//! A gap is a date in the look-ahead horizon on which no active care item is
//! scheduled and which the family has not marked as a skip date. Staff use
//! the list to ask families for more items before the resident goes without.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{date_range, is_weekend, week_bounds, weekday_index};
use crate::models::{InventoryUnit, ScheduleType, ServingSchedule, UnscheduledDate};
use crate::schedule::is_covered;

/// Schedule shapes to leave out of coverage when looking for gaps.
///
/// Ignoring `daily` (or `weekly`) schedules surfaces the sparser gaps left
/// by one-off and specific-date items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapExclusions {
    /// Do not count `daily` schedules as coverage.
    pub ignore_daily: bool,
    /// Do not count `weekly` schedules as coverage.
    pub ignore_weekly: bool,
}

impl GapExclusions {
    /// Counts every schedule shape.
    pub fn none() -> Self {
        Self::default()
    }

    /// Ignores both recurring shapes.
    pub fn recurring() -> Self {
        Self {
            ignore_daily: true,
            ignore_weekly: true,
        }
    }

    fn excludes(&self, schedule_type: ScheduleType) -> bool {
        match schedule_type {
            ScheduleType::Daily => self.ignore_daily,
            ScheduleType::Weekly => self.ignore_weekly,
            ScheduleType::Once | ScheduleType::SpecificDates => false,
        }
    }
}

/// Finds dates in `[today, today + horizon_days)` that nothing covers.
///
/// A date is a gap when it is not in `skip_dates` and no active item
/// (pending or in progress) has a schedule, surviving `exclusions`, that
/// covers it. Items with incomplete schedules contribute no coverage.
/// Results are in ascending date order.
///
/// # Example
///
/// ```
/// use care_engine::gaps::{find_gaps, GapExclusions};
/// use chrono::NaiveDate;
///
/// // No items and no skip dates: every day is a gap.
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let gaps = find_gaps(&[], &[], monday, 5, GapExclusions::none());
///
/// assert_eq!(gaps.len(), 5);
/// assert_eq!(gaps[0].day_of_week, 1);
/// assert!(!gaps[4].is_weekend); // Friday
/// ```
pub fn find_gaps(
    items: &[InventoryUnit],
    skip_dates: &[NaiveDate],
    today: NaiveDate,
    horizon_days: u32,
    exclusions: GapExclusions,
) -> Vec<UnscheduledDate> {
    let schedules = covering_schedules(items, exclusions);
    let skipped: HashSet<NaiveDate> = skip_dates.iter().copied().collect();

    let gaps: Vec<UnscheduledDate> = date_range(today, horizon_days)
        .into_iter()
        .filter(|date| !skipped.contains(date))
        .filter(|date| !schedules.iter().any(|schedule| is_covered(schedule, *date)))
        .map(|date| UnscheduledDate {
            date,
            day_of_week: weekday_index(date),
            is_weekend: is_weekend(date),
        })
        .collect();

    debug!(
        today = %today,
        horizon_days,
        schedules = schedules.len(),
        skipped = skipped.len(),
        gaps = gaps.len(),
        "Computed unscheduled dates"
    );

    gaps
}

/// Groups gaps by the Sunday that starts their week, weeks in ascending order.
pub fn group_gaps_by_week(gaps: &[UnscheduledDate]) -> BTreeMap<NaiveDate, Vec<UnscheduledDate>> {
    let mut weeks: BTreeMap<NaiveDate, Vec<UnscheduledDate>> = BTreeMap::new();
    for gap in gaps {
        let (week_start, _) = week_bounds(gap.date);
        weeks.entry(week_start).or_default().push(*gap);
    }
    weeks
}

fn covering_schedules(items: &[InventoryUnit], exclusions: GapExclusions) -> Vec<&ServingSchedule> {
    items
        .iter()
        .filter(|item| item.status.is_active())
        .filter_map(|item| {
            let schedule = item.serving_schedule.as_ref()?;
            if !schedule.kind.is_valid() {
                debug!(item_id = %item.id, "Ignoring incomplete serving schedule");
                return None;
            }
            if exclusions.excludes(schedule.schedule_type()) {
                return None;
            }
            Some(schedule)
        })
        .collect()
}
