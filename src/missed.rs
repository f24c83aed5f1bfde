//! Missed-serving detection and the daily serving board.
//!
//! An item is "missed" when a past occurrence of its schedule was due and
//! no serving was recorded for it. One-off and specific-date schedules are
//! checked exactly against their anchor date. Daily and weekly schedules use
//! a staleness heuristic: they are missed only if nothing was ever served and
//! the schedule started more than `staleness_days` ago.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::days_between;
use crate::models::{ConsumptionEvent, InventoryUnit, ScheduleKind};
use crate::schedule::is_covered;

/// Default staleness threshold for daily and weekly schedules, in days.
pub const DEFAULT_STALENESS_DAYS: i64 = 3;

/// Which list an item belongs on for a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingBucket {
    /// A past occurrence went unserved.
    Missed,
    /// Due today, not yet recorded.
    ScheduledToday,
    /// A serving was already recorded today.
    RecordedToday,
    /// None of the above.
    Other,
}

/// Items partitioned by [`ServingBucket`]. Every item lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingBoard {
    /// Items with an unserved past occurrence.
    pub missed: Vec<InventoryUnit>,
    /// Items due today.
    pub scheduled_today: Vec<InventoryUnit>,
    /// Items already served today.
    pub recorded_today: Vec<InventoryUnit>,
    /// Everything else.
    pub other: Vec<InventoryUnit>,
}

impl ServingBoard {
    /// Total number of items on the board.
    pub fn len(&self) -> usize {
        self.missed.len() + self.scheduled_today.len() + self.recorded_today.len() + self.other.len()
    }

    /// Returns true if the board holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns true if `item` has a past occurrence that was never served.
///
/// `last_consumption_date` is the most recent serving date recorded for the
/// item, if any. Only active items with a complete schedule can be missed,
/// and an item due today is never missed (it is "due", not "overdue").
///
/// - `once` / `specific_dates`: the anchor (the date, or the earliest listed
///   date) is before today and nothing was served on or after it
///   (this is a heuristic, not a per-date audit: later listed dates are not
///   checked once the anchor has been served)
/// - `daily` / `weekly`: nothing was ever served and the start date is more
///   than `staleness_days` before today
///
/// # Example
///
/// ```
/// use care_engine::missed::{is_missed, DEFAULT_STALENESS_DAYS};
/// use care_engine::models::{InventoryUnit, ItemCategory, ServingSchedule};
/// use chrono::NaiveDate;
///
/// let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let item = InventoryUnit::new("item_001", "res_01", "Pudding", ItemCategory::Dairy, jan(1))
///     .with_schedule(ServingSchedule::once(jan(1)));
///
/// assert!(is_missed(&item, jan(5), None, DEFAULT_STALENESS_DAYS));
/// assert!(!is_missed(&item, jan(1), None, DEFAULT_STALENESS_DAYS));
/// ```
pub fn is_missed(
    item: &InventoryUnit,
    today: NaiveDate,
    last_consumption_date: Option<NaiveDate>,
    staleness_days: i64,
) -> bool {
    if !item.status.is_active() {
        return false;
    }
    let Some(schedule) = item.serving_schedule.as_ref() else {
        return false;
    };
    if !schedule.kind.is_valid() || is_covered(schedule, today) {
        return false;
    }
    if last_consumption_date.is_some_and(|last| last >= today) {
        return false;
    }

    match &schedule.kind {
        ScheduleKind::Once { date } => anchor_missed(*date, today, last_consumption_date),
        ScheduleKind::SpecificDates { dates } => {
            anchor_missed(dates.first().copied(), today, last_consumption_date)
        }
        ScheduleKind::Daily { start_date } | ScheduleKind::Weekly { start_date, .. } => {
            last_consumption_date.is_none()
                && start_date.is_some_and(|start| days_between(start, today) > staleness_days)
        }
    }
}

/// Places one item in its bucket.
///
/// Missed is decided first; an item recorded today is never also scheduled.
pub fn classify_item(
    item: &InventoryUnit,
    today: NaiveDate,
    last_consumption_date: Option<NaiveDate>,
    recorded_today: bool,
    staleness_days: i64,
) -> ServingBucket {
    if is_missed(item, today, last_consumption_date, staleness_days) {
        ServingBucket::Missed
    } else if recorded_today {
        ServingBucket::RecordedToday
    } else if item.status.is_active()
        && item
            .serving_schedule
            .as_ref()
            .is_some_and(|schedule| is_covered(schedule, today))
    {
        ServingBucket::ScheduledToday
    } else {
        ServingBucket::Other
    }
}

/// Partitions `items` into a [`ServingBoard`] for `today`.
///
/// `events` may cover any set of items; events dated after `today` are
/// ignored when looking for the last serving.
pub fn classify_items(
    items: &[InventoryUnit],
    events: &[ConsumptionEvent],
    today: NaiveDate,
    staleness_days: i64,
) -> ServingBoard {
    let mut last_served: HashMap<&str, NaiveDate> = HashMap::new();
    let mut served_today: HashSet<&str> = HashSet::new();

    for event in events.iter().filter(|e| e.served_date <= today) {
        let entry = last_served
            .entry(event.item_id.as_str())
            .or_insert(event.served_date);
        if event.served_date > *entry {
            *entry = event.served_date;
        }
        if event.served_date == today {
            served_today.insert(event.item_id.as_str());
        }
    }

    let mut board = ServingBoard::default();
    for item in items {
        let bucket = classify_item(
            item,
            today,
            last_served.get(item.id.as_str()).copied(),
            served_today.contains(item.id.as_str()),
            staleness_days,
        );
        match bucket {
            ServingBucket::Missed => board.missed.push(item.clone()),
            ServingBucket::ScheduledToday => board.scheduled_today.push(item.clone()),
            ServingBucket::RecordedToday => board.recorded_today.push(item.clone()),
            ServingBucket::Other => board.other.push(item.clone()),
        }
    }

    debug!(
        today = %today,
        missed = board.missed.len(),
        scheduled_today = board.scheduled_today.len(),
        recorded_today = board.recorded_today.len(),
        other = board.other.len(),
        "Classified serving board"
    );

    board
}

fn anchor_missed(
    anchor: Option<NaiveDate>,
    today: NaiveDate,
    last_consumption_date: Option<NaiveDate>,
) -> bool {
    match anchor {
        Some(anchor) => anchor < today && last_consumption_date.is_none_or(|last| last < anchor),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemCategory, ItemStatus, ServingSchedule};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_item(id: &str, schedule: ServingSchedule) -> InventoryUnit {
        InventoryUnit::new(id, "res_01", "Yogurt", ItemCategory::Dairy, date("2023-12-30"))
            .with_schedule(schedule)
    }

    fn create_event(item_id: &str, served: &str) -> ConsumptionEvent {
        ConsumptionEvent {
            id: Uuid::new_v4(),
            item_id: item_id.to_string(),
            served_date: date(served),
            served_quantity: Decimal::ONE,
            consumed_quantity: Decimal::ONE,
            wasted_quantity: Decimal::ZERO,
            remaining_handling: None,
            recorded_at: Utc::now(),
            recorded_by: None,
            note: None,
        }
    }

    // ==========================================================================
    // once
    // ==========================================================================
    #[test]
    fn test_once_past_without_serving_is_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-01")));
        assert!(is_missed(&item, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_once_due_today_is_not_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-01")));
        assert!(!is_missed(&item, date("2024-01-01"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_once_future_is_not_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-10")));
        assert!(!is_missed(&item, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_once_served_on_or_after_date_is_not_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-01")));
        assert!(!is_missed(
            &item,
            date("2024-01-05"),
            Some(date("2024-01-01")),
            DEFAULT_STALENESS_DAYS
        ));
        assert!(!is_missed(
            &item,
            date("2024-01-05"),
            Some(date("2024-01-03")),
            DEFAULT_STALENESS_DAYS
        ));
    }

    #[test]
    fn test_once_served_before_date_is_still_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-03")));
        assert!(is_missed(
            &item,
            date("2024-01-05"),
            Some(date("2024-01-02")),
            DEFAULT_STALENESS_DAYS
        ));
    }

    #[test]
    fn test_served_today_is_never_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-01")));
        assert!(!is_missed(
            &item,
            date("2024-01-05"),
            Some(date("2024-01-05")),
            DEFAULT_STALENESS_DAYS
        ));
    }

    // ==========================================================================
    // specific_dates
    // ==========================================================================
    #[test]
    fn test_specific_dates_anchor_is_earliest_date() {
        let item = create_item(
            "item_001",
            ServingSchedule::specific_dates([date("2024-01-08"), date("2024-01-02")]),
        );
        assert!(is_missed(&item, date("2024-01-04"), None, DEFAULT_STALENESS_DAYS));
        assert!(!is_missed(
            &item,
            date("2024-01-04"),
            Some(date("2024-01-02")),
            DEFAULT_STALENESS_DAYS
        ));
    }

    #[test]
    fn test_specific_dates_due_today_is_not_missed() {
        let item = create_item(
            "item_001",
            ServingSchedule::specific_dates([date("2024-01-02"), date("2024-01-04")]),
        );
        assert!(!is_missed(&item, date("2024-01-04"), None, DEFAULT_STALENESS_DAYS));
    }

    // ==========================================================================
    // daily / weekly heuristic
    // ==========================================================================
    #[test]
    fn test_daily_started_is_due_today_not_missed() {
        let item = create_item("item_001", ServingSchedule::daily(Some(date("2024-01-01"))));
        assert!(!is_missed(&item, date("2024-01-10"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_weekly_stale_without_any_serving_is_missed() {
        // Mondays only; 2024-01-10 is a Wednesday, 9 days after start
        let item = create_item("item_001", ServingSchedule::weekly(Some(date("2024-01-01")), [1]));
        assert!(is_missed(&item, date("2024-01-10"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_weekly_within_threshold_is_not_missed() {
        // 2024-01-04 is 3 days after start: not more than the threshold
        let item = create_item("item_001", ServingSchedule::weekly(Some(date("2024-01-01")), [1]));
        assert!(!is_missed(&item, date("2024-01-04"), None, DEFAULT_STALENESS_DAYS));
        assert!(is_missed(&item, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_weekly_with_any_serving_is_not_missed() {
        let item = create_item("item_001", ServingSchedule::weekly(Some(date("2024-01-01")), [1]));
        assert!(!is_missed(
            &item,
            date("2024-01-31"),
            Some(date("2024-01-01")),
            DEFAULT_STALENESS_DAYS
        ));
    }

    #[test]
    fn test_weekly_without_start_is_never_missed() {
        let item = create_item("item_001", ServingSchedule::weekly(None, [1]));
        assert!(!is_missed(&item, date("2024-01-10"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_staleness_threshold_is_configurable() {
        let item = create_item("item_001", ServingSchedule::weekly(Some(date("2024-01-01")), [1]));
        assert!(!is_missed(&item, date("2024-01-10"), None, 14));
        assert!(is_missed(&item, date("2024-01-03"), None, 0));
    }

    // ==========================================================================
    // status and schedule validity
    // ==========================================================================
    #[test]
    fn test_inactive_items_are_never_missed() {
        let item = create_item("item_001", ServingSchedule::once(date("2024-01-01")))
            .with_status(ItemStatus::Consumed);
        assert!(!is_missed(&item, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
    }

    #[test]
    fn test_unscheduled_and_invalid_items_are_never_missed() {
        let plain = InventoryUnit::new(
            "item_001",
            "res_01",
            "Tea",
            ItemCategory::Drink,
            date("2024-01-01"),
        );
        let invalid = create_item("item_002", ServingSchedule::weekly(Some(date("2023-01-01")), [9]));

        assert!(!is_missed(&plain, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
        assert!(!is_missed(&invalid, date("2024-01-05"), None, DEFAULT_STALENESS_DAYS));
    }

    // ==========================================================================
    // classify_items
    // ==========================================================================
    #[test]
    fn test_classify_items_partitions_board() {
        let today = date("2024-01-05");
        let items = vec![
            create_item("missed", ServingSchedule::once(date("2024-01-01"))),
            create_item("due", ServingSchedule::once(today)),
            create_item("served", ServingSchedule::daily(Some(date("2024-01-01")))),
            create_item("later", ServingSchedule::once(date("2024-01-09"))),
        ];
        let events = vec![
            create_event("served", "2024-01-05"),
            create_event("served", "2024-01-04"),
        ];

        let board = classify_items(&items, &events, today, DEFAULT_STALENESS_DAYS);

        let ids = |units: &[InventoryUnit]| units.iter().map(|u| u.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&board.missed), vec!["missed"]);
        assert_eq!(ids(&board.scheduled_today), vec!["due"]);
        assert_eq!(ids(&board.recorded_today), vec!["served"]);
        assert_eq!(ids(&board.other), vec!["later"]);
        assert_eq!(board.len(), items.len());
    }

    #[test]
    fn test_classify_uses_latest_past_event() {
        let today = date("2024-01-05");
        let items = vec![create_item("item_001", ServingSchedule::once(date("2024-01-03")))];
        let events = vec![
            create_event("item_001", "2024-01-02"),
            create_event("item_001", "2024-01-03"),
        ];

        let board = classify_items(&items, &events, today, DEFAULT_STALENESS_DAYS);
        assert!(board.missed.is_empty());
        assert_eq!(board.other.len(), 1);
    }

    #[test]
    fn test_classify_ignores_future_events() {
        let today = date("2024-01-05");
        let items = vec![create_item("item_001", ServingSchedule::once(date("2024-01-03")))];
        let events = vec![create_event("item_001", "2024-01-07")];

        let board = classify_items(&items, &events, today, DEFAULT_STALENESS_DAYS);
        assert_eq!(board.missed.len(), 1);
    }

    #[test]
    fn test_classify_empty_input() {
        let board = classify_items(&[], &[], date("2024-01-05"), DEFAULT_STALENESS_DAYS);
        assert!(board.is_empty());
    }

    #[test]
    fn test_inactive_item_due_today_is_other() {
        let today = date("2024-01-05");
        let item = create_item("item_001", ServingSchedule::once(today))
            .with_status(ItemStatus::Discarded);
        assert_eq!(
            classify_item(&item, today, None, false, DEFAULT_STALENESS_DAYS),
            ServingBucket::Other
        );
    }
}
