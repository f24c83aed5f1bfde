//! Contracts between the engine and the world around it.
//!
//! The engine reads snapshots through [`ItemRepository`], hands proposed
//! changes to a [`LedgerSink`], and asks a [`Clock`] what day it is. It never
//! persists anything itself; [`InMemoryRepository`] is the reference
//! implementation used by tests and benchmarks.

mod clock;
mod memory;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::inventory::DepletionOutcome;
use crate::models::{ConsumptionEvent, InventoryUnit, ItemStatus, SkipDate};

pub use clock::{Clock, FixedClock, SystemClock};
pub use memory::{InMemoryRepository, RepositorySnapshot};

/// Selects care items from a repository.
///
/// An empty filter matches every item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Only items sent to this resident.
    pub resident_id: Option<String>,
    /// Only items in one of these statuses.
    pub statuses: Option<Vec<ItemStatus>>,
}

impl ItemFilter {
    /// Matches every item of `resident_id`.
    pub fn resident(resident_id: impl Into<String>) -> Self {
        Self {
            resident_id: Some(resident_id.into()),
            statuses: None,
        }
    }

    /// Restricts the filter to active (`pending` / `in_progress`) items.
    pub fn active(mut self) -> Self {
        self.statuses = Some(vec![ItemStatus::Pending, ItemStatus::InProgress]);
        self
    }

    /// Returns true if `unit` passes the filter.
    pub fn matches(&self, unit: &InventoryUnit) -> bool {
        self.resident_id
            .as_deref()
            .is_none_or(|resident| unit.resident_id == resident)
            && self
                .statuses
                .as_ref()
                .is_none_or(|statuses| statuses.contains(&unit.status))
    }
}

/// A change to the ledger proposed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMutation {
    /// The serving to append.
    pub event: ConsumptionEvent,
    /// The unit with its new quantity and status.
    pub updated_unit: InventoryUnit,
    /// How the new quantity was worked out.
    pub outcome: DepletionOutcome,
}

/// Read access to care items and their history.
pub trait ItemRepository {
    /// Lists items passing `filter`, in the repository's natural order.
    fn list_items(&self, filter: &ItemFilter) -> EngineResult<Vec<InventoryUnit>>;

    /// Looks up one item by id.
    fn get_item(&self, item_id: &str) -> EngineResult<Option<InventoryUnit>>;

    /// All consumption events recorded for `resident_id`'s items.
    fn consumption_events(&self, resident_id: &str) -> EngineResult<Vec<ConsumptionEvent>>;

    /// Skip marks for `resident_id`.
    fn skip_dates(&self, resident_id: &str) -> EngineResult<Vec<SkipDate>>;
}

/// Accepts ledger mutations.
///
/// The sink decides how to apply them atomically; the engine only proposes.
pub trait LedgerSink {
    /// Applies `mutation`.
    fn record(&mut self, mutation: LedgerMutation) -> EngineResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemCategory;
    use chrono::NaiveDate;

    fn create_unit(resident_id: &str, status: ItemStatus) -> InventoryUnit {
        InventoryUnit::new(
            "item_001",
            resident_id,
            "Jelly",
            ItemCategory::Snack,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_status(status)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ItemFilter::default();
        assert!(filter.matches(&create_unit("res_01", ItemStatus::Pending)));
        assert!(filter.matches(&create_unit("res_02", ItemStatus::Discarded)));
    }

    #[test]
    fn test_resident_filter() {
        let filter = ItemFilter::resident("res_01");
        assert!(filter.matches(&create_unit("res_01", ItemStatus::Consumed)));
        assert!(!filter.matches(&create_unit("res_02", ItemStatus::Pending)));
    }

    #[test]
    fn test_active_filter() {
        let filter = ItemFilter::resident("res_01").active();
        assert!(filter.matches(&create_unit("res_01", ItemStatus::Pending)));
        assert!(filter.matches(&create_unit("res_01", ItemStatus::InProgress)));
        assert!(!filter.matches(&create_unit("res_01", ItemStatus::PendingDiscard)));
        assert!(!filter.matches(&create_unit("res_01", ItemStatus::Consumed)));
    }
}
