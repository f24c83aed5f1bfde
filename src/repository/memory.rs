//! In-memory repository.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{ConsumptionEvent, InventoryUnit, SkipDate};

use super::{ItemFilter, ItemRepository, LedgerMutation, LedgerSink};

/// Everything a repository holds, in its JSON record shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositorySnapshot {
    /// Care item units.
    pub items: Vec<InventoryUnit>,
    /// Recorded servings.
    pub consumption_events: Vec<ConsumptionEvent>,
    /// Skip marks.
    pub skip_dates: Vec<SkipDate>,
}

/// A repository that keeps everything in vectors.
///
/// Items keep their insertion order, which is the "input order" FIFO ties
/// fall back to.
///
/// # Example
///
/// ```
/// use care_engine::repository::{InMemoryRepository, ItemFilter, ItemRepository};
///
/// let repository = InMemoryRepository::from_json_str(r#"{
///     "items": [{
///         "id": "item_001",
///         "residentId": "res_01",
///         "name": "Mandarin",
///         "category": "fruit",
///         "sentDate": "2024-01-05",
///         "status": "pending"
///     }]
/// }"#)?;
///
/// let items = repository.list_items(&ItemFilter::resident("res_01"))?;
/// assert_eq!(items.len(), 1);
/// # Ok::<(), care_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshot: RepositorySnapshot,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing snapshot.
    pub fn from_snapshot(snapshot: RepositorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Decodes a JSON snapshot.
    ///
    /// # Errors
    ///
    /// [`EngineError::SnapshotParseError`] if the JSON does not match
    /// [`RepositorySnapshot`].
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let snapshot: RepositorySnapshot =
            serde_json::from_str(json).map_err(|e| EngineError::SnapshotParseError {
                message: e.to_string(),
            })?;
        debug!(
            items = snapshot.items.len(),
            events = snapshot.consumption_events.len(),
            skip_dates = snapshot.skip_dates.len(),
            "Loaded repository snapshot"
        );
        Ok(Self { snapshot })
    }

    /// Adds an item.
    pub fn insert_item(&mut self, unit: InventoryUnit) {
        self.snapshot.items.push(unit);
    }

    /// Adds a recorded serving.
    pub fn insert_event(&mut self, event: ConsumptionEvent) {
        self.snapshot.consumption_events.push(event);
    }

    /// Adds a skip mark.
    pub fn insert_skip_date(&mut self, skip: SkipDate) {
        self.snapshot.skip_dates.push(skip);
    }

    /// The current contents.
    pub fn snapshot(&self) -> &RepositorySnapshot {
        &self.snapshot
    }

    /// Consumes the repository, returning its contents.
    pub fn into_snapshot(self) -> RepositorySnapshot {
        self.snapshot
    }

    fn resident_of(&self, item_id: &str) -> Option<&str> {
        self.snapshot
            .items
            .iter()
            .find(|unit| unit.id == item_id)
            .map(|unit| unit.resident_id.as_str())
    }
}

impl ItemRepository for InMemoryRepository {
    fn list_items(&self, filter: &ItemFilter) -> EngineResult<Vec<InventoryUnit>> {
        Ok(self
            .snapshot
            .items
            .iter()
            .filter(|unit| filter.matches(unit))
            .cloned()
            .collect())
    }

    fn get_item(&self, item_id: &str) -> EngineResult<Option<InventoryUnit>> {
        Ok(self
            .snapshot
            .items
            .iter()
            .find(|unit| unit.id == item_id)
            .cloned())
    }

    fn consumption_events(&self, resident_id: &str) -> EngineResult<Vec<ConsumptionEvent>> {
        Ok(self
            .snapshot
            .consumption_events
            .iter()
            .filter(|event| self.resident_of(&event.item_id) == Some(resident_id))
            .cloned()
            .collect())
    }

    fn skip_dates(&self, resident_id: &str) -> EngineResult<Vec<SkipDate>> {
        Ok(self
            .snapshot
            .skip_dates
            .iter()
            .filter(|skip| skip.resident_id == resident_id)
            .cloned()
            .collect())
    }
}

impl LedgerSink for InMemoryRepository {
    fn record(&mut self, mutation: LedgerMutation) -> EngineResult<()> {
        let LedgerMutation {
            event,
            updated_unit,
            ..
        } = mutation;

        let slot = self
            .snapshot
            .items
            .iter_mut()
            .find(|unit| unit.id == updated_unit.id)
            .ok_or_else(|| EngineError::ItemNotFound {
                item_id: updated_unit.id.clone(),
            })?;
        *slot = updated_unit;
        self.snapshot.consumption_events.push(event);
        Ok(())
    }
}
