//! Care item (inventory unit) model.
//!
//! One [`InventoryUnit`] is one physical batch of a consumable brought in for
//! a resident. Several units may share a name; the FIFO ordering in
//! [`crate::inventory`] decides which of them is served first.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServingSchedule;

/// Lifecycle status of a care item.
///
/// `pending -> in_progress -> consumed | discarded`, with `pending_discard`
/// as a side branch while staff confirm a disposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Registered, not yet served.
    Pending,
    /// Partly consumed.
    InProgress,
    /// Fully consumed.
    Consumed,
    /// Thrown away.
    Discarded,
    /// Flagged for disposal, awaiting confirmation.
    PendingDiscard,
}

impl ItemStatus {
    /// Returns true for statuses that still expect servings.
    ///
    /// # Example
    ///
    /// ```
    /// use care_engine::models::ItemStatus;
    ///
    /// assert!(ItemStatus::Pending.is_active());
    /// assert!(ItemStatus::InProgress.is_active());
    /// assert!(!ItemStatus::PendingDiscard.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        matches!(self, ItemStatus::Pending | ItemStatus::InProgress)
    }

    /// Returns true for statuses with no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Consumed | ItemStatus::Discarded)
    }
}

/// Broad category of a care item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Fresh or cut fruit.
    Fruit,
    /// Sweets, crackers and similar.
    Snack,
    /// Juice, tea, jelly drinks.
    Drink,
    /// Yogurt, pudding, cheese.
    Dairy,
    /// Home-cooked or packaged meals.
    Prepared,
    /// Nutritional supplements.
    Supplement,
    /// Anything else, including categories this engine does not know.
    #[serde(other)]
    Other,
}

/// A tracked quantity with its unit of measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// Amount as registered by the family.
    pub value: Decimal,
    /// Unit of measure (e.g. "pieces", "packs", "ml").
    pub unit: String,
}

/// Folds a product name into its grouping form: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One physical batch of a care item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUnit {
    /// Unique identifier.
    pub id: String,
    /// The resident the item was sent to.
    pub resident_id: String,
    /// Display name as entered.
    pub name: String,
    /// Normalized name used to group units of the same product.
    #[serde(default)]
    pub normalized_name: Option<String>,
    /// Category of the item.
    pub category: ItemCategory,
    /// Best-before or use-by date.
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    /// Structured quantity. `None` means only served / not served is tracked.
    #[serde(default)]
    pub quantity: Option<Quantity>,
    /// Quantity at registration.
    #[serde(default)]
    pub initial_quantity: Option<Decimal>,
    /// Quantity still in stock. Never increases once consumption starts.
    #[serde(default)]
    pub current_quantity: Option<Decimal>,
    /// Date the item was sent (its arrival date for FIFO purposes).
    pub sent_date: NaiveDate,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// Serving schedule, if the family set one. A malformed record loads as `None`.
    #[serde(default, deserialize_with = "super::schedule::deserialize_lenient")]
    pub serving_schedule: Option<ServingSchedule>,
}

impl InventoryUnit {
    /// Creates a pending, quantity-untracked unit with no schedule.
    pub fn new(
        id: impl Into<String>,
        resident_id: impl Into<String>,
        name: impl Into<String>,
        category: ItemCategory,
        sent_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            resident_id: resident_id.into(),
            name: name.into(),
            normalized_name: None,
            category,
            expiration_date: None,
            quantity: None,
            initial_quantity: None,
            current_quantity: None,
            sent_date,
            status: ItemStatus::Pending,
            serving_schedule: None,
        }
    }

    /// Starts tracking `value` of `unit`, as both initial and current stock.
    pub fn with_quantity(mut self, value: Decimal, unit: impl Into<String>) -> Self {
        self.quantity = Some(Quantity {
            value,
            unit: unit.into(),
        });
        self.initial_quantity = Some(value);
        self.current_quantity = Some(value);
        self
    }

    /// Sets the expiration date.
    pub fn with_expiration(mut self, expiration_date: NaiveDate) -> Self {
        self.expiration_date = Some(expiration_date);
        self
    }

    /// Attaches a serving schedule.
    pub fn with_schedule(mut self, schedule: ServingSchedule) -> Self {
        self.serving_schedule = Some(schedule);
        self
    }

    /// Sets the normalized grouping name.
    pub fn with_normalized_name(mut self, normalized_name: impl Into<String>) -> Self {
        self.normalized_name = Some(normalized_name.into());
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if this unit tracks a numeric quantity.
    pub fn is_quantity_tracked(&self) -> bool {
        self.quantity.is_some()
    }

    /// Returns the quantity still in stock, or `None` if untracked.
    ///
    /// Falls back to the initial quantity, then the registered value, for
    /// records that never stored a current quantity.
    ///
    /// # Example
    ///
    /// ```
    /// use care_engine::models::{InventoryUnit, ItemCategory};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let sent = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    /// let tracked = InventoryUnit::new("item_001", "res_01", "Mandarin", ItemCategory::Fruit, sent)
    ///     .with_quantity(Decimal::from(4), "pieces");
    /// assert_eq!(tracked.remaining_quantity(), Some(Decimal::from(4)));
    ///
    /// let untracked = InventoryUnit::new("item_002", "res_01", "Tea", ItemCategory::Drink, sent);
    /// assert_eq!(untracked.remaining_quantity(), None);
    /// ```
    pub fn remaining_quantity(&self) -> Option<Decimal> {
        let quantity = self.quantity.as_ref()?;
        Some(
            self.current_quantity
                .or(self.initial_quantity)
                .unwrap_or(quantity.value),
        )
    }

    /// Returns true if the unit can still be served from.
    ///
    /// Untracked units are in stock while active; tracked units need a
    /// positive remaining quantity.
    pub fn is_in_stock(&self) -> bool {
        if !self.status.is_active() {
            return false;
        }
        match self.remaining_quantity() {
            Some(remaining) => remaining > Decimal::ZERO,
            None => true,
        }
    }

    /// Key used to group units of the same product.
    ///
    /// The normalized name when present and non-blank, otherwise the display
    /// name; either way trimmed and lowercased by [`normalize_name`].
    pub fn group_key(&self) -> String {
        match self.normalized_name.as_deref().map(str::trim) {
            Some(normalized) if !normalized.is_empty() => normalize_name(normalized),
            _ => normalize_name(&self.name),
        }
    }
}
