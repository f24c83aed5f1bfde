//! Depletion ledger: turns a serving into consumed, wasted and remaining stock.
//!
//! The ledger trusts its caller. Checking that a serving fits the remaining
//! stock is done up front by [`validate_serving`], which the engine calls
//! before [`apply_consumption`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{InventoryUnit, ItemStatus, RemainingHandling};

/// The effect of one serving on a unit's stock.
///
/// `consumed + wasted == deducted` and `deducted <= served` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepletionOutcome {
    /// Quantity put out.
    pub served: Decimal,
    /// Quantity eaten.
    pub consumed: Decimal,
    /// Quantity lost to waste.
    pub wasted: Decimal,
    /// Quantity removed from stock.
    pub deducted: Decimal,
    /// Stock after the serving, or `None` for untracked units.
    pub new_current_quantity: Option<Decimal>,
    /// Status the unit moves to, if it changes.
    pub status_transition: Option<ItemStatus>,
    /// Human-readable account of the calculation.
    pub reasoning: String,
}

impl DepletionOutcome {
    /// Returns `unit` with this outcome applied.
    pub fn updated_unit(&self, unit: &InventoryUnit) -> InventoryUnit {
        let mut updated = unit.clone();
        if self.new_current_quantity.is_some() {
            updated.current_quantity = self.new_current_quantity;
        }
        if let Some(status) = self.status_transition {
            updated.status = status;
        }
        updated
    }
}

/// Applies a serving to `unit` and returns its effect.
///
/// - `consumed = served × consumption_rate` (rate clamped to `[0, 1]`)
/// - [`RemainingHandling::Stored`]: the uneaten part goes back into stock,
///   so only `consumed` is deducted and nothing is wasted
/// - any other handling, or none: the whole serving is deducted and the
///   uneaten part is waste
/// - stock never goes below zero; a tracked unit that reaches zero becomes
///   `consumed`, and a pending unit that is partly served becomes `in_progress`
/// - untracked units become `consumed` on any serving
///
/// # Example
///
/// ```
/// use care_engine::inventory::apply_consumption;
/// use care_engine::models::{InventoryUnit, ItemCategory, RemainingHandling};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let unit = InventoryUnit::new(
///     "item_001", "res_01", "Mandarin", ItemCategory::Fruit,
///     NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
/// )
/// .with_quantity(Decimal::from(4), "pieces");
///
/// let half = Decimal::new(5, 1);
/// let stored = apply_consumption(&unit, Decimal::from(2), half, Some(RemainingHandling::Stored));
/// assert_eq!(stored.consumed, Decimal::from(1));
/// assert_eq!(stored.wasted, Decimal::ZERO);
/// assert_eq!(stored.new_current_quantity, Some(Decimal::from(3)));
///
/// let discarded = apply_consumption(&unit, Decimal::from(2), half, Some(RemainingHandling::Discarded));
/// assert_eq!(discarded.wasted, Decimal::from(1));
/// assert_eq!(discarded.new_current_quantity, Some(Decimal::from(2)));
/// ```
pub fn apply_consumption(
    unit: &InventoryUnit,
    served_quantity: Decimal,
    consumption_rate: Decimal,
    remaining_handling: Option<RemainingHandling>,
) -> DepletionOutcome {
    let served = served_quantity.max(Decimal::ZERO);
    let rate = clamp_rate(&unit.id, consumption_rate);
    let consumed = served * rate;

    let stored = remaining_handling == Some(RemainingHandling::Stored);
    let deducted = if stored { consumed } else { served };
    let wasted = deducted - consumed;

    let (new_current_quantity, status_transition) = match unit.remaining_quantity() {
        Some(remaining) => {
            let new_quantity = (remaining - deducted).max(Decimal::ZERO);
            let transition = if new_quantity.is_zero() {
                Some(ItemStatus::Consumed)
            } else if unit.status == ItemStatus::Pending && deducted > Decimal::ZERO {
                Some(ItemStatus::InProgress)
            } else {
                None
            };
            (Some(new_quantity), transition)
        }
        None => {
            let transition = unit.status.is_active().then_some(ItemStatus::Consumed);
            (None, transition)
        }
    };

    let reasoning = describe(
        served,
        rate,
        consumed,
        wasted,
        deducted,
        remaining_handling,
        unit.remaining_quantity(),
        new_current_quantity,
    );

    DepletionOutcome {
        served,
        consumed,
        wasted,
        deducted,
        new_current_quantity,
        status_transition: status_transition.filter(|status| *status != unit.status),
        reasoning,
    }
}

/// Checks a serving before it reaches the ledger.
///
/// # Errors
///
/// - [`EngineError::InvalidServing`] if the unit is not active, the served
///   quantity is not positive, or the rate is outside `[0, 1]`
/// - [`EngineError::ExceedsRemainingStock`] if a tracked unit has less left
///   than `served_quantity`
pub fn validate_serving(
    unit: &InventoryUnit,
    served_quantity: Decimal,
    consumption_rate: Decimal,
) -> EngineResult<()> {
    if !unit.status.is_active() {
        return Err(EngineError::InvalidServing {
            item_id: unit.id.clone(),
            message: format!("item is {:?} and cannot be served", unit.status),
        });
    }
    if served_quantity <= Decimal::ZERO {
        return Err(EngineError::InvalidServing {
            item_id: unit.id.clone(),
            message: "served quantity must be positive".to_string(),
        });
    }
    if consumption_rate < Decimal::ZERO || consumption_rate > Decimal::ONE {
        return Err(EngineError::InvalidServing {
            item_id: unit.id.clone(),
            message: format!(
                "consumption rate {} is outside 0..=1",
                consumption_rate.normalize()
            ),
        });
    }
    if let Some(remaining) = unit.remaining_quantity() {
        if served_quantity > remaining {
            return Err(EngineError::ExceedsRemainingStock {
                item_id: unit.id.clone(),
                requested: served_quantity,
                remaining,
            });
        }
    }
    Ok(())
}

fn clamp_rate(item_id: &str, rate: Decimal) -> Decimal {
    let clamped = rate.clamp(Decimal::ZERO, Decimal::ONE);
    if clamped != rate {
        warn!(item_id = %item_id, rate = %rate, "Consumption rate out of range, clamped");
    }
    clamped
}

#[allow(clippy::too_many_arguments)]
fn describe(
    served: Decimal,
    rate: Decimal,
    consumed: Decimal,
    wasted: Decimal,
    deducted: Decimal,
    handling: Option<RemainingHandling>,
    before: Option<Decimal>,
    after: Option<Decimal>,
) -> String {
    let handling_str = match handling {
        Some(RemainingHandling::Stored) => "stored",
        Some(RemainingHandling::Discarded) => "discarded",
        Some(RemainingHandling::Other) => "other",
        None => "unspecified",
    };
    let stock = match (before, after) {
        (Some(before), Some(after)) => {
            format!("stock {} -> {}", before.normalize(), after.normalize())
        }
        _ => "quantity not tracked".to_string(),
    };
    format!(
        "{} x {} = {} consumed; remainder {} ({} wasted); {} deducted; {}",
        served.normalize(),
        rate.normalize(),
        consumed.normalize(),
        handling_str,
        wasted.normalize(),
        deducted.normalize(),
        stock
    )
}
