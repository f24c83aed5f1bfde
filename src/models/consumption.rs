//! Consumption event model.
//!
//! A [`ConsumptionEvent`] records one serving of a care item: how much was
//! put in front of the resident, how much they ate, and what happened to the
//! rest.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What staff did with the part of a serving that was not eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainingHandling {
    /// Thrown away.
    Discarded,
    /// Put back into storage; it stays in stock.
    Stored,
    /// Handled some other way (given away, returned to family).
    Other,
}

/// One recorded serving of a care item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionEvent {
    /// Unique identifier.
    pub id: Uuid,
    /// The care item that was served.
    pub item_id: String,
    /// Calendar date of the serving.
    pub served_date: NaiveDate,
    /// Quantity put out.
    pub served_quantity: Decimal,
    /// Quantity eaten. Never exceeds `served_quantity`.
    pub consumed_quantity: Decimal,
    /// Quantity lost to waste.
    #[serde(default)]
    pub wasted_quantity: Decimal,
    /// Disposition of the uneaten part.
    #[serde(default)]
    pub remaining_handling: Option<RemainingHandling>,
    /// When the event was written.
    pub recorded_at: DateTime<Utc>,
    /// Staff member who recorded it.
    #[serde(default)]
    pub recorded_by: Option<String>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

impl ConsumptionEvent {
    /// Fraction of the serving that was eaten, in `[0, 1]`.
    ///
    /// A zero serving yields a rate of zero.
    ///
    /// # Example
    ///
    /// ```
    /// use care_engine::models::ConsumptionEvent;
    /// use chrono::{NaiveDate, Utc};
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let event = ConsumptionEvent {
    ///     id: Uuid::new_v4(),
    ///     item_id: "item_001".to_string(),
    ///     served_date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
    ///     served_quantity: Decimal::from(2),
    ///     consumed_quantity: Decimal::from(1),
    ///     wasted_quantity: Decimal::from(1),
    ///     remaining_handling: None,
    ///     recorded_at: Utc::now(),
    ///     recorded_by: None,
    ///     note: None,
    /// };
    /// assert_eq!(event.consumption_rate(), Decimal::new(5, 1));
    /// ```
    pub fn consumption_rate(&self) -> Decimal {
        if self.served_quantity <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.consumed_quantity / self.served_quantity).min(Decimal::ONE)
    }
}
