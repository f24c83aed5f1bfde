//! Expiry urgency of care item units.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::InventoryUnit;

/// Default window, in days, for [`ExpiryStatus::ExpiringSoon`].
pub const DEFAULT_EXPIRING_SOON_DAYS: i64 = 2;

/// How close a unit is to its expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// The expiration date is in the past.
    Expired,
    /// The unit expires today.
    ExpiresToday,
    /// The unit expires within the configured window.
    ExpiringSoon,
    /// The unit expires later than the window.
    Fresh,
    /// The unit has no expiration date.
    NoExpiry,
}

impl ExpiryStatus {
    /// Returns true if staff should be alerted about this unit.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            ExpiryStatus::Expired | ExpiryStatus::ExpiresToday | ExpiryStatus::ExpiringSoon
        )
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryStatus::Expired => write!(f, "expired"),
            ExpiryStatus::ExpiresToday => write!(f, "expires_today"),
            ExpiryStatus::ExpiringSoon => write!(f, "expiring_soon"),
            ExpiryStatus::Fresh => write!(f, "fresh"),
            ExpiryStatus::NoExpiry => write!(f, "no_expiry"),
        }
    }
}

/// Days from `today` until the unit expires.
///
/// Zero when it expires today, negative once expired, `None` without a date.
pub fn days_until_expiry(unit: &InventoryUnit, today: NaiveDate) -> Option<i64> {
    unit.expiration_date
        .map(|expiration| (expiration - today).num_days())
}

/// Classifies a unit's expiry relative to `today`.
///
/// `expiring_soon_days` is inclusive: with the default of 2, a unit that
/// expires the day after tomorrow is still expiring soon.
///
/// # Example
///
/// ```
/// use care_engine::inventory::{ExpiryStatus, expiry_status};
/// use care_engine::models::{InventoryUnit, ItemCategory};
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let unit = InventoryUnit::new("item_001", "res_01", "Yogurt", ItemCategory::Dairy, d(1))
///     .with_expiration(d(10));
///
/// assert_eq!(expiry_status(&unit, d(8), 2), ExpiryStatus::ExpiringSoon);
/// assert_eq!(expiry_status(&unit, d(10), 2), ExpiryStatus::ExpiresToday);
/// assert_eq!(expiry_status(&unit, d(11), 2), ExpiryStatus::Expired);
/// ```
pub fn expiry_status(
    unit: &InventoryUnit,
    today: NaiveDate,
    expiring_soon_days: i64,
) -> ExpiryStatus {
    match days_until_expiry(unit, today) {
        None => ExpiryStatus::NoExpiry,
        Some(days) if days < 0 => ExpiryStatus::Expired,
        Some(0) => ExpiryStatus::ExpiresToday,
        Some(days) if days <= expiring_soon_days => ExpiryStatus::ExpiringSoon,
        Some(_) => ExpiryStatus::Fresh,
    }
}
