//! First-expired-first-out ordering of care item units.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{InventoryUnit, normalize_name};

/// Compares two units in FIFO order.
///
/// 1. Units with an expiration date come before units without one.
/// 2. Among dated units, the earlier expiration wins; ties go to the earlier arrival.
/// 3. Undated units are ordered by arrival.
///
/// Units equal on both dates compare `Equal`, so a stable sort keeps their
/// input order.
pub fn compare_fifo(a: &InventoryUnit, b: &InventoryUnit) -> Ordering {
    match (a.expiration_date, b.expiration_date) {
        (Some(a_exp), Some(b_exp)) => a_exp
            .cmp(&b_exp)
            .then_with(|| a.sent_date.cmp(&b.sent_date)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.sent_date.cmp(&b.sent_date),
    }
}

/// Returns `units` in FIFO order (stable).
///
/// # Example
///
/// ```
/// use care_engine::inventory::order_fifo;
/// use care_engine::models::{InventoryUnit, ItemCategory};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let units = vec![
///     InventoryUnit::new("a", "res_01", "Apple", ItemCategory::Fruit, d(1, 10)).with_expiration(d(2, 1)),
///     InventoryUnit::new("b", "res_01", "Apple", ItemCategory::Fruit, d(1, 5)).with_expiration(d(2, 1)),
///     InventoryUnit::new("c", "res_01", "Apple", ItemCategory::Fruit, d(1, 1)),
/// ];
///
/// let ids: Vec<String> = order_fifo(&units).into_iter().map(|u| u.id).collect();
/// assert_eq!(ids, vec!["b", "a", "c"]);
/// ```
pub fn order_fifo(units: &[InventoryUnit]) -> Vec<InventoryUnit> {
    let mut ordered = units.to_vec();
    sort_fifo(&mut ordered);
    ordered
}

/// Sorts `units` into FIFO order in place (stable).
pub fn sort_fifo(units: &mut [InventoryUnit]) {
    units.sort_by(compare_fifo);
}

/// Returns the unit that should be served first, if any.
pub fn recommended_unit(units: &[InventoryUnit]) -> Option<&InventoryUnit> {
    let mut refs: Vec<&InventoryUnit> = units.iter().collect();
    refs.sort_by(|a, b| compare_fifo(a, b));
    refs.first().copied()
}

/// Returns the active, in-stock units named `name`, in FIFO order.
///
/// Names are matched on their grouping key (see [`InventoryUnit::group_key`]).
pub fn fifo_candidates(units: &[InventoryUnit], name: &str) -> Vec<InventoryUnit> {
    let key = normalize_name(name);
    let mut candidates: Vec<InventoryUnit> = units
        .iter()
        .filter(|unit| unit.is_in_stock() && unit.group_key() == key)
        .cloned()
        .collect();
    sort_fifo(&mut candidates);
    candidates
}

/// Groups units by grouping key; each group is in FIFO order.
pub fn group_by_name(units: &[InventoryUnit]) -> BTreeMap<String, Vec<InventoryUnit>> {
    let mut groups: BTreeMap<String, Vec<InventoryUnit>> = BTreeMap::new();
    for unit in units {
        groups.entry(unit.group_key()).or_default().push(unit.clone());
    }
    for group in groups.values_mut() {
        sort_fifo(group);
    }
    groups
}
