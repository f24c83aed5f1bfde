//! FIFO consumption tracking.
//!
//! Units of the same product are served first-expired-first-out, and each
//! serving is run through the depletion ledger to work out how much was
//! eaten, how much was wasted and what is left.

mod expiry;
mod fifo;
mod ledger;

pub use expiry::{DEFAULT_EXPIRING_SOON_DAYS, ExpiryStatus, days_until_expiry, expiry_status};
pub use fifo::{
    compare_fifo, fifo_candidates, group_by_name, order_fifo, recommended_unit, sort_fifo,
};
pub use ledger::{DepletionOutcome, apply_consumption, validate_serving};
