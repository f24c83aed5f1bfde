//! Recurrence evaluation for serving schedules.
//!
//! This module answers three questions about a [`crate::models::ServingSchedule`]:
//! is a given date covered, what is the next covered date, and how should the
//! schedule be labelled for staff.

mod coverage;
mod display;

pub use coverage::{DEFAULT_NEXT_HORIZON_DAYS, is_covered, is_unit_scheduled_on, next_covered};
pub use display::{DEFAULT_MAX_LISTED_DATES, describe, display_schedule};
