//! Core data models for the care engine.
//!
//! These are plain snapshots handed over by the item repository. The engine
//! reads them and proposes changes; it never persists anything itself.

mod calendar_marks;
mod consumption;
mod item;
mod schedule;

pub use calendar_marks::{SkipDate, UnscheduledDate};
pub use consumption::{ConsumptionEvent, RemainingHandling};
pub use item::{InventoryUnit, ItemCategory, ItemStatus, Quantity, normalize_name};
pub use schedule::{MAX_WEEKDAY, ScheduleKind, ScheduleType, ServingSchedule, TimeSlot};
