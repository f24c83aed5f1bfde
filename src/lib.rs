//! Serving-schedule and FIFO depletion engine for resident care items.
//!
//! Families bring consumables (fruit, snacks, drinks) for residents of a care
//! facility. This crate decides, for any date, whether an item is scheduled to
//! be served, which dates in a look-ahead window nothing covers, which
//! scheduled servings were missed, which physical unit of a product to serve
//! first, and how a recorded serving depletes stock.
//!
//! The evaluators are pure functions over snapshots; [`engine::CareEngine`]
//! wires them to a repository and a clock.

#![warn(missing_docs)]

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod gaps;
pub mod inventory;
pub mod missed;
pub mod models;
pub mod repository;
pub mod schedule;
