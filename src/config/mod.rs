//! Configuration loading and management for the care engine.
//!
//! This module loads tunables (horizons, the missed-serving threshold, expiry
//! window) and display labels from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use care_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/care_engine.yaml").unwrap();
//! println!("Staleness threshold: {} days", loader.config().missed.staleness_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, ExpiryConfig, GapConfig, MissedConfig, ScheduleConfig, ScheduleLabels,
};
