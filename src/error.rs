//! Error types for the care engine.
//!
//! Pure evaluators (coverage, gaps, FIFO ordering, depletion) never fail.
//! The errors here cover the fallible edges: configuration loading,
//! repository access, and validation of a serving before it reaches the ledger.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the care engine.
///
/// # Example
///
/// ```
/// use care_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/care_engine.yaml".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Configuration file not found: /missing/care_engine.yaml"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A repository snapshot could not be decoded.
    #[error("Failed to parse repository snapshot: {message}")]
    SnapshotParseError {
        /// A description of the parse error.
        message: String,
    },

    /// No care item exists with the given id.
    #[error("Care item not found: {item_id}")]
    ItemNotFound {
        /// The id that was looked up.
        item_id: String,
    },

    /// The served quantity is larger than what is left of the item.
    #[error("Served quantity {requested} exceeds remaining stock {remaining} for item '{item_id}'")]
    ExceedsRemainingStock {
        /// The item being served.
        item_id: String,
        /// The quantity the caregiver tried to serve.
        requested: Decimal,
        /// The quantity still in stock.
        remaining: Decimal,
    },

    /// A serving request was rejected before reaching the ledger.
    #[error("Invalid serving for item '{item_id}': {message}")]
    InvalidServing {
        /// The item being served.
        item_id: String,
        /// A description of what made the serving invalid.
        message: String,
    },

    /// The backing repository reported a failure.
    ///
    /// Raised by storage-backed `ItemRepository` / `LedgerSink` implementations;
    /// the in-memory repository never fails this way.
    #[error("Repository error: {message}")]
    Repository {
        /// A description of the failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
