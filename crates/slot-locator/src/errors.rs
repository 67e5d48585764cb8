//! Error types for locator system

use thiserror::Error;

/// Failure reported by the host while running a single query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The host cannot evaluate this kind of query
    #[error("Unsupported query: {0}")]
    Unsupported(String),

    /// The host raised while evaluating the query
    #[error("Host error: {0}")]
    Host(String),
}

/// Locator error enumeration
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Element not found with any strategy
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Slot identifier cannot be looked up
    #[error("Invalid slot id: {0}")]
    InvalidSlot(String),

    /// Strategy execution failed
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}
