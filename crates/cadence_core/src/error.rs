//! Clock error types

use thiserror::Error;

/// Errors raised by clock hosts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    /// Time can only move forward by a finite amount
    #[error("Invalid clock advance: {0} ms (must be finite and non-negative)")]
    InvalidAdvance(f64),
}

/// Result type for clock operations
pub type Result<T> = std::result::Result<T, ClockError>;
