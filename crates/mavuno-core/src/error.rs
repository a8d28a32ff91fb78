//! Error types for mavuno-core.

use thiserror::Error;

/// Listing-terms validation failures.
///
/// These are raised before any state is touched and are never
/// retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Starting price must not be negative")]
    NegativeStartingPrice,

    #[error("Auction quantity must be at least 1")]
    QuantityTooSmall,

    #[error("Minimum bid increment must be at least 1")]
    IncrementTooSmall,

    #[error("End date must be after start date")]
    WindowInverted,

    #[error("Reserve price must be at least the starting price")]
    ReserveBelowStarting,
}

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
