//! Error types for mavuno-store.

use mavuno_core::AuctionId;
use thiserror::Error;

/// Store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Auction {0} already exists")]
    DuplicateAuction(AuctionId),

    #[error("Auction {0} not found")]
    NotFound(AuctionId),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
