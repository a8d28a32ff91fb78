//! Error types for mavuno-lifecycle.

use mavuno_core::{AuctionId, AuctionStatus, FarmerId, ValidationError};
use mavuno_store::StoreError;
use thiserror::Error;

/// Lifecycle error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Auction {0} not found")]
    NotFound(AuctionId),

    /// Authorization failure, not a state-machine failure: the request
    /// mutates nothing and is logged as a security-relevant event.
    #[error("Only the auction owner may close or cancel it")]
    NotOwner {
        auction: AuctionId,
        requester: FarmerId,
    },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AuctionStatus,
        to: AuctionStatus,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for lifecycle operations.
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;
