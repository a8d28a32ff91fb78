//! Bid rejection taxonomy.
//!
//! A closed enum with structured payloads so callers can branch
//! programmatically instead of parsing message strings. Display
//! messages carry the KES amounts a bidder needs to correct and
//! resubmit without re-fetching auction state.

use crate::auction::AuctionStatus;
use crate::decimal::{Price, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a bid submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// No auction with the given id.
    #[error("Auction not found")]
    NotFound,

    /// The auction is not accepting bids in its current status.
    #[error("Auction is not active (status: {status})")]
    NotActive { status: AuctionStatus },

    /// Now is outside the bidding window. Guards against a stale active
    /// status between the deadline and the next lifecycle sweep.
    #[error("Auction is only open for bidding between {opens_at} and {closes_at}")]
    OutsideWindow {
        opens_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    },

    /// Requested quantity is non-positive or exceeds the lot.
    #[error("Bid quantity {requested} must be positive and at most {available}")]
    InvalidQuantity {
        requested: Quantity,
        available: Quantity,
    },

    /// Amount does not clear the current baseline plus increment.
    #[error(
        "Bid must be at least KES {minimum} (current highest: KES {baseline} + minimum increment: KES {increment})"
    )]
    BidTooLow {
        /// The smallest acceptable amount right now.
        minimum: Price,
        /// Current highest bid, or the starting price before any bid.
        baseline: Price,
        increment: Price,
    },

    /// Amount is below the reserve price. Only raised when the engine is
    /// configured to disclose the reserve at bid time.
    #[error("Bid must meet or exceed the reserve price of KES {reserve}")]
    BelowReserve { reserve: Price },

    /// Could not serialize against concurrent bids on the same auction
    /// within the bounded wait. Transient: no partial effect was
    /// committed and the same bid is safe to retry unchanged.
    #[error("Auction is receiving concurrent bids, please retry")]
    Contention,
}

impl RejectionReason {
    /// Stable label for metrics and structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NotActive { .. } => "not_active",
            Self::OutsideWindow { .. } => "outside_window",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::BidTooLow { .. } => "bid_too_low",
            Self::BelowReserve { .. } => "below_reserve",
            Self::Contention => "contention",
        }
    }

    /// Transient rejections are safe for the caller to retry unchanged.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Contention)
    }
}
