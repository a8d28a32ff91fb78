//! Accepted bids.
//!
//! A `Bid` only ever exists as the result of successful arbitration;
//! rejected submissions are reported as errors and never persisted.

use crate::decimal::{Price, Quantity};
use crate::ids::{AuctionId, BidId, BuyerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An accepted bid on an auction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub bidder: BuyerId,
    pub auction: AuctionId,
    /// Bid amount per unit (always strictly above the previous baseline
    /// plus the minimum increment at acceptance time).
    pub amount: Price,
    /// Quantity the bidder wants (1 <= q <= auction quantity).
    pub quantity: Quantity,
    /// Server-assigned submission instant, strictly monotonic per auction.
    pub submitted_at: DateTime<Utc>,
    /// At most one bid per auction carries this flag, and it is always
    /// the most recently accepted bid.
    pub is_winning: bool,
}

impl Bid {
    /// Create a freshly accepted bid. New bids always enter as winning;
    /// the arbitration effect demotes the previous winner in the same
    /// critical section.
    #[must_use]
    pub fn accepted(
        bidder: BuyerId,
        auction: AuctionId,
        amount: Price,
        quantity: Quantity,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BidId::new(),
            bidder,
            auction,
            amount,
            quantity,
            submitted_at,
            is_winning: true,
        }
    }
}
