//! Settlement records.
//!
//! Emitted exactly once per auction on the transition into `closed`.
//! This record is the sole interface to the external order/payment
//! pipeline; the engine itself never moves money or inventory.

use crate::decimal::{Price, Quantity};
use crate::ids::{AuctionId, BidId, BuyerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an auction close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// A winning bid exists and its amount satisfies the reserve price.
    Winner {
        bidder: BuyerId,
        bid: BidId,
        amount: Price,
        quantity: Quantity,
    },
    /// No bids were accepted, or the highest accepted bid did not meet
    /// the reserve price.
    NoWinner,
}

/// The one-shot settlement decision for a closed auction.
///
/// Delivery to the order pipeline is at-least-once; consumers
/// deduplicate by auction id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub auction: AuctionId,
    #[serde(flatten)]
    pub outcome: SettlementOutcome,
    pub settled_at: DateTime<Utc>,
}

impl SettlementRecord {
    #[must_use]
    pub fn has_winner(&self) -> bool {
        matches!(self.outcome, SettlementOutcome::Winner { .. })
    }

    /// Stable label for metrics.
    #[must_use]
    pub fn outcome_label(&self) -> &'static str {
        match self.outcome {
            SettlementOutcome::Winner { .. } => "winner",
            SettlementOutcome::NoWinner => "no_winner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_outcome_labels() {
        let settled_at = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();

        let winner = SettlementRecord {
            auction: AuctionId::new(),
            outcome: SettlementOutcome::Winner {
                bidder: BuyerId::new(),
                bid: BidId::new(),
                amount: Price::new(dec!(1550)),
                quantity: Quantity::new(dec!(10)),
            },
            settled_at,
        };
        assert!(winner.has_winner());
        assert_eq!(winner.outcome_label(), "winner");

        let empty = SettlementRecord {
            auction: AuctionId::new(),
            outcome: SettlementOutcome::NoWinner,
            settled_at,
        };
        assert!(!empty.has_winner());
        assert_eq!(empty.outcome_label(), "no_winner");
    }
}
