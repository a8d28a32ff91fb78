//! Bid acceptance algorithm.
//!
//! Preconditions are checked in a fixed order (first failure wins) and
//! the accept effect is applied as one unit under the auction record's
//! write lock. A concurrent reader never sees a new highest-bid value
//! without the corresponding bid recorded as winning, nor a demoted but
//! not-yet-replaced winner.

use crate::config::{EngineConfig, ReservePolicy};
use chrono::{DateTime, Utc};
use mavuno_core::{
    Auction, AuctionId, Bid, BuyerId, Price, Quantity, RejectionReason, SharedClock,
};
use mavuno_store::AuctionStore;
use mavuno_telemetry::metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// An incoming bid submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidRequest {
    pub auction: AuctionId,
    pub bidder: BuyerId,
    pub amount: Price,
    pub quantity: Quantity,
}

/// The bid arbitration engine.
///
/// Safe to share across request handlers; contention is scoped to the
/// target auction, so bids on different auctions never block each other.
pub struct BidEngine {
    store: Arc<AuctionStore>,
    clock: SharedClock,
    config: EngineConfig,
}

impl BidEngine {
    pub fn new(store: Arc<AuctionStore>, clock: SharedClock, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Arbitrate a bid: accept and commit it, or reject with a typed
    /// reason. Rejected bids are never persisted.
    pub fn submit_bid(&self, request: BidRequest) -> Result<Bid, RejectionReason> {
        let started = Instant::now();
        let result = self.arbitrate(&request);
        metrics::ARBITRATION_DURATION_MS.observe(started.elapsed().as_secs_f64() * 1000.0);

        match &result {
            Ok(bid) => {
                metrics::BIDS_ACCEPTED_TOTAL.inc();
                debug!(
                    auction_id = %request.auction,
                    bid_id = %bid.id,
                    bidder = %request.bidder,
                    amount = %request.amount,
                    quantity = %request.quantity,
                    "Bid accepted"
                );
            }
            Err(reason) => {
                metrics::BIDS_REJECTED_TOTAL
                    .with_label_values(&[reason.label()])
                    .inc();
                if reason.is_transient() {
                    warn!(
                        auction_id = %request.auction,
                        bidder = %request.bidder,
                        "Bid failed to serialize within the lock timeout"
                    );
                } else {
                    debug!(
                        auction_id = %request.auction,
                        bidder = %request.bidder,
                        amount = %request.amount,
                        reason = %reason,
                        "Bid rejected"
                    );
                }
            }
        }

        result
    }

    fn arbitrate(&self, request: &BidRequest) -> Result<Bid, RejectionReason> {
        let handle = self
            .store
            .handle(request.auction)
            .ok_or(RejectionReason::NotFound)?;

        // Bounded wait for the per-auction serialization point. On
        // expiry nothing has been committed and the caller may retry
        // the identical request.
        let mut record = handle
            .try_write_for(self.config.lock_timeout())
            .ok_or(RejectionReason::Contention)?;

        let now = self.clock.now();
        evaluate(&record.auction, request, now, self.config.reserve_policy)?;

        // Accept effect. Everything below is one atomic unit: the guard
        // is held until all of it is applied.
        let submitted_at = record.next_submission_at(now);
        let bid = Bid::accepted(
            request.bidder,
            request.auction,
            request.amount,
            request.quantity,
            submitted_at,
        );

        if let Some(previous) = record.auction.winning_bid {
            if let Some(prev_bid) = record.bids.iter_mut().find(|b| b.id == previous) {
                prev_bid.is_winning = false;
            }
        }

        record.auction.current_highest_bid = Some(request.amount);
        record.auction.winning_bid = Some(bid.id);
        record.auction.winning_bidder = Some(request.bidder);
        record.last_bid_at = Some(submitted_at);
        record.bids.push(bid.clone());
        record.touch(now);

        Ok(bid)
    }
}

/// Precondition checks, in order; first failure wins.
///
/// Pure over the auction snapshot so the ordering is unit-testable
/// without a store.
fn evaluate(
    auction: &Auction,
    request: &BidRequest,
    now: DateTime<Utc>,
    reserve_policy: ReservePolicy,
) -> Result<(), RejectionReason> {
    if !auction.status.is_active() {
        return Err(RejectionReason::NotActive {
            status: auction.status,
        });
    }

    // The deadline check also cancels in-flight submissions that were
    // queued before the deadline: once `now > end`, no bid may ever be
    // recorded, even while the status field still says active.
    if !auction.is_open_at(now) {
        return Err(RejectionReason::OutsideWindow {
            opens_at: auction.start,
            closes_at: auction.end,
        });
    }

    if !request.quantity.is_positive() || request.quantity > auction.quantity {
        return Err(RejectionReason::InvalidQuantity {
            requested: request.quantity,
            available: auction.quantity,
        });
    }

    let baseline = auction.baseline();
    let minimum = auction.minimum_acceptable_bid();
    if request.amount < minimum {
        return Err(RejectionReason::BidTooLow {
            minimum,
            baseline,
            increment: auction.minimum_increment,
        });
    }

    if reserve_policy == ReservePolicy::RejectAtBid {
        if let Some(reserve) = auction.reserve_price {
            if request.amount < reserve {
                return Err(RejectionReason::BelowReserve { reserve });
            }
        }
    }

    Ok(())
}
