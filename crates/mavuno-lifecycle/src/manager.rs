//! Lifecycle transitions and the sweep.
//!
//! Every transition is a check-and-set under the auction record's write
//! lock, so a status can only move into `closed` once. The settlement
//! decision is computed inside that same critical section, which is the
//! exactly-once guard against double-fire from concurrent lazy-close
//! observations; emission happens after the guard is dropped.

use crate::error::{LifecycleError, LifecycleResult};
use crate::notifier::SettlementNotifier;
use chrono::{DateTime, Utc};
use mavuno_core::{
    Auction, AuctionId, AuctionStatus, FarmerId, ListingTerms, ProductId, SettlementOutcome,
    SettlementRecord, SharedClock,
};
use mavuno_store::{AuctionRecord, AuctionStore};
use mavuno_telemetry::metrics;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    /// Drafts opened for bidding.
    pub activated: usize,
    /// Expired actives closed and settled.
    pub closed: usize,
}

impl SweepReport {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.activated == 0 && self.closed == 0
    }
}

/// Drives auction status transitions and settlement emission.
pub struct LifecycleManager {
    store: Arc<AuctionStore>,
    clock: SharedClock,
    notifier: SettlementNotifier,
}

impl LifecycleManager {
    pub fn new(store: Arc<AuctionStore>, clock: SharedClock) -> Self {
        Self::with_notifier(store, clock, SettlementNotifier::default())
    }

    pub fn with_notifier(
        store: Arc<AuctionStore>,
        clock: SharedClock,
        notifier: SettlementNotifier,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Subscribe to settlement records.
    pub fn subscribe(&self) -> broadcast::Receiver<SettlementRecord> {
        self.notifier.subscribe()
    }

    /// Create an auction from validated terms.
    ///
    /// The listing goes live immediately when its window has already
    /// started; otherwise it is stored as a draft and opened by the
    /// sweep.
    pub fn create_auction(
        &self,
        farmer: FarmerId,
        product: ProductId,
        terms: ListingTerms,
        category: Option<String>,
    ) -> LifecycleResult<Auction> {
        terms.validate()?;

        let now = self.clock.now();
        let auction = Auction::from_terms(farmer, product, terms, category, now);
        self.store.insert(auction.clone())?;

        if auction.status.is_active() {
            metrics::AUCTIONS_ACTIVE.inc();
        }
        info!(
            auction_id = %auction.id,
            farmer = %farmer,
            status = %auction.status,
            quantity = %auction.quantity,
            starting_price = %auction.starting_price,
            "Auction created"
        );

        Ok(auction)
    }

    /// Explicit farmer-initiated close. Allowed any time while active,
    /// regardless of whether the deadline has passed.
    pub fn close(&self, id: AuctionId, requester: FarmerId) -> LifecycleResult<Auction> {
        let handle = self.store.handle(id).ok_or(LifecycleError::NotFound(id))?;
        let mut record = handle.write();

        self.authorize(&record.auction, requester)?;

        if !record
            .auction
            .status
            .can_transition_to(AuctionStatus::Closed)
        {
            return Err(LifecycleError::InvalidTransition {
                from: record.auction.status,
                to: AuctionStatus::Closed,
            });
        }

        let now = self.clock.now();
        let settlement = close_locked(&mut record, now);
        let auction = record.auction.clone();
        drop(record);

        info!(auction_id = %id, requester = %requester, "Auction closed by owner");
        self.notifier.emit(settlement);

        Ok(auction)
    }

    /// Farmer-initiated cancellation, from draft or active. Recorded
    /// bids stay in history; none is winning-eligible and no settlement
    /// record is emitted.
    pub fn cancel(&self, id: AuctionId, requester: FarmerId) -> LifecycleResult<Auction> {
        let handle = self.store.handle(id).ok_or(LifecycleError::NotFound(id))?;
        let mut record = handle.write();

        self.authorize(&record.auction, requester)?;

        let from = record.auction.status;
        if !from.can_transition_to(AuctionStatus::Cancelled) {
            return Err(LifecycleError::InvalidTransition {
                from,
                to: AuctionStatus::Cancelled,
            });
        }

        let now = self.clock.now();
        record.auction.status = AuctionStatus::Cancelled;
        record.touch(now);
        let auction = record.auction.clone();
        drop(record);

        metrics::LIFECYCLE_TRANSITIONS_TOTAL
            .with_label_values(&["cancelled"])
            .inc();
        if from.is_active() {
            metrics::AUCTIONS_ACTIVE.dec();
        }
        info!(auction_id = %id, requester = %requester, "Auction cancelled by owner");

        Ok(auction)
    }

    /// Time-driven lifecycle check over every stored auction.
    ///
    /// Opens due drafts and closes expired actives. Idempotent: a second
    /// pass at the same instant is a no-op, and an auction can only ever
    /// settle once.
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        for id in self.store.ids() {
            let Some(handle) = self.store.handle(id) else {
                continue;
            };

            let mut record = handle.write();
            let settlement = sweep_record(&mut record, now, &mut report);
            drop(record);

            if let Some(settlement) = settlement {
                self.notifier.emit(settlement);
            }
        }

        if !report.is_quiet() {
            debug!(
                activated = report.activated,
                closed = report.closed,
                "Lifecycle sweep applied transitions"
            );
        }

        report
    }

    fn authorize(&self, auction: &Auction, requester: FarmerId) -> LifecycleResult<()> {
        if auction.farmer != requester {
            warn!(
                auction_id = %auction.id,
                owner = %auction.farmer,
                requester = %requester,
                "Rejected lifecycle action by non-owner"
            );
            return Err(LifecycleError::NotOwner {
                auction: auction.id,
                requester,
            });
        }
        Ok(())
    }
}

/// Apply time-driven transitions to one record. Returns the settlement
/// record when the auction closed in this pass.
fn sweep_record(
    record: &mut AuctionRecord,
    now: DateTime<Utc>,
    report: &mut SweepReport,
) -> Option<SettlementRecord> {
    if record.auction.status == AuctionStatus::Draft && record.auction.has_started(now) {
        record.auction.status = AuctionStatus::Active;
        record.touch(now);
        metrics::LIFECYCLE_TRANSITIONS_TOTAL
            .with_label_values(&["active"])
            .inc();
        metrics::AUCTIONS_ACTIVE.inc();
        report.activated += 1;
        debug!(auction_id = %record.auction.id, "Auction opened");
    }

    if record.auction.status == AuctionStatus::Active && record.auction.has_expired(now) {
        let settlement = close_locked(record, now);
        report.closed += 1;
        debug!(auction_id = %record.auction.id, "Auction closed at deadline");
        return Some(settlement);
    }

    None
}

/// Transition an active auction into closed and decide settlement.
///
/// Caller holds the record's write lock and has already verified the
/// transition is legal; the status flip here is what makes settlement
/// fire at most once.
fn close_locked(record: &mut AuctionRecord, now: DateTime<Utc>) -> SettlementRecord {
    record.auction.status = AuctionStatus::Closed;
    record.touch(now);

    metrics::LIFECYCLE_TRANSITIONS_TOTAL
        .with_label_values(&["closed"])
        .inc();
    metrics::AUCTIONS_ACTIVE.dec();

    SettlementRecord {
        auction: record.auction.id,
        outcome: settlement_outcome(record),
        settled_at: now,
    }
}

/// Winner if a winning bid exists and meets the reserve; otherwise no
/// winner, even when bids exist.
fn settlement_outcome(record: &AuctionRecord) -> SettlementOutcome {
    match record.winning_bid() {
        Some(bid)
            if record
                .auction
                .reserve_price
                .map_or(true, |reserve| bid.amount >= reserve) =>
        {
            SettlementOutcome::Winner {
                bidder: bid.bidder,
                bid: bid.id,
                amount: bid.amount,
                quantity: bid.quantity,
            }
        }
        _ => SettlementOutcome::NoWinner,
    }
}
