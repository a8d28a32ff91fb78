//! Auction record storage.
//!
//! Each auction lives in its own `Arc<RwLock<AuctionRecord>>` inside a
//! `DashMap` keyed by auction id. Holding the record's write lock for
//! the duration of a read-then-conditionally-write sequence is what
//! makes arbitration atomic per auction; the map itself only shards
//! lookups and never serializes across auctions.

use crate::error::{StoreError, StoreResult};
use crate::query::{AuctionFilter, AuctionView, Page, PageRequest};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use mavuno_core::{Auction, AuctionId, AuctionStatus, Bid, BuyerId, FarmerId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// A stored auction together with its bid history.
#[derive(Debug, Clone)]
pub struct AuctionRecord {
    pub auction: Auction,
    /// Insertion order equals arrival order at the serialization point,
    /// not sorted by amount.
    pub bids: Vec<Bid>,
    /// Bumped on every committed mutation.
    pub version: u64,
    /// Submission instant of the most recent accepted bid.
    pub last_bid_at: Option<DateTime<Utc>>,
}

impl AuctionRecord {
    fn new(auction: Auction) -> Self {
        Self {
            auction,
            bids: Vec::new(),
            version: 0,
            last_bid_at: None,
        }
    }

    /// The currently winning bid, if any.
    #[must_use]
    pub fn winning_bid(&self) -> Option<&Bid> {
        let id = self.auction.winning_bid?;
        self.bids.iter().find(|b| b.id == id)
    }

    /// Server-assigned submission timestamp for the next accepted bid.
    ///
    /// Strictly monotonic per auction: a wall-clock reading at or before
    /// the previous bid's timestamp is nudged one millisecond past it.
    #[must_use]
    pub fn next_submission_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_bid_at {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        }
    }

    /// Record a committed mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.auction.updated_at = now;
    }
}

/// Shared handle to a single auction record.
pub type RecordHandle = Arc<RwLock<AuctionRecord>>;

/// In-memory auction store.
///
/// Auctions are never deleted, only terminalized, so handles stay valid
/// for the lifetime of the store.
pub struct AuctionStore {
    records: DashMap<AuctionId, RecordHandle>,
}

impl AuctionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Insert a newly created auction.
    pub fn insert(&self, auction: Auction) -> StoreResult<()> {
        let id = auction.id;
        match self.records.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::DuplicateAuction(id)),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                debug!(auction_id = %id, status = %auction.status, "Auction stored");
                slot.insert(Arc::new(RwLock::new(AuctionRecord::new(auction))));
                Ok(())
            }
        }
    }

    /// Get the lock handle for an auction. This is the entry point for
    /// every mutating path (arbitration, lifecycle transitions).
    #[must_use]
    pub fn handle(&self, id: AuctionId) -> Option<RecordHandle> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    /// Snapshot of an auction.
    #[must_use]
    pub fn get(&self, id: AuctionId) -> Option<Auction> {
        self.records.get(&id).map(|entry| entry.read().auction.clone())
    }

    /// Snapshot of an auction together with its bids, highest first.
    #[must_use]
    pub fn view(&self, id: AuctionId) -> Option<AuctionView> {
        self.records.get(&id).map(|entry| {
            let guard = entry.read();
            let mut bids = guard.bids.clone();
            // Accepted amounts are strictly increasing in history order,
            // so newest-first is also highest-first.
            bids.reverse();
            AuctionView {
                auction: guard.auction.clone(),
                bids,
            }
        })
    }

    /// List auctions matching a filter, newest listing first.
    #[must_use]
    pub fn list(&self, filter: &AuctionFilter, page: PageRequest) -> Page<Auction> {
        let mut matched: Vec<Auction> = self
            .records
            .iter()
            .filter_map(|entry| {
                let guard = entry.read();
                filter.matches(&guard.auction).then(|| guard.auction.clone())
            })
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Page::slice(matched, page)
    }

    /// All auctions owned by a farmer, optionally filtered by status,
    /// newest first.
    #[must_use]
    pub fn by_farmer(&self, farmer: FarmerId, status: Option<AuctionStatus>) -> Vec<Auction> {
        let mut matched: Vec<Auction> = self
            .records
            .iter()
            .filter_map(|entry| {
                let guard = entry.read();
                let auction = &guard.auction;
                (auction.farmer == farmer && status.map_or(true, |s| auction.status == s))
                    .then(|| auction.clone())
            })
            .collect();

        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }

    /// All accepted bids placed by a buyer across auctions, most recent
    /// submission first.
    #[must_use]
    pub fn bids_by_buyer(&self, buyer: BuyerId) -> Vec<Bid> {
        let mut bids: Vec<Bid> = self
            .records
            .iter()
            .flat_map(|entry| {
                entry
                    .read()
                    .bids
                    .iter()
                    .filter(|b| b.bidder == buyer)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        bids.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        bids
    }

    /// Ids of every stored auction. Used by the lifecycle sweep.
    #[must_use]
    pub fn ids(&self) -> Vec<AuctionId> {
        self.records.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of stored auctions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for AuctionStore {
    fn default() -> Self {
        Self::new()
    }
}
