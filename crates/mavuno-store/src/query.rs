//! Read-side queries: filters, pagination, and the auction detail view.
//!
//! Listing is read-only and has no concurrency concerns beyond taking
//! each record's read lock for the snapshot.

use mavuno_core::{Auction, AuctionStatus, Bid};
use serde::{Deserialize, Serialize};

/// Filter for listing auctions.
///
/// With no explicit status the listing defaults to active auctions,
/// which is what marketplace browsers want.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionFilter {
    #[serde(default)]
    pub status: Option<AuctionStatus>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl AuctionFilter {
    /// Filter by a single status.
    #[must_use]
    pub fn with_status(status: AuctionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Effective status filter: defaults to active when none of the
    /// filter fields pin a status.
    #[must_use]
    pub fn effective_status(&self) -> Option<AuctionStatus> {
        self.status.or(Some(AuctionStatus::Active))
    }

    /// Whether an auction passes this filter.
    #[must_use]
    pub fn matches(&self, auction: &Auction) -> bool {
        if let Some(status) = self.effective_status() {
            if auction.status != status {
                return false;
            }
        }
        if let Some(county) = &self.county {
            if !auction.location.county.eq_ignore_ascii_case(county) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            match &auction.category {
                Some(c) if c.eq_ignore_ascii_case(category) => {}
                _ => return false,
            }
        }
        true
    }
}

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    /// Slice an already-sorted result set into the requested page.
    #[must_use]
    pub fn slice(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let limit = request.limit.max(1);
        let page = request.page.max(1);
        let pages = total.div_ceil(limit);

        let items = all
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Self {
            items,
            page,
            limit,
            total,
            pages,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An auction together with its bids for detail display.
///
/// Bids are ordered highest amount first; internal history order stays
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionView {
    pub auction: Auction,
    pub bids: Vec<Bid>,
}

impl AuctionView {
    /// The winning bid, when one exists.
    #[must_use]
    pub fn winning_bid(&self) -> Option<&Bid> {
        let id = self.auction.winning_bid?;
        self.bids.iter().find(|b| b.id == id)
    }
}
