//! The auction record and its status state machine.
//!
//! An auction is a timed, fixed-quantity sale. Its status moves through
//! `draft -> active -> {closed, cancelled}` (a draft can also be
//! withdrawn straight to cancelled); closed and cancelled are terminal.
//! The time-window checks live here so that bidding, listing, and the
//! lifecycle sweep all observe the same transition logic.

use crate::decimal::{Price, Quantity};
use crate::error::ValidationError;
use crate::ids::{AuctionId, BidId, BuyerId, FarmerId, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Auction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    /// Created but not yet open for bidding.
    #[default]
    Draft,
    /// Open for bidding within the auction window.
    Active,
    /// Finished; settlement has been decided. Terminal.
    Closed,
    /// Withdrawn by the farmer. Terminal, never settles.
    Cancelled,
}

impl AuctionStatus {
    /// Returns true if no transition leaves this status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Returns true if the auction can accept bids (subject to the window).
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether `self -> next` is a legal transition.
    ///
    /// The status order is monotonic: draft -> active -> {closed, cancelled},
    /// plus draft -> cancelled for withdrawing an unopened listing.
    #[must_use]
    pub fn can_transition_to(&self, next: AuctionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Active)
                | (Self::Draft, Self::Cancelled)
                | (Self::Active, Self::Closed)
                | (Self::Active, Self::Cancelled)
        )
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
            Self::Closed => write!(f, "closed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Geographic location of the produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub county: String,
    pub sub_county: String,
}

impl Location {
    pub fn new(county: impl Into<String>, sub_county: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            sub_county: sub_county.into(),
        }
    }
}

/// Default minimum bid increment: KES 50.
pub fn default_minimum_increment() -> Price {
    Price::new(dec!(50))
}

fn default_unit() -> String {
    "kg".to_string()
}

/// Terms a farmer supplies when listing an auction.
///
/// Validated before any state is created; the window and quantity are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingTerms {
    pub title: String,
    pub description: String,
    /// Starting price per unit (>= 0).
    pub starting_price: Price,
    /// Hidden minimum the farmer will accept. Must be >= starting price when set.
    #[serde(default)]
    pub reserve_price: Option<Price>,
    /// Total quantity on offer (>= 1). Fixed at creation, never increased.
    pub quantity: Quantity,
    /// Unit of sale. Defaults to "kg"; the product's own unit wins when omitted.
    #[serde(default = "default_unit")]
    pub unit: String,
    /// Smallest amount a new bid must exceed the current highest by (>= 1).
    #[serde(default = "default_minimum_increment")]
    pub minimum_increment: Price,
    pub location: Location,
    /// Window open instant.
    pub start: DateTime<Utc>,
    /// Window close instant. Must be strictly after `start`.
    pub end: DateTime<Utc>,
}

impl ListingTerms {
    /// Validate the terms. First failure wins; nothing is mutated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if self.location.county.trim().is_empty() {
            return Err(ValidationError::MissingField("location.county"));
        }
        if self.location.sub_county.trim().is_empty() {
            return Err(ValidationError::MissingField("location.sub_county"));
        }
        if self.starting_price.is_negative() {
            return Err(ValidationError::NegativeStartingPrice);
        }
        if self.quantity < Quantity::ONE {
            return Err(ValidationError::QuantityTooSmall);
        }
        if self.minimum_increment < Price::ONE {
            return Err(ValidationError::IncrementTooSmall);
        }
        if self.end <= self.start {
            return Err(ValidationError::WindowInverted);
        }
        if let Some(reserve) = self.reserve_price {
            if reserve < self.starting_price {
                return Err(ValidationError::ReserveBelowStarting);
            }
        }
        Ok(())
    }
}

/// A timed, fixed-quantity auction listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auction {
    pub id: AuctionId,
    /// Owner. Immutable after creation.
    pub farmer: FarmerId,
    /// Product in the external catalog this auction sells from.
    pub product: ProductId,
    pub title: String,
    pub description: String,
    pub starting_price: Price,
    pub reserve_price: Option<Price>,
    pub quantity: Quantity,
    pub unit: String,
    /// Product category, stamped from the inventory lookup at creation.
    pub category: Option<String>,
    pub location: Location,
    pub minimum_increment: Price,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AuctionStatus,
    /// Highest accepted bid amount. None until the first bid is accepted.
    pub current_highest_bid: Option<Price>,
    pub winning_bid: Option<BidId>,
    pub winning_bidder: Option<BuyerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auction {
    /// Build an auction from validated terms.
    ///
    /// The listing goes live immediately when the window has already
    /// started; otherwise it is created as a draft and opened by the
    /// lifecycle sweep.
    #[must_use]
    pub fn from_terms(
        farmer: FarmerId,
        product: ProductId,
        terms: ListingTerms,
        category: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let status = if terms.start <= now {
            AuctionStatus::Active
        } else {
            AuctionStatus::Draft
        };

        Self {
            id: AuctionId::new(),
            farmer,
            product,
            title: terms.title.trim().to_string(),
            description: terms.description.trim().to_string(),
            starting_price: terms.starting_price,
            reserve_price: terms.reserve_price,
            quantity: terms.quantity,
            unit: terms.unit,
            category,
            location: terms.location,
            minimum_increment: terms.minimum_increment,
            start: terms.start,
            end: terms.end,
            status,
            current_highest_bid: None,
            winning_bid: None,
            winning_bidder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Baseline for increment comparisons: the current highest bid,
    /// or the starting price before any bid has been accepted.
    #[must_use]
    pub fn baseline(&self) -> Price {
        self.current_highest_bid.unwrap_or(self.starting_price)
    }

    /// Smallest amount the next bid must reach: `baseline + increment`.
    #[must_use]
    pub fn minimum_acceptable_bid(&self) -> Price {
        self.baseline() + self.minimum_increment
    }

    /// Whether the bidding window contains `now` (inclusive bounds).
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }

    /// Whether the window open instant has passed.
    #[must_use]
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.start
    }

    /// Whether the deadline has passed. No bid may be arbitrated once
    /// this returns true, even if the status has not been flipped yet.
    #[must_use]
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }
}
