//! Core domain types for the Mavuno bulk-auction engine.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `AuctionId`, `BidId`, `FarmerId`, `BuyerId`, `ProductId`: entity identifiers
//! - `Price`, `Quantity`: precision-safe numeric types (KES amounts, produce units)
//! - `Auction`, `AuctionStatus`, `ListingTerms`: the auction record and its state machine
//! - `Bid`: an accepted bid
//! - `RejectionReason`: closed taxonomy of bid rejections
//! - `SettlementRecord`: the one-shot close outcome handed to the order pipeline
//! - `Clock`: injectable time source

pub mod auction;
pub mod bid;
pub mod clock;
pub mod decimal;
pub mod error;
pub mod ids;
pub mod rejection;
pub mod settlement;

pub use auction::{Auction, AuctionStatus, ListingTerms, Location};
pub use bid::Bid;
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use decimal::{Price, Quantity};
pub use error::{CoreError, Result, ValidationError};
pub use ids::{AuctionId, BidId, BuyerId, FarmerId, ProductId};
pub use rejection::RejectionReason;
pub use settlement::{SettlementOutcome, SettlementRecord};
