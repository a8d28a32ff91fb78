//! Bid arbitration engine.
//!
//! Decides accept/reject for incoming bids and applies the accept
//! effect atomically with respect to other bids on the same auction.
//! The serialization point is the auction record's write lock, held for
//! the whole read-then-conditionally-write sequence; acquisition is
//! bounded, so a submission either commits or fails quickly with a
//! retryable `Contention` rejection.

pub mod arbitration;
pub mod config;

pub use arbitration::{BidEngine, BidRequest};
pub use config::{EngineConfig, ReservePolicy};
