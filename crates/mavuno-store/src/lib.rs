//! In-memory auction store.
//!
//! Single source of truth for auction state and bid history. Every
//! record sits behind its own lock, which is the per-auction
//! serialization point: arbitration and lifecycle transitions take the
//! write side, readers take the read side and can never observe a
//! half-applied mutation. Records for different auctions never contend.

pub mod error;
pub mod query;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use query::{AuctionFilter, AuctionView, Page, PageRequest};
pub use store::{AuctionRecord, AuctionStore, RecordHandle};
