//! Settlement audit journal.
//!
//! Appends every emitted settlement record to daily JSON Lines files.
//! JSONL is used for robustness:
//! - Each line is a complete JSON object
//! - Partial file corruption only affects individual lines
//! - Can be read even if a write was interrupted
//!
//! The journal is an observer of the settlement broadcast; losing it
//! never blocks or fails an auction close.

pub mod error;
pub mod writer;

pub use error::{JournalError, JournalResult};
pub use writer::{run_journal, SettlementJournal};
