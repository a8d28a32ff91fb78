//! Error types for mavuno-journal.

use thiserror::Error;

/// Journal error types.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for journal operations.
pub type JournalResult<T> = std::result::Result<T, JournalError>;
