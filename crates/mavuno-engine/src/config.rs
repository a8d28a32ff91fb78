//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When the reserve price is enforced.
///
/// The reserve is a hidden minimum, so by default a bid below it is
/// still accepted and the shortfall only surfaces at settlement as
/// `NoWinner`. `RejectAtBid` instead discloses the reserve and rejects
/// such bids immediately, matching marketplaces that publish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservePolicy {
    /// Accept bids below the reserve; enforce it only at settlement.
    #[default]
    SettleOnly,
    /// Reject bids below the reserve with `BelowReserve`.
    RejectAtBid,
}

/// Bid arbitration configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum time to wait for the per-auction write lock before
    /// failing the submission with `Contention`. Default: 500ms.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// Reserve price enforcement mode.
    #[serde(default)]
    pub reserve_policy: ReservePolicy,
}

fn default_lock_timeout_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
            reserve_policy: ReservePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Lock acquisition bound as a `Duration`.
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}
