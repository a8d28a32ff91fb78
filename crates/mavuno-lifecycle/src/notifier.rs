//! Settlement fan-out.
//!
//! Settlement records are broadcast to whoever is subscribed (the order
//! pipeline, the audit journal). Send errors mean no receiver is
//! connected, which is normal at startup; delivery is at-least-once and
//! consumers deduplicate by auction id.

use mavuno_core::SettlementRecord;
use mavuno_telemetry::metrics;
use tokio::sync::broadcast;
use tracing::trace;

/// Default broadcast channel capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Broadcasts settlement records to subscribers.
#[derive(Debug, Clone)]
pub struct SettlementNotifier {
    tx: broadcast::Sender<SettlementRecord>,
}

impl SettlementNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to settlement records emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SettlementRecord> {
        self.tx.subscribe()
    }

    /// Emit one settlement record. Called exactly once per auction by
    /// the lifecycle manager.
    pub fn emit(&self, record: SettlementRecord) {
        metrics::SETTLEMENTS_TOTAL
            .with_label_values(&[record.outcome_label()])
            .inc();

        match self.tx.send(record) {
            Ok(receivers) => {
                trace!(
                    auction_id = %record.auction,
                    outcome = record.outcome_label(),
                    receivers,
                    "Settlement emitted"
                );
            }
            Err(_) => {
                // No receivers connected - normal when the pipeline
                // has not subscribed yet.
                trace!(auction_id = %record.auction, "No settlement receivers connected");
            }
        }
    }
}

impl Default for SettlementNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
