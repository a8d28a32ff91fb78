//! Application run loop.
//!
//! Runs the periodic lifecycle sweep and the settlement journal drain
//! until a shutdown signal arrives. Sweep precision is deliberately
//! coarse; the arbitration deadline check keeps late bids out between
//! passes.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::service::AuctionService;
use mavuno_journal::{run_journal, SettlementJournal};
use std::sync::Arc;
use tracing::{debug, info};

/// Run the service until ctrl-c.
pub async fn run(service: Arc<AuctionService>, config: &AppConfig) -> AppResult<()> {
    let journal_task = if config.journal.enabled {
        let journal = SettlementJournal::new(&config.journal.dir, config.journal.max_buffer_size);
        let rx = service.subscribe_settlements();
        info!(dir = %config.journal.dir, "Settlement journal enabled");
        Some(tokio::spawn(run_journal(journal, rx)))
    } else {
        None
    };

    let mut interval = tokio::time::interval(config.sweep.interval());
    info!(
        interval_ms = config.sweep.interval_ms,
        "Lifecycle sweep running"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = service.sweep();
                if !report.is_quiet() {
                    debug!(
                        activated = report.activated,
                        closed = report.closed,
                        "Sweep transitioned auctions"
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if let Some(task) = journal_task {
        // Dropping the task flushes the journal via its Drop impl.
        task.abort();
        let _ = task.await;
    }

    Ok(())
}
