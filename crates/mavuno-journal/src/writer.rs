//! JSON Lines writer for settlement records.

use crate::error::JournalResult;
use mavuno_core::SettlementRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Active writer state for the current daily file.
struct ActiveWriter {
    writer: BufWriter<File>,
    date: String,
    records_written: usize,
}

/// Buffered, date-rotated JSON Lines journal.
///
/// Uses append mode - safe for interrupted writes. Each line is
/// independent, so partial corruption only affects that line.
pub struct SettlementJournal {
    /// Base directory for output files.
    base_dir: String,
    /// Buffer of pending records.
    buffer: Vec<SettlementRecord>,
    /// Maximum buffer size before flush.
    max_buffer_size: usize,
    /// Active writer (open until date rotation).
    active_writer: Option<ActiveWriter>,
}

impl SettlementJournal {
    /// Create a new journal writing under `base_dir`.
    pub fn new(base_dir: &str, max_buffer_size: usize) -> Self {
        // Create directory if it doesn't exist
        if let Err(e) = std::fs::create_dir_all(base_dir) {
            warn!(?e, "Failed to create journal directory: {}", base_dir);
        }

        Self {
            base_dir: base_dir.to_string(),
            buffer: Vec::with_capacity(max_buffer_size.max(1)),
            max_buffer_size: max_buffer_size.max(1),
            active_writer: None,
        }
    }

    /// Buffer one settlement record, flushing when the buffer is full.
    pub fn record(&mut self, record: SettlementRecord) -> JournalResult<()> {
        self.buffer.push(record);

        if self.buffer.len() >= self.max_buffer_size {
            self.flush()?;
        }

        Ok(())
    }

    fn close_active_writer(&mut self) -> JournalResult<()> {
        if let Some(mut active) = self.active_writer.take() {
            if let Err(e) = active.writer.flush() {
                warn!(?e, "Failed to flush journal writer on close");
            }
            info!(
                date = %active.date,
                records = active.records_written,
                "Closed settlement journal file"
            );
        }
        Ok(())
    }

    fn create_new_writer(&mut self, date: &str) -> JournalResult<()> {
        let filename = format!("{}/settlements_{}.jsonl", self.base_dir, date);

        info!(filename = %filename, "Opening settlement journal (append mode)");

        // Open in append mode - won't truncate existing data
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&filename)?;

        self.active_writer = Some(ActiveWriter {
            writer: BufWriter::new(file),
            date: date.to_string(),
            records_written: 0,
        });

        Ok(())
    }

    /// Flush buffered records to the daily file, rotating on date change.
    ///
    /// The file date comes from each flush's first record so that
    /// rotation follows settlement time, not the process clock.
    pub fn flush(&mut self) -> JournalResult<()> {
        let Some(first) = self.buffer.first() else {
            return Ok(());
        };

        let date = first.settled_at.format("%Y-%m-%d").to_string();

        let needs_rotation = self
            .active_writer
            .as_ref()
            .map(|w| w.date != date)
            .unwrap_or(false);

        if needs_rotation {
            self.close_active_writer()?;
        }

        if self.active_writer.is_none() {
            self.create_new_writer(&date)?;
        }

        let record_count = self.buffer.len();

        {
            let active = self
                .active_writer
                .as_mut()
                .expect("active_writer should exist");

            for record in &self.buffer {
                let json = serde_json::to_string(record)?;
                writeln!(active.writer, "{}", json)?;
            }

            active.writer.flush()?;
            active.records_written += record_count;
        }

        debug!(
            date = %date,
            records = record_count,
            "Flushed settlements to journal"
        );

        self.buffer.clear();

        Ok(())
    }

    /// Close the journal, flushing any pending records.
    pub fn close(&mut self) -> JournalResult<()> {
        self.flush()?;
        self.close_active_writer()
    }
}

impl Drop for SettlementJournal {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!(?e, "Failed to flush journal buffer on drop");
        }
        if let Err(e) = self.close_active_writer() {
            warn!(?e, "Failed to close journal writer on drop");
        }
    }
}

/// Drain the settlement broadcast into the journal until the channel
/// closes. Journal failures are logged, never propagated: auditing must
/// not take the marketplace down.
pub async fn run_journal(
    mut journal: SettlementJournal,
    mut rx: broadcast::Receiver<SettlementRecord>,
) {
    loop {
        match rx.recv().await {
            Ok(record) => {
                if let Err(e) = journal.record(record) {
                    warn!(?e, auction_id = %record.auction, "Failed to journal settlement");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Settlement journal lagged behind the broadcast");
            }
            Err(broadcast::error::RecvError::Closed) => {
                if let Err(e) = journal.close() {
                    warn!(?e, "Failed to close settlement journal");
                }
                debug!("Settlement broadcast closed, journal task exiting");
                return;
            }
        }
    }
}
