//! Prometheus metrics for the auction engine.
//!
//! Provides observability for:
//! - Bid arbitration throughput and latency
//! - Rejection reasons (including contention timeouts)
//! - Lifecycle transitions
//! - Settlement outcomes
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. If registration fails,
//! it indicates a fatal configuration error (e.g., duplicate metric names)
//! that should cause an immediate crash at startup rather than silent failure.
//! These panics only occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Total bids accepted by arbitration.
pub static BIDS_ACCEPTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "mavuno_bids_accepted_total",
        "Total bids accepted by arbitration"
    )
    .unwrap()
});

/// Total bids rejected by arbitration.
/// Labels: reason (not_found/not_active/outside_window/invalid_quantity/
/// bid_too_low/below_reserve/contention)
pub static BIDS_REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mavuno_bids_rejected_total",
        "Total bids rejected by arbitration",
        &["reason"]
    )
    .unwrap()
});

/// Bid arbitration duration in milliseconds, lock wait included.
pub static ARBITRATION_DURATION_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "mavuno_bid_arbitration_duration_ms",
        "Bid arbitration duration in milliseconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0]
    )
    .unwrap()
});

/// Total lifecycle status transitions.
/// Labels: to (active/closed/cancelled)
pub static LIFECYCLE_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mavuno_lifecycle_transitions_total",
        "Total auction status transitions",
        &["to"]
    )
    .unwrap()
});

/// Total settlement records emitted.
/// Labels: outcome (winner/no_winner)
pub static SETTLEMENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "mavuno_settlements_total",
        "Total settlement records emitted",
        &["outcome"]
    )
    .unwrap()
});

/// Number of auctions currently accepting bids.
pub static AUCTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "mavuno_auctions_active",
        "Number of auctions currently in active status"
    )
    .unwrap()
});
