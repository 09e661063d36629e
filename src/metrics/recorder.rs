//! Metrics recorder for stress sessions
//!
//! Mirrors the in-process counters onto the `metrics` facade. Without an
//! installed recorder every call here is a no-op.

use crate::network::Side;
use metrics::{counter, describe_counter};
use std::sync::atomic::{AtomicBool, Ordering};

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return; // Already initialized
    }

    describe_counter!(
        "stress_sessions_finished_total",
        "Sessions the server drained to a clean end of stream"
    );
    describe_counter!(
        "stress_sessions_canceled_total",
        "Sessions that hit their deadline, by the side that observed it"
    );
    describe_counter!("stress_bytes_written_total", "Bytes written by client workers");
    describe_counter!("stress_bytes_read_total", "Bytes read by server handlers");
}

pub fn record_session_finished(bytes: u64) {
    counter!("stress_sessions_finished_total").increment(1);
    counter!("stress_bytes_read_total").increment(bytes);
}

pub fn record_session_canceled(side: Side, bytes: u64) {
    counter!("stress_sessions_canceled_total", "side" => side.as_str()).increment(1);
    match side {
        Side::Client => counter!("stress_bytes_written_total").increment(bytes),
        Side::Server => counter!("stress_bytes_read_total").increment(bytes),
    }
}

/// Client side completed all of its writes
pub fn record_session_written(bytes: u64) {
    counter!("stress_bytes_written_total").increment(bytes);
}
