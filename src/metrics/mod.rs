//! Session counters and observability
//!
//! - `Counters`: the two lock-free outcome counters shared by every task
//! - `Reporter`: periodic stderr snapshot of the counters
//! - Prometheus export of the same counters when a metrics address is configured

pub mod counters;
pub mod exporter;
pub mod recorder;
pub mod reporter;

pub use counters::{CounterSnapshot, Counters};
pub use exporter::start_metrics_server;
pub use recorder::init_metrics;
pub use reporter::Reporter;
