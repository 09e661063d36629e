//! Prometheus metrics exporter
//!
//! Exposes the session counters via HTTP for Prometheus scraping.

use crate::metrics::recorder::init_metrics;
use crate::network::{HarnessError, HarnessResult};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::OnceLock;

static EXPORTER_ADDR: OnceLock<SocketAddr> = OnceLock::new();

/// Install the Prometheus recorder and its HTTP listener on `listen_addr`.
///
/// Must be called from within a tokio runtime. Only the first call installs
/// anything; later calls return the address already in use.
pub fn start_metrics_server(listen_addr: SocketAddr) -> HarnessResult<SocketAddr> {
    init_metrics();

    if let Some(addr) = EXPORTER_ADDR.get() {
        return Ok(*addr);
    }

    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .install()
        .map_err(|e| HarnessError::Metrics(e.to_string()))?;

    Ok(*EXPORTER_ADDR.get_or_init(|| listen_addr))
}
