use anyhow::Context;
use clap::Parser;
use deadline_stress::{Harness, HarnessConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "deadline-stress")]
#[command(about = "Hammer a local TCP listener with short-deadline sessions")]
struct Args {
    /// Listen address (port 0 = ephemeral)
    #[arg(long, default_value = "127.0.0.1:0")]
    bind: SocketAddr,

    /// Smallest buffer written, in bytes
    #[arg(long, default_value_t = 1 << 10)]
    min_buffer_size: usize,

    /// Upper bound (exclusive) of buffer sizes, in bytes
    #[arg(long, default_value_t = 512 << 10)]
    max_buffer_size: usize,

    /// Number of concurrent client workers
    #[arg(long, short, default_value_t = 8)]
    parallelism: usize,

    /// Buffers written per session
    #[arg(long, default_value_t = 8)]
    buffers_per_session: usize,

    /// Connection deadline in milliseconds, applied on both ends
    #[arg(long, default_value_t = 50)]
    timeout_ms: u64,

    /// Counter report interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    report_interval_ms: u64,

    /// Cap on new sessions per second across all workers (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_sessions_per_second: u32,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> HarnessConfig {
        HarnessConfig {
            bind_addr: self.bind,
            buffer_size_min: self.min_buffer_size,
            buffer_size_max: self.max_buffer_size,
            parallelism: self.parallelism,
            buffers_per_session: self.buffers_per_session,
            connection_timeout: Duration::from_millis(self.timeout_ms),
            report_interval: Duration::from_millis(self.report_interval_ms),
            max_sessions_per_second: self.max_sessions_per_second,
            metrics_addr: self.metrics_addr,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout is reserved for the banner
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let harness = Harness::bind(args.into_config())
        .await
        .context("failed to start harness")?;

    if let Err(e) = harness.run().await {
        error!("harness invariant violated: {}", e);
        return Err(e).context("stress harness stopped");
    }
    Ok(())
}
