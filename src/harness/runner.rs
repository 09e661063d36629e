use crate::client::ClientPool;
use crate::metrics::{init_metrics, start_metrics_server, Counters, Reporter};
use crate::network::{HarnessConfig, HarnessResult, SessionRateLimiter};
use crate::server::{self, Acceptor};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Wires the listener, client pool and reporter together in one process
pub struct Harness {
    config: Arc<HarnessConfig>,
    counters: Arc<Counters>,
    listener: TcpListener,
}

impl Harness {
    /// Validate `config` and bind the listening socket
    pub async fn bind(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        let listener = server::bind(config.bind_addr).await?;
        Ok(Self {
            config: Arc::new(config),
            counters: Arc::new(Counters::new()),
            listener,
        })
    }

    pub fn local_addr(&self) -> HarnessResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared counters, readable while the harness runs
    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    pub fn banner(&self) -> HarnessResult<String> {
        Ok(format!(
            "addr: {}\nbuffer_size_min: {}\nbuffer_size_max: {}\nparallelism: {}\nbuffers_per_session: {}\n",
            self.local_addr()?,
            self.config.buffer_size_min,
            self.config.buffer_size_max,
            self.config.parallelism,
            self.config.buffers_per_session,
        ))
    }

    /// Run until the first fatal error; there is no other way out.
    pub async fn run(self) -> HarnessResult<()> {
        let addr = self.local_addr()?;
        println!("{}", self.banner()?);

        if let Some(metrics_addr) = self.config.metrics_addr {
            let bound = start_metrics_server(metrics_addr)?;
            tracing::info!(%bound, "prometheus exporter listening");
        } else {
            init_metrics();
        }

        let limiter = SessionRateLimiter::new(self.config.max_sessions_per_second);
        let acceptor = Acceptor::new(
            self.listener,
            self.config.connection_timeout,
            self.config.session_bounds(),
            self.counters.clone(),
        );
        let mut pool = ClientPool::spawn(
            addr,
            self.config.clone(),
            self.counters.clone(),
            limiter,
        );
        tracing::info!(
            %addr,
            workers = pool.worker_count(),
            timeout_ms = self.config.connection_timeout.as_millis() as u64,
            "starting stress harness"
        );
        let reporter = Reporter::new(self.counters.clone(), self.config.report_interval);

        tokio::select! {
            result = acceptor.run() => result,
            result = pool.wait() => result,
            _ = reporter.run() => Ok(()),
        }
    }
}
