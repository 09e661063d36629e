use crate::client::worker::ClientWorker;
use crate::metrics::Counters;
use crate::network::{HarnessConfig, HarnessResult, SessionRateLimiter};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Fixed-size set of client workers. Dropping the pool aborts every worker.
pub struct ClientPool {
    workers: JoinSet<HarnessResult<()>>,
}

impl ClientPool {
    /// Spawn `config.parallelism` workers against `addr`
    pub fn spawn(
        addr: SocketAddr,
        config: Arc<HarnessConfig>,
        counters: Arc<Counters>,
        limiter: SessionRateLimiter,
    ) -> Self {
        let mut workers = JoinSet::new();
        for id in 0..config.parallelism {
            let worker = ClientWorker::new(
                id,
                addr,
                config.clone(),
                counters.clone(),
                limiter.clone(),
            );
            workers.spawn(worker.run());
        }
        Self { workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Wait for the first worker to fail
    pub async fn wait(&mut self) -> HarnessResult<()> {
        while let Some(joined) = self.workers.join_next().await {
            joined??;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HarnessError;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_spawns_one_worker_per_slot() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = HarnessConfig {
            parallelism: 3,
            ..Default::default()
        };
        let pool = ClientPool::spawn(
            listener.local_addr().unwrap(),
            Arc::new(config),
            Arc::new(Counters::new()),
            SessionRateLimiter::unlimited(),
        );
        assert_eq!(pool.worker_count(), 3);
    }

    #[tokio::test]
    async fn test_wait_surfaces_worker_failure() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let config = HarnessConfig {
            parallelism: 2,
            ..Default::default()
        };
        let mut pool = ClientPool::spawn(
            addr,
            Arc::new(config),
            Arc::new(Counters::new()),
            SessionRateLimiter::unlimited(),
        );

        let err = pool.wait().await.unwrap_err();
        assert!(matches!(err, HarnessError::Connect { .. }));
    }
}
