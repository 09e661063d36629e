use crate::metrics::Counters;
use crate::network::{DeadlineStream, HarnessError, HarnessResult, SessionBounds};
use crate::server::handler::handle_connection;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

pub async fn bind(addr: SocketAddr) -> HarnessResult<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| HarnessError::Bind { addr, source })
}

/// Accepts connections and spawns one handler task per connection
pub struct Acceptor {
    listener: TcpListener,
    timeout: Duration,
    bounds: SessionBounds,
    counters: Arc<Counters>,
}

impl Acceptor {
    pub fn new(
        listener: TcpListener,
        timeout: Duration,
        bounds: SessionBounds,
        counters: Arc<Counters>,
    ) -> Self {
        Self {
            listener,
            timeout,
            bounds,
            counters,
        }
    }

    pub fn local_addr(&self) -> HarnessResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept forever. Returns only on a listener failure or a fatal handler error.
    pub async fn run(self) -> HarnessResult<()> {
        let mut handlers = JoinSet::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer) = accepted.map_err(HarnessError::Accept)?;
                    // Deadline starts at accept, before the handler is scheduled
                    let conn = DeadlineStream::new(stream, self.timeout);
                    let counters = self.counters.clone();
                    let bounds = self.bounds;
                    let linger = self.timeout;
                    tracing::trace!(%peer, "accepted connection");
                    handlers.spawn(async move {
                        handle_connection(conn, bounds, linger, &counters).await
                    });
                }
                Some(joined) = handlers.join_next() => {
                    let outcome = joined??;
                    tracing::trace!(?outcome, "server session done");
                }
            }
        }
    }
}
