use crate::buffer::BufferGenerator;
use crate::metrics::{recorder, Counters};
use crate::network::{
    DeadlineStream, HarnessConfig, HarnessError, HarnessResult, IoStatus, SessionOutcome,
    SessionRateLimiter, Side,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// One client connection loop: connect, write a session of buffers, close, repeat
pub struct ClientWorker {
    id: usize,
    addr: SocketAddr,
    config: Arc<HarnessConfig>,
    counters: Arc<Counters>,
    limiter: SessionRateLimiter,
    generator: BufferGenerator,
}

impl ClientWorker {
    pub fn new(
        id: usize,
        addr: SocketAddr,
        config: Arc<HarnessConfig>,
        counters: Arc<Counters>,
        limiter: SessionRateLimiter,
    ) -> Self {
        let generator = BufferGenerator::new(config.buffer_size_min, config.buffer_size_max);
        Self {
            id,
            addr,
            config,
            counters,
            limiter,
            generator,
        }
    }

    /// Run sessions back-to-back. Returns only with a fatal error.
    pub async fn run(mut self) -> HarnessResult<()> {
        tracing::debug!(worker = self.id, addr = %self.addr, "client worker started");
        loop {
            self.limiter.until_ready().await;
            self.run_session().await?;
        }
    }

    /// Run exactly one session.
    ///
    /// The connection is closed when this returns, whatever the outcome.
    pub async fn run_session(&mut self) -> HarnessResult<SessionOutcome> {
        let stream = TcpStream::connect(self.addr)
            .await
            .map_err(|source| HarnessError::Connect {
                addr: self.addr,
                source,
            })?;
        let mut conn = DeadlineStream::new(stream, self.config.connection_timeout);

        let mut written = 0u64;
        for _ in 0..self.config.buffers_per_session {
            let buf = self.generator.next_buffer();
            match conn.write_buffer(buf).await? {
                IoStatus::Completed(()) => written += buf.len() as u64,
                IoStatus::DeadlineExceeded { transferred } => {
                    let bytes = written + transferred;
                    tracing::debug!(worker = self.id, bytes, "client write hit deadline");
                    self.counters.record_canceled(Side::Client, bytes);
                    return Ok(SessionOutcome::Canceled { bytes });
                }
            }
        }

        recorder::record_session_written(written);
        Ok(SessionOutcome::Finished { bytes: written })
    }
}
