use crate::network::error::{HarnessError, HarnessResult};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub bind_addr: SocketAddr,
    pub buffer_size_min: usize,
    pub buffer_size_max: usize,
    pub parallelism: usize,
    pub buffers_per_session: usize,
    /// Deadline applied to both ends of every connection
    pub connection_timeout: Duration,
    pub report_interval: Duration,
    /// 0 = sessions run back-to-back
    pub max_sessions_per_second: u32,
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            buffer_size_min: 1 << 10,
            buffer_size_max: 512 << 10,
            parallelism: 8,
            buffers_per_session: 8,
            connection_timeout: Duration::from_millis(50),
            report_interval: Duration::from_secs(1),
            max_sessions_per_second: 0,
            metrics_addr: None,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> HarnessResult<()> {
        if self.buffer_size_min == 0 {
            return Err(HarnessError::InvalidConfig(
                "buffer_size_min must be positive".to_string(),
            ));
        }
        if self.buffer_size_min >= self.buffer_size_max {
            return Err(HarnessError::InvalidConfig(format!(
                "buffer_size_min ({}) must be below buffer_size_max ({})",
                self.buffer_size_min, self.buffer_size_max
            )));
        }
        if self.parallelism == 0 {
            return Err(HarnessError::InvalidConfig(
                "parallelism must be positive".to_string(),
            ));
        }
        if self.buffers_per_session == 0 {
            return Err(HarnessError::InvalidConfig(
                "buffers_per_session must be positive".to_string(),
            ));
        }
        if self.connection_timeout.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "connection_timeout must be positive".to_string(),
            ));
        }
        if self.report_interval.is_zero() {
            return Err(HarnessError::InvalidConfig(
                "report_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Byte bounds for one complete session of writes
    pub fn session_bounds(&self) -> SessionBounds {
        let count = self.buffers_per_session as u64;
        SessionBounds {
            min: count * self.buffer_size_min as u64,
            max: count * self.buffer_size_max as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBounds {
    pub min: u64,
    pub max: u64,
}

impl SessionBounds {
    pub fn check(&self, size: u64) -> HarnessResult<()> {
        if size < self.min || size > self.max {
            return Err(HarnessError::SessionSize {
                size,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// How one side saw a session end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Finished { bytes: u64 },
    Canceled { bytes: u64 },
}

impl SessionOutcome {
    pub fn bytes(&self) -> u64 {
        match self {
            SessionOutcome::Finished { bytes } | SessionOutcome::Canceled { bytes } => *bytes,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, SessionOutcome::Canceled { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Client,
    Server,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Client => "client",
            Side::Server => "server",
        }
    }
}
