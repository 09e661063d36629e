use std::net::SocketAddr;
use thiserror::Error;

/// Every variant is fatal to the harness. Deadline expiry is not an error,
/// it is reported as [`SessionOutcome::Canceled`](super::SessionOutcome).
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Bind to {addr} failed: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Accept failed: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Write of {len} bytes failed (timeout: {is_timeout}): {source}")]
    Write {
        len: usize,
        is_timeout: bool,
        source: std::io::Error,
    },

    #[error("Short write: n={written} len(buf)={len}")]
    ShortWrite { written: usize, len: usize },

    #[error("Read failed after {read_so_far} bytes: {source}")]
    Read {
        read_so_far: u64,
        source: std::io::Error,
    },

    #[error("Session size out of bounds: size={size} min={min} max={max}")]
    SessionSize { size: u64, min: u64, max: u64 },

    #[error("Metrics setup failed: {0}")]
    Metrics(String),

    #[error("Task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for HarnessError {
    fn from(err: tokio::task::JoinError) -> Self {
        HarnessError::Task(err.to_string())
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
