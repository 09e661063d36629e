//! TCP stream bound to a single absolute deadline
//!
//! The deadline is fixed when the connection is wrapped and applies to every
//! subsequent read and write. Once it has passed, any I/O call reports
//! [`IoStatus::DeadlineExceeded`] instead of touching the socket.

use crate::network::error::{HarnessError, HarnessResult};
use std::io::ErrorKind;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep_until, timeout_at, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStatus<T> {
    Completed(T),
    /// Deadline hit after `transferred` bytes of the current call
    DeadlineExceeded { transferred: u64 },
}

pub struct DeadlineStream {
    stream: TcpStream,
    deadline: Instant,
}

impl DeadlineStream {
    /// Wrap `stream` with a deadline of now + `timeout`
    pub fn new(stream: TcpStream, timeout: Duration) -> Self {
        Self::with_deadline(stream, Instant::now() + timeout)
    }

    pub fn with_deadline(stream: TcpStream, deadline: Instant) -> Self {
        Self { stream, deadline }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Keep the socket open, unread, until `grace` past the deadline.
    ///
    /// Closing with unread data resets the connection, which would turn a peer
    /// still inside its own deadline into a write failure.
    pub async fn hold_open(self, grace: Duration) {
        sleep_until(self.deadline + grace).await;
    }

    /// Write all of `buf`.
    ///
    /// A `write` that returns 0 without an error is a short write and fatal.
    pub async fn write_buffer(&mut self, buf: &[u8]) -> HarnessResult<IoStatus<()>> {
        let mut written = 0;
        while written < buf.len() {
            if self.expired() {
                return Ok(IoStatus::DeadlineExceeded {
                    transferred: written as u64,
                });
            }
            match timeout_at(self.deadline, self.stream.write(&buf[written..])).await {
                Err(_) => {
                    return Ok(IoStatus::DeadlineExceeded {
                        transferred: written as u64,
                    })
                }
                Ok(Ok(0)) => {
                    return Err(HarnessError::ShortWrite {
                        written,
                        len: buf.len(),
                    })
                }
                Ok(Ok(n)) => written += n,
                Ok(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Ok(Err(source)) => {
                    return Err(HarnessError::Write {
                        len: buf.len(),
                        is_timeout: is_timeout(&source),
                        source,
                    })
                }
            }
        }
        Ok(IoStatus::Completed(()))
    }

    /// Read until end of stream, using `chunk` as scratch space.
    ///
    /// Returns the total number of bytes read.
    pub async fn drain(&mut self, chunk: &mut [u8]) -> HarnessResult<IoStatus<u64>> {
        debug_assert!(!chunk.is_empty());
        let mut total = 0u64;
        loop {
            if self.expired() {
                return Ok(IoStatus::DeadlineExceeded { transferred: total });
            }
            match timeout_at(self.deadline, self.stream.read(chunk)).await {
                Err(_) => return Ok(IoStatus::DeadlineExceeded { transferred: total }),
                Ok(Ok(0)) => return Ok(IoStatus::Completed(total)),
                Ok(Ok(n)) => total += n as u64,
                Ok(Err(e)) if e.kind() == ErrorKind::Interrupted => continue,
                Ok(Err(source)) => {
                    return Err(HarnessError::Read {
                        read_so_far: total,
                        source,
                    })
                }
            }
        }
    }
}

fn is_timeout(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::TimedOut
}
