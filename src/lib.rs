//! Concurrent TCP deadline stress harness
//!
//! Client workers repeatedly connect to an in-process listener and write a
//! session of randomly sized buffers under a short deadline. The server drains
//! each connection until end of stream or deadline and classifies the session
//! as finished or canceled. Any other I/O failure stops the harness.

pub mod buffer;
pub mod client;
pub mod harness;
pub mod metrics;
pub mod network;
pub mod server;

pub use harness::Harness;
pub use network::{HarnessConfig, HarnessError, HarnessResult, SessionOutcome};
