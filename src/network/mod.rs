pub mod deadline;
pub mod error;
pub mod rate_limiter;
pub mod types;

pub use deadline::{DeadlineStream, IoStatus};
pub use error::{HarnessError, HarnessResult};
pub use rate_limiter::SessionRateLimiter;
pub use types::{HarnessConfig, SessionBounds, SessionOutcome, Side};
