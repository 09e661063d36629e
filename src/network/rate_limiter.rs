//! Session rate limiting using the governor crate

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Caps how many sessions per second the whole client pool may open.
///
/// Disabled by default; a disabled limiter never waits.
#[derive(Clone, Default)]
pub struct SessionRateLimiter {
    limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
}

impl SessionRateLimiter {
    /// Create a limiter allowing `sessions_per_second` (0 = unlimited)
    pub fn new(sessions_per_second: u32) -> Self {
        let limiter = NonZeroU32::new(sessions_per_second)
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));
        Self { limiter }
    }

    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Wait until another session may start
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_unlimited_rate_limiter() {
        let limiter = SessionRateLimiter::unlimited();

        assert!(!limiter.is_enabled());

        let start = Instant::now();
        for _ in 0..100 {
            limiter.until_ready().await;
        }
        assert!(start.elapsed().as_millis() < 100);
    }

    #[tokio::test]
    async fn test_rate_limited_sessions() {
        // 20 sessions per second, burst of 20 then ~50ms each
        let limiter = SessionRateLimiter::new(20);

        assert!(limiter.is_enabled());

        let start = Instant::now();
        for _ in 0..23 {
            limiter.until_ready().await;
        }
        let elapsed = start.elapsed();
        println!("Rate limited 23 sessions in {}ms", elapsed.as_millis());
        assert!(elapsed.as_millis() >= 100);
        assert!(elapsed.as_millis() < 5000, "Rate limiter took too long");
    }

    #[tokio::test]
    async fn test_clones_share_quota() {
        let limiter = SessionRateLimiter::new(10);
        let other = limiter.clone();

        let start = Instant::now();
        for _ in 0..6 {
            limiter.until_ready().await;
            other.until_ready().await;
        }
        // 12 permits from a burst of 10 need at least one refill
        assert!(start.elapsed().as_millis() >= 50);
    }
}
