use crate::metrics::counters::{CounterSnapshot, Counters};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Prints `finished: N canceled: M` to stderr once per interval
pub struct Reporter {
    counters: Arc<Counters>,
    interval: Duration,
}

impl Reporter {
    pub fn new(counters: Arc<Counters>, interval: Duration) -> Self {
        Self { counters, interval }
    }

    /// Runs until the task is dropped
    pub async fn run(self) {
        self.run_with(|snapshot| eprintln!("{}", snapshot)).await
    }

    pub async fn run_with<F>(self, mut sink: F)
    where
        F: FnMut(CounterSnapshot),
    {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let snapshot = self.counters.snapshot();
            tracing::debug!(
                finished = snapshot.finished,
                canceled = snapshot.canceled,
                "counter snapshot"
            );
            sink(snapshot);
        }
    }
}
