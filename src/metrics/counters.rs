use crate::metrics::recorder;
use crate::network::Side;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide session outcome counters.
///
/// Both sides record their own cancellations, so a session that times out on
/// both ends is counted as canceled twice.
#[derive(Debug, Default)]
pub struct Counters {
    finished: AtomicU64,
    canceled: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server drained a session to a clean end of stream
    pub fn record_finished(&self, bytes: u64) {
        self.finished.fetch_add(1, Ordering::Relaxed);
        recorder::record_session_finished(bytes);
    }

    /// `side` observed the deadline first on its end of a session
    pub fn record_canceled(&self, side: Side, bytes: u64) {
        self.canceled.fetch_add(1, Ordering::Relaxed);
        recorder::record_session_canceled(side, bytes);
    }

    /// Approximate snapshot; the two loads are not taken atomically together
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            finished: self.finished.load(Ordering::Relaxed),
            canceled: self.canceled.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub finished: u64,
    pub canceled: u64,
}

impl CounterSnapshot {
    pub fn total(&self) -> u64 {
        self.finished + self.canceled
    }

    /// Progress made since `earlier`
    pub fn delta(&self, earlier: &CounterSnapshot) -> CounterSnapshot {
        CounterSnapshot {
            finished: self.finished.saturating_sub(earlier.finished),
            canceled: self.canceled.saturating_sub(earlier.canceled),
        }
    }
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "finished: {} canceled: {}", self.finished, self.canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_each_event_counts_once() {
        let counters = Counters::new();
        counters.record_finished(100);
        counters.record_canceled(Side::Client, 0);
        counters.record_canceled(Side::Server, 10);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.finished, 1);
        assert_eq!(snapshot.canceled, 2);
        assert_eq!(snapshot.total(), 3);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counters = Arc::new(Counters::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counters = counters.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        if i % 2 == 0 {
                            counters.record_finished(1);
                        } else {
                            counters.record_canceled(Side::Server, 1);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.finished, 4000);
        assert_eq!(snapshot.canceled, 4000);
    }

    #[test]
    fn test_snapshots_are_monotonic() {
        let counters = Counters::new();
        let mut previous = counters.snapshot();
        for i in 0..50 {
            if i % 3 == 0 {
                counters.record_canceled(Side::Client, 0);
            } else {
                counters.record_finished(0);
            }
            let current = counters.snapshot();
            assert!(current.finished >= previous.finished);
            assert!(current.canceled >= previous.canceled);
            assert_eq!(current.delta(&previous).total(), 1);
            previous = current;
        }
    }

    #[test]
    fn test_report_line_format() {
        let snapshot = CounterSnapshot {
            finished: 12,
            canceled: 3,
        };
        assert_eq!(snapshot.to_string(), "finished: 12 canceled: 3");
    }
}
