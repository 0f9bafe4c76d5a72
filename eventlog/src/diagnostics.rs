//! Rate-limited diagnostic gating
//!
//! Overload conditions (chunk-bound drops, file write failures) can fire on
//! every delivered record. Producers must never be slowed or disrupted, so
//! these paths stay silent except for an occasional `warn!` summarizing how
//! many occurrences were suppressed since the last emission.

use std::time::{Duration, Instant};

/// Default minimum interval between emitted warnings.
pub const DEFAULT_WARN_INTERVAL: Duration = Duration::from_secs(10);

/// Interval gate for repetitive warnings.
///
/// Every call site already holds the subsystem lock, so plain fields are
/// sufficient; no atomics needed.
#[derive(Debug)]
pub struct RateLimited {
    min_interval: Duration,
    last_emit: Option<Instant>,
    suppressed: u64,
    total: u64,
}

impl RateLimited {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emit: None,
            suppressed: 0,
            total: 0,
        }
    }

    /// Record one occurrence. Returns `Some(suppressed)` when the caller
    /// should emit a warning now, where `suppressed` is the number of
    /// occurrences swallowed since the previous emission.
    pub fn record(&mut self) -> Option<u64> {
        self.total += 1;

        let now = Instant::now();
        let due = match self.last_emit {
            None => true,
            Some(last) => now.duration_since(last) >= self.min_interval,
        };

        if due {
            self.last_emit = Some(now);
            let suppressed = self.suppressed;
            self.suppressed = 0;
            Some(suppressed)
        } else {
            self.suppressed += 1;
            None
        }
    }

    /// Total occurrences ever recorded, emitted or suppressed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for RateLimited {
    fn default() -> Self {
        Self::new(DEFAULT_WARN_INTERVAL)
    }
}
