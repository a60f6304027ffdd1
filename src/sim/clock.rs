//! Session clock
//!
//! Wall-clock based: timestamps are `Duration`s since whatever epoch the host
//! uses (`performance.now()` in the browser, an `Instant` natively). The
//! clock only stores the start; remaining time is always derived.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    start: Duration,
    total: Duration,
}

impl SessionClock {
    pub fn new(total: Duration, now: Duration) -> Self {
        Self { start: now, total }
    }

    /// Restart the countdown from `now`
    pub fn reset(&mut self, now: Duration) {
        self.start = now;
    }

    /// Time since start; a timestamp before the start counts as zero
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.start)
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.total.saturating_sub(self.elapsed(now))
    }

    /// Whole seconds left, floored
    pub fn remaining_secs(&self, now: Duration) -> u64 {
        self.remaining(now).as_secs()
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        self.remaining(now).is_zero()
    }
}
