//! Reconnect throttle with exponential backoff.

use core::cmp::min;

use embassy_time::{Duration, Instant};

/// Backoff state for reconnect attempts.
///
/// The retry interval starts at the base report interval and doubles after
/// each consecutive failure, capped at the configured maximum, so the
/// experienced retry gaps are base, 2·base, 4·base, … up to the cap. Any
/// success re-arms the interval to base and clears the attempt timestamp,
/// making the first attempt of the next outage due immediately.
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
    last_attempt: Option<Instant>,
}

impl Backoff {
    /// Create a freshly armed backoff: interval at base, no prior attempt.
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            current: base,
            last_attempt: None,
        }
    }

    /// Whether an attempt is due at `now`. Always true before the first
    /// attempt and after a success.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_attempt {
            None => true,
            Some(at) => now
                .checked_duration_since(at)
                .is_some_and(|elapsed| elapsed >= self.current),
        }
    }

    /// Record a failed attempt at `now` and grow the retry interval. The
    /// first failure of an outage keeps the base interval; every further
    /// consecutive failure doubles it, capped at the maximum.
    pub fn on_failure(&mut self, now: Instant) {
        if self.last_attempt.is_some() {
            self.current = min(self.current * 2, self.max);
        }
        self.last_attempt = Some(now);
    }

    /// Record a successful connection: interval back to base, next attempt
    /// immediately due.
    pub fn on_success(&mut self) {
        self.current = self.base;
        self.last_attempt = None;
    }

    /// The retry interval currently in effect.
    pub fn interval(&self) -> Duration {
        self.current
    }
}
