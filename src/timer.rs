//! # Countdown Timer
//!
//! The countdown peripheral driven by inbound commands. The connection
//! manager only consumes the [`Countdown`] trait (load, start, reset, and the
//! two status reads); [`CountdownTimer`] is the bundled implementation,
//! advanced by an external periodic driver through [`CountdownTimer::tick`].

use embassy_time::Duration;

/// Externally observable state of a countdown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerStatus {
    /// Not counting; the remaining value is whatever was last loaded or zero.
    #[default]
    Stopped,
    /// Counting down.
    Running,
    /// Ran down to zero without being reset.
    Expired,
}

/// The countdown operations the connection manager depends on.
///
/// Implementations are free to track time however they like; the manager
/// never inspects tick mechanics, only these reads and writes.
pub trait Countdown {
    /// Load a duration. Does not start or stop the countdown.
    fn set(&mut self, minutes: u16, seconds: u16);

    /// Begin counting down from the loaded duration.
    fn start(&mut self);

    /// Stop counting and clear the remaining value to zero.
    fn reset(&mut self);

    /// Current status.
    fn status(&self) -> TimerStatus;

    /// Remaining duration; zero when stopped or expired.
    fn remaining(&self) -> Duration;
}

/// A countdown advanced by an external time source.
///
/// `start()` always enters [`TimerStatus::Running`], even at zero remaining;
/// expiry is observed on the next [`tick`](Self::tick). The `true` return on
/// the running-to-expired edge is the hook the scheduling loop uses to
/// re-publish device status on expiry.
#[derive(Debug, Clone, Copy)]
pub struct CountdownTimer {
    remaining: Duration,
    status: TimerStatus,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    /// Create a stopped, cleared countdown.
    pub const fn new() -> Self {
        Self {
            remaining: Duration::from_ticks(0),
            status: TimerStatus::Stopped,
        }
    }

    /// Advance the countdown by `elapsed`. Returns `true` exactly when this
    /// call moved the countdown from running to expired.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }

        self.remaining = self
            .remaining
            .checked_sub(elapsed)
            .unwrap_or(Duration::from_ticks(0));

        if self.remaining.as_ticks() == 0 {
            self.status = TimerStatus::Expired;
            true
        } else {
            false
        }
    }
}

impl Countdown for CountdownTimer {
    fn set(&mut self, minutes: u16, seconds: u16) {
        self.remaining = Duration::from_secs(u64::from(minutes) * 60 + u64::from(seconds));
    }

    fn start(&mut self) {
        self.status = TimerStatus::Running;
    }

    fn reset(&mut self) {
        self.remaining = Duration::from_ticks(0);
        self.status = TimerStatus::Stopped;
    }

    fn status(&self) -> TimerStatus {
        self.status
    }

    fn remaining(&self) -> Duration {
        self.remaining
    }
}
