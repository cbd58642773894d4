/// Caret blink timer: fixed-cadence tick source for the prompt caret.
/// Time is passed in, so the timer never reads the clock on its own.

use std::time::{Duration, Instant};

pub const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

pub struct BlinkTimer {
    interval: Duration,
    next: Instant,
}

impl BlinkTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Returns true if a tick is due. Fires at most once per call; when more
    /// than one period was missed the schedule restarts from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.interval;
        if self.next <= now {
            self.next = now + self.interval;
        }
        true
    }

    /// When the next tick is due; used as the event loop wake-up time.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Restart the period, e.g. on keypress.
    pub fn reset(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
