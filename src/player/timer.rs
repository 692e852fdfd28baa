use std::time::{Duration, Instant};

/// Source of "now" for elapsed-time bookkeeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A repeating deadline polled from the event loop.
///
/// `cancel()` clears the pending deadline; a cancelled timer never fires or
/// reschedules until `start()` is called again.
#[derive(Debug)]
pub struct ProgressTimer {
    interval: Duration,
    deadline: Option<Instant>,
    cancelled: bool,
}

impl ProgressTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
            cancelled: true,
        }
    }

    /// Arm the timer so it first fires one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.cancelled = false;
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.deadline = None;
    }

    /// Returns true when the deadline has passed. The timer is then disarmed
    /// until `reschedule` is called.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if !self.cancelled && now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Schedule the next firing, unless the timer was cancelled meanwhile.
    pub fn reschedule(&mut self, now: Instant) {
        if self.cancelled {
            return;
        }
        self.deadline = Some(now + self.interval);
    }

    /// Time until the next firing, if one is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.cancelled {
            return None;
        }
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
