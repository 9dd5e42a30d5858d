use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time since some fixed start, used to bound training sessions.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to, plus an optional fixed step on every read.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    tick: Duration,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock::default()
    }

    /// Advances by `tick` each time the clock is read.
    pub fn ticking(tick: Duration) -> ManualClock {
        ManualClock { now: Cell::new(Duration::ZERO), tick }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.tick);
        now
    }
}
