use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;

/// Wall-clock source for item ids and document timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic sessions and tests.
#[derive(Debug)]
pub struct ManualClock {
    millis: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Cell::new(start_millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.millis.set(self.millis.get().saturating_add(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.millis.get())
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    fn now_millis(&self) -> i64 {
        self.millis.get()
    }
}

/// Hands out strictly increasing millisecond stamps even when the clock
/// does not move between two calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct StampAllocator {
    last: Option<i64>,
}

impl StampAllocator {
    pub fn next(&mut self, clock: &dyn Clock) -> i64 {
        let now = clock.now_millis();
        let stamp = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }
}
