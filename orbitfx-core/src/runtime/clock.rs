use crate::foundation::core::Millis;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source driving every effect loop.
///
/// `wait_until` is how the stage's event loop blocks until its next event: a real clock sleeps,
/// a manual clock jumps.
pub trait Clock {
    /// Current time since this clock's origin.
    fn now(&self) -> Millis;

    /// Block (or jump) until `now() >= t`. Never moves time backwards.
    fn wait_until(&self, t: Millis);
}

/// Wall-clock time backed by [`std::time::Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    fn wait_until(&self, t: Millis) {
        let remaining = t.0 - self.now().0;
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining / 1000.0));
        }
    }
}

/// Hand-driven clock for deterministic runs and tests.
///
/// Clones share the same underlying time, so a test can keep a handle while a [`crate::Stage`]
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(t: Millis) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(t.0)),
        }
    }

    /// Move time forward by `delta`; negative deltas are ignored.
    pub fn advance(&self, delta: Millis) {
        if delta.0 > 0.0 {
            self.now_ms.set(self.now_ms.get() + delta.0);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        Millis(self.now_ms.get())
    }

    fn wait_until(&self, t: Millis) {
        if t.0 > self.now_ms.get() {
            self.now_ms.set(t.0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/clock.rs"]
mod tests;
