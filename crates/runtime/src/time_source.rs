use std::cell::Cell;

use foundation::time::Time;

/// Supplies "now" on a monotonic-enough timeline.
pub trait TimeSource {
    fn now(&self) -> Time;
}

/// Hand-driven clock for tests and deterministic replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: Time) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    pub fn set(&self, time: Time) {
        self.now.set(time.0);
    }

    pub fn advance(&self, seconds: f64) -> Time {
        let next = self.now.get() + seconds;
        self.now.set(next);
        Time(next)
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Time {
        Time(self.now.get())
    }
}

/// Wall clock that runs `speedup` times faster than real time, so a long
/// session can be watched in a terminal.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct ScaledClock {
    origin: std::time::Instant,
    speedup: f64,
}

#[cfg(not(target_arch = "wasm32"))]
impl ScaledClock {
    /// Non-positive or non-finite factors run in real time.
    pub fn new(speedup: f64) -> Self {
        let speedup = if speedup.is_finite() && speedup > 0.0 {
            speedup
        } else {
            1.0
        };
        Self {
            origin: std::time::Instant::now(),
            speedup,
        }
    }

    pub fn speedup(&self) -> f64 {
        self.speedup
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TimeSource for ScaledClock {
    fn now(&self) -> Time {
        Time(self.origin.elapsed().as_secs_f64() * self.speedup)
    }
}
