/// Instant on a host's monotonic timeline, in seconds.
///
/// The origin is whatever the host clock uses (page load for
/// `performance.now()`, process start for native clocks); only differences
/// between two `Time`s are meaningful.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier`; negative if `earlier` is in the future.
    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }

    pub fn offset(self, seconds: f64) -> Self {
        Time(self.0 + seconds)
    }
}
