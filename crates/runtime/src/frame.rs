use foundation::time::Time;

/// Metadata for one display refresh.
///
/// Frames follow the host's refresh cadence rather than a fixed timestep, so
/// `dt_s` is measured from the previous frame's timestamp.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index within the current loop.
    pub index: u64,
    /// Seconds since the previous frame (0 for the first frame).
    pub dt_s: f64,
    /// Host time at which the frame was delivered.
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    /// Hosts may deliver a timestamp earlier than the previous one (e.g. a
    /// rAF callback racing a `performance.now()` read); dt never goes negative.
    pub fn next(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: time.since(self.time).max(0.0),
            time,
        }
    }
}
