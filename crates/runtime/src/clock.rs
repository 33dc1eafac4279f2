use foundation::time::Time;
use serde::Serialize;

pub const MIN_DURATION_MIN: f64 = 1.0;
pub const MAX_DURATION_MIN: f64 = 240.0;
pub const DEFAULT_DURATION_MIN: f64 = 25.0;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockState {
    #[default]
    Idle,
    Running,
    Paused,
    /// Terminal until `reset`.
    Arrived,
}

/// Result of advancing the clock by one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Still running; schedule another frame.
    Continue,
    /// This tick reached the total duration. Reported once per session.
    Arrived,
    /// The clock is not running; nothing to schedule.
    Stopped,
}

/// A duration request that is not a positive, finite number of minutes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InvalidDuration(pub f64);

impl std::fmt::Display for InvalidDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid session duration: {} minutes", self.0)
    }
}

impl std::error::Error for InvalidDuration {}

/// Session countdown: elapsed time against a target duration.
///
/// Elapsed time is derived from a begin anchor rather than accumulated per
/// frame, so dropped or throttled frames never slow the clock down.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClock {
    state: ClockState,
    begin: Option<Time>,
    elapsed_s: f64,
    total_s: f64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MIN)
    }
}

impl SessionClock {
    /// Invalid durations fall back to the default.
    pub fn new(duration_min: f64) -> Self {
        let minutes = clamp_duration_min(duration_min).unwrap_or(DEFAULT_DURATION_MIN);
        Self {
            state: ClockState::Idle,
            begin: None,
            elapsed_s: 0.0,
            total_s: minutes * 60.0,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    pub fn total_s(&self) -> f64 {
        self.total_s
    }

    pub fn duration_min(&self) -> f64 {
        self.total_s / 60.0
    }

    pub fn remaining_s(&self) -> f64 {
        (self.total_s - self.elapsed_s).max(0.0)
    }

    pub fn progress(&self) -> f64 {
        if self.total_s > 0.0 {
            (self.elapsed_s / self.total_s).min(1.0)
        } else {
            0.0
        }
    }

    /// Idle/Paused -> Running. The anchor is placed `elapsed` seconds before
    /// `now` so a resumed session continues where it stopped.
    ///
    /// Returns whether the clock changed state.
    pub fn start(&mut self, now: Time) -> bool {
        match self.state {
            ClockState::Idle | ClockState::Paused => {
                self.begin = Some(now.offset(-self.elapsed_s));
                self.state = ClockState::Running;
                true
            }
            ClockState::Running | ClockState::Arrived => false,
        }
    }

    pub fn tick(&mut self, now: Time) -> Tick {
        if self.state != ClockState::Running {
            return Tick::Stopped;
        }
        let Some(begin) = self.begin else {
            return Tick::Stopped;
        };

        let elapsed = now.since(begin).clamp(0.0, self.total_s);
        if elapsed >= self.total_s {
            self.elapsed_s = self.total_s;
            self.state = ClockState::Arrived;
            return Tick::Arrived;
        }
        self.elapsed_s = elapsed;
        Tick::Continue
    }

    /// Running -> Paused, keeping the elapsed time of the last tick.
    pub fn pause(&mut self) -> bool {
        if self.state != ClockState::Running {
            return false;
        }
        self.state = ClockState::Paused;
        true
    }

    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.begin = None;
        self.elapsed_s = 0.0;
    }

    /// Changes the target duration without touching state. Elapsed time is
    /// kept, except that an arrived clock stays pinned at its new total.
    ///
    /// Positive values are clamped into [1, 240] minutes; anything else is
    /// rejected and the previous duration stays. Returns the applied minutes.
    pub fn set_duration_min(&mut self, minutes: f64) -> Result<f64, InvalidDuration> {
        let minutes = clamp_duration_min(minutes)?;
        self.total_s = minutes * 60.0;
        if self.state == ClockState::Arrived {
            self.elapsed_s = self.total_s;
        }
        Ok(minutes)
    }
}

fn clamp_duration_min(minutes: f64) -> Result<f64, InvalidDuration> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(InvalidDuration(minutes));
    }
    Ok(minutes.clamp(MIN_DURATION_MIN, MAX_DURATION_MIN))
}
