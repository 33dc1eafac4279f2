use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::time::Time;

use crate::frame::Frame;

/// Cancellation flag shared between a frame loop and the callback the host
/// scheduled for it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// The single recurring per-frame task of a session.
///
/// The host owns the actual scheduling primitive (`requestAnimationFrame`, a
/// tokio interval, a test loop). Each time it delivers a frame it calls
/// [`FrameLoop::advance`], and it only schedules the next one while the token
/// handed out by [`FrameLoop::arm`] is live.
#[derive(Debug, Default)]
pub struct FrameLoop {
    token: Option<CancelToken>,
    last: Option<Frame>,
    generation: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new loop generation, cancelling any previous one.
    pub fn arm(&mut self) -> CancelToken {
        self.cancel();
        let token = CancelToken::new();
        self.token = Some(token.clone());
        self.last = None;
        self.generation = self.generation.wrapping_add(1);
        token
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Number of times the loop has been armed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last
    }

    /// Index of the most recent frame, 0 before the first one.
    pub fn frame_index(&self) -> u64 {
        self.last.map(|f| f.index).unwrap_or(0)
    }

    pub fn advance(&mut self, now: Time) -> Frame {
        let frame = match self.last {
            Some(prev) => prev.next(now),
            None => Frame::first(now),
        };
        self.last = Some(frame);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::FrameLoop;
    use foundation::time::Time;

    #[test]
    fn arming_cancels_previous_token() {
        let mut fl = FrameLoop::new();
        let first = fl.arm();
        assert!(fl.is_armed());
        let second = fl.arm();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(fl.generation(), 2);
    }

    #[test]
    fn cancel_disarms() {
        let mut fl = FrameLoop::new();
        let token = fl.arm();
        fl.cancel();
        assert!(token.is_cancelled());
        assert!(!fl.is_armed());
    }

    #[test]
    fn advance_counts_frames_per_generation() {
        let mut fl = FrameLoop::new();
        fl.arm();
        assert_eq!(fl.advance(Time(1.0)).index, 0);
        let f = fl.advance(Time(1.25));
        assert_eq!(f.index, 1);
        assert_eq!(f.dt_s, 0.25);
        assert_eq!(fl.frame_index(), 1);

        fl.arm();
        assert_eq!(fl.last_frame(), None);
        assert_eq!(fl.advance(Time(9.0)).index, 0);
    }
}
