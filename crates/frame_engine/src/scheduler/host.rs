//! Frame hosts
//!
//! A host stands in for the display's "next frame" callback. The scheduler
//! asks it for a frame before every tick and stops when it declines.

use std::thread;
use std::time::{Duration, Instant};

/// Source of frame callbacks
pub trait FrameHost {
    /// Block until the next frame is due; `false` ends the session
    fn request_frame(&mut self) -> bool;
}

/// Host pacing frames at a fixed rate with `thread::sleep`
#[derive(Debug, Clone)]
pub struct FixedRateHost {
    frame_duration: Option<Duration>,
    max_frames: Option<u64>,
    issued: u64,
    next_deadline: Option<Instant>,
}

impl FixedRateHost {
    /// Pace at `target_fps`; zero disables pacing
    pub fn new(target_fps: u32) -> Self {
        let frame_duration = (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(target_fps)));
        Self {
            frame_duration,
            max_frames: None,
            issued: 0,
            next_deadline: None,
        }
    }

    /// End the session after `max_frames` frames
    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Frames issued so far
    pub fn frames_issued(&self) -> u64 {
        self.issued
    }
}

impl FrameHost for FixedRateHost {
    fn request_frame(&mut self) -> bool {
        if self.max_frames.is_some_and(|max| self.issued >= max) {
            return false;
        }

        if let Some(frame_duration) = self.frame_duration {
            let now = Instant::now();
            match self.next_deadline {
                Some(deadline) if deadline > now => {
                    thread::sleep(deadline - now);
                    self.next_deadline = Some(deadline + frame_duration);
                }
                // First frame, or running behind: don't try to catch up
                _ => self.next_deadline = Some(now + frame_duration),
            }
        }

        self.issued += 1;
        true
    }
}

/// Host issuing a fixed number of frames without waiting
///
/// An optional hook runs before each frame is granted, typically to advance
/// a [`ManualTimeSource`](crate::foundation::time::ManualTimeSource).
pub struct ManualHost {
    remaining: u64,
    issued: u64,
    hook: Option<Box<dyn FnMut(u64)>>,
}

impl ManualHost {
    /// Grant exactly `frames` frames
    pub fn new(frames: u64) -> Self {
        Self {
            remaining: frames,
            issued: 0,
            hook: None,
        }
    }

    /// Run `hook` with the 1-based frame number before each frame
    pub fn on_frame(mut self, hook: impl FnMut(u64) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Frames issued so far
    pub fn frames_issued(&self) -> u64 {
        self.issued
    }
}

impl FrameHost for ManualHost {
    fn request_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.issued += 1;
        if let Some(hook) = self.hook.as_mut() {
            hook(self.issued);
        }
        true
    }
}

impl std::fmt::Debug for ManualHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualHost")
            .field("remaining", &self.remaining)
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}
