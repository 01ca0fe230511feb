//! Time management utilities
//!
//! The [`Clock`] is the frame loop's only notion of "now". It reads from a
//! pluggable [`TimeSource`] so tests and replays can drive time by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic timestamps relative to some fixed epoch
pub trait TimeSource {
    /// Current time since the source's epoch
    fn now(&self) -> Duration;
}

/// Wall-clock source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    epoch: Instant,
}

impl SystemTimeSource {
    /// Create a source whose epoch is the moment of construction
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-driven time source
///
/// Clones share the same underlying timestamp, so a test can keep one copy
/// and give another to the [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    /// Create a source starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `seconds`
    pub fn advance(&self, seconds: f32) {
        self.now.set(self.now.get() + Duration::from_secs_f32(seconds.max(0.0)));
    }

    /// Jump to an absolute timestamp
    pub fn set(&self, seconds: f32) {
        self.now.set(Duration::from_secs_f32(seconds.max(0.0)));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Monotonic elapsed-time source for the frame loop
///
/// Starts counting at construction and never resets. Readings never go
/// backwards, even if the underlying source does.
pub struct Clock {
    source: Box<dyn TimeSource>,
    start: Duration,
    last_elapsed: Cell<f32>,
}

impl Clock {
    /// Clock driven by the system's monotonic timer
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource::new())
    }

    /// Clock driven by an arbitrary time source
    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        let start = source.now();
        Self {
            source: Box::new(source),
            start,
            last_elapsed: Cell::new(0.0),
        }
    }

    /// Seconds since the clock was created
    pub fn elapsed(&self) -> f32 {
        let raw = self.source.now().saturating_sub(self.start).as_secs_f32();
        let elapsed = raw.max(self.last_elapsed.get());
        self.last_elapsed.set(elapsed);
        elapsed
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("last_elapsed", &self.last_elapsed.get())
            .finish_non_exhaustive()
    }
}

/// Per-frame timing statistics
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    last_elapsed: f32,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame observed at `elapsed` seconds; returns the delta
    pub fn record(&mut self, elapsed: f32) -> f32 {
        self.delta_time = (elapsed - self.last_elapsed).max(0.0);
        self.last_elapsed = elapsed;
        self.total_time = elapsed;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the previous frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the first frame
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}
