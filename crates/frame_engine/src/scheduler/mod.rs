//! Frame scheduler
//!
//! Drives the per-frame pipeline from host frame callbacks. Each tick runs,
//! in order:
//!
//! 1. clock read
//! 2. scene driver (the only writer of object transforms)
//! 3. uniform animation
//! 4. pick and highlight, when a pick source is configured
//! 5. shadow decals
//! 6. render
//! 7. frame statistics
//!
//! Every pass after the driver therefore sees the same object positions.

pub mod host;

pub use host::{FixedRateHost, FrameHost, ManualHost};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::foundation::time::{Clock, FrameStats};
use crate::picking::{HighlightPass, HitResult, RayPicker};
use crate::render::Renderer;
use crate::scene::SceneContext;
use crate::shadow::ShadowDecalSystem;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not currently driving frames
    Idle,
    /// Driving frames
    Running,
}

/// Timing of the frame being produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// 1-based frame number
    pub frame: u64,
    /// Seconds since the scheduler's clock started
    pub elapsed: f32,
    /// Seconds since the previous tick
    pub delta: f32,
}

/// External writer of object transforms, run once per tick
pub trait SceneDriver {
    /// Move tracked objects for this frame
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext);
}

impl<F> SceneDriver for F
where
    F: FnMut(&FrameContext, &mut SceneContext),
{
    fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
        self(frame, scene);
    }
}

/// Scheduler errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// `start` or `run` called while frames are already being driven
    #[error("Scheduler is already running")]
    AlreadyRunning,
}

/// Cloneable request to end a running session
///
/// A request stays pending until a run loop observes it: one made before
/// `run`, or after a loop has already ended, makes the next `run` return
/// at once. Observing the request clears it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the run loop to exit before its next frame
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop is pending
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Consume a pending request
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// Runs the frame pipeline
#[derive(Debug)]
pub struct FrameScheduler {
    clock: Clock,
    stats: FrameStats,
    state: SchedulerState,
    stop: StopHandle,
    last_elapsed: f32,
    picker: RayPicker,
    highlight: HighlightPass,
    shadows: ShadowDecalSystem,
}

impl FrameScheduler {
    /// Scheduler reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    /// Scheduler reading an explicit clock
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            stats: FrameStats::new(),
            state: SchedulerState::Idle,
            stop: StopHandle::default(),
            last_elapsed: 0.0,
            picker: RayPicker::new(),
            highlight: HighlightPass,
            shadows: ShadowDecalSystem::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Frame statistics so far
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Handle that ends [`run`](Self::run) from elsewhere, including another thread
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Enter the running state for host-driven ticking
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.state == SchedulerState::Running {
            return Err(SchedulerError::AlreadyRunning);
        }
        self.state = SchedulerState::Running;
        log::info!("Frame scheduler started");
        Ok(())
    }

    /// Leave the running state
    pub fn halt(&mut self) {
        if self.state == SchedulerState::Running {
            log::info!(
                "Frame scheduler stopped after {} frames ({:.1} fps average)",
                self.stats.frame_count(),
                self.stats.average_fps()
            );
        }
        self.state = SchedulerState::Idle;
    }

    /// Produce one frame
    pub fn tick(
        &mut self,
        scene: &mut SceneContext,
        driver: &mut dyn SceneDriver,
        renderer: &mut dyn Renderer,
    ) -> FrameContext {
        let elapsed = self.clock.elapsed();
        let frame = FrameContext {
            frame: self.stats.frame_count() + 1,
            elapsed,
            delta: (elapsed - self.last_elapsed).max(0.0),
        };
        self.last_elapsed = elapsed;

        driver.update(&frame, scene);

        scene.uniforms.tick(elapsed);

        if let Some(source) = &scene.pick_source {
            let hits = match source.resolve(&scene.camera) {
                Some((origin, direction)) => self.picker.pick(origin, direction, scene.objects.pickable(), &*renderer),
                None => HitResult::empty(),
            };
            self.highlight.apply(&hits, &scene.objects, &mut scene.tints, &scene.highlight);
            scene.last_hits = hits;
        }

        self.shadows.update(&scene.objects, &mut scene.decals, &scene.shadow);

        renderer.render(scene, &scene.camera);

        self.stats.record(elapsed);
        log::trace!("Frame {} at {:.3}s (dt {:.4}s)", frame.frame, frame.elapsed, frame.delta);
        frame
    }

    /// Tick once per host frame until the host ends or a stop is requested
    ///
    /// Returns the number of frames produced by this call.
    pub fn run(
        &mut self,
        scene: &mut SceneContext,
        driver: &mut dyn SceneDriver,
        host: &mut dyn FrameHost,
        renderer: &mut dyn Renderer,
    ) -> Result<u64, SchedulerError> {
        self.start()?;

        let mut ticks = 0;
        loop {
            if self.stop.take() {
                log::info!("Stop requested, leaving run loop");
                break;
            }
            if !host.request_frame() {
                break;
            }
            self.tick(scene, driver, renderer);
            ticks += 1;
        }

        self.halt();
        Ok(ticks)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MaterialHandle, MeshHandle};
    use crate::foundation::math::Vec3;
    use crate::foundation::time::ManualTimeSource;
    use crate::picking::PickSource;
    use crate::render::RecordingRenderer;
    use crate::scene::{Bounds, TrackedObject};
    use approx::assert_relative_eq;

    fn manual_scheduler() -> (FrameScheduler, ManualTimeSource) {
        let time = ManualTimeSource::new();
        (FrameScheduler::with_clock(Clock::with_source(time.clone())), time)
    }

    fn no_driver() -> impl FnMut(&FrameContext, &mut SceneContext) {
        |_: &FrameContext, _: &mut SceneContext| {}
    }

    #[test]
    fn test_tick_context() {
        let (mut scheduler, time) = manual_scheduler();
        let mut scene = SceneContext::new();
        let mut renderer = RecordingRenderer::new();
        let mut driver = no_driver();

        time.set(0.5);
        let first = scheduler.tick(&mut scene, &mut driver, &mut renderer);
        time.set(0.75);
        let second = scheduler.tick(&mut scene, &mut driver, &mut renderer);

        assert_eq!(first.frame, 1);
        assert_relative_eq!(first.delta, 0.5);
        assert_eq!(second.frame, 2);
        assert_relative_eq!(second.delta, 0.25);
        assert_eq!(renderer.frames_rendered(), 2);
        assert_eq!(scheduler.stats().frame_count(), 2);
    }

    #[test]
    fn test_passes_see_driver_positions() {
        let (mut scheduler, time) = manual_scheduler();
        let mut scene = SceneContext::new();
        let ball = scene.track(
            TrackedObject::new("ball", MeshHandle(1), MaterialHandle(1), Bounds::Sphere { radius: 0.5 })
                .with_position(Vec3::new(0.0, 3.0, 0.0)),
        );
        scene.pick_source = Some(PickSource::Fixed {
            origin: Vec3::new(-3.0, 0.0, 0.0),
            direction: Vec3::x(),
        });
        let mut renderer = RecordingRenderer::new();
        let mut driver = move |_: &FrameContext, scene: &mut SceneContext| {
            scene.objects.set_position(ball, Vec3::new(0.0, 0.0, 0.0));
        };

        time.set(0.1);
        scheduler.tick(&mut scene, &mut driver, &mut renderer);

        // Both pick and decal saw the moved ball in the same frame
        assert!(scene.last_hits.contains(ball));
        assert_eq!(scene.tints[ball], scene.highlight.hit_tint);
        assert_relative_eq!(scene.decals[ball].opacity, 0.42);
    }

    #[test]
    fn test_no_pick_source_leaves_tints() {
        let (mut scheduler, _) = manual_scheduler();
        let mut scene = SceneContext::new();
        let ball = scene.track(TrackedObject::new("ball", MeshHandle(1), MaterialHandle(1), Bounds::Sphere { radius: 0.5 }));
        let marker = crate::foundation::color::Color::from_hex(0x123456);
        scene.tints.insert(ball, marker);

        scheduler.tick(&mut scene, &mut no_driver(), &mut RecordingRenderer::new());

        assert_eq!(scene.tints[ball], marker);
        assert!(scene.last_hits.is_empty());
    }

    #[test]
    fn test_run_counts_ticks() {
        let (mut scheduler, time) = manual_scheduler();
        let mut scene = SceneContext::new();
        let mut renderer = RecordingRenderer::new();
        let mut host = ManualHost::new(4).on_frame(move |_| time.advance(1.0 / 60.0));

        let ticks = scheduler.run(&mut scene, &mut no_driver(), &mut host, &mut renderer).unwrap();

        assert_eq!(ticks, 4);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_stop_handle_ends_run() {
        let (mut scheduler, _) = manual_scheduler();
        let stop = scheduler.stop_handle();
        let mut scene = SceneContext::new();
        let mut renderer = RecordingRenderer::new();
        let mut host = ManualHost::new(100);
        let mut driver = move |frame: &FrameContext, _: &mut SceneContext| {
            if frame.frame == 3 {
                stop.stop();
            }
        };

        let ticks = scheduler.run(&mut scene, &mut driver, &mut host, &mut renderer).unwrap();

        assert_eq!(ticks, 3);
        assert!(!scheduler.stop_handle().is_stopped());
    }

    #[test]
    fn test_stop_before_run() {
        let (mut scheduler, _) = manual_scheduler();
        scheduler.stop_handle().stop();

        let ticks = scheduler
            .run(&mut SceneContext::new(), &mut no_driver(), &mut ManualHost::new(5), &mut RecordingRenderer::new())
            .unwrap();
        assert_eq!(ticks, 0);

        // The request was consumed; the next run proceeds
        let ticks = scheduler
            .run(&mut SceneContext::new(), &mut no_driver(), &mut ManualHost::new(5), &mut RecordingRenderer::new())
            .unwrap();
        assert_eq!(ticks, 5);
    }

    /// Host whose last frame request races with a stop from elsewhere
    struct StopOnExitHost {
        frames: u64,
        stop: StopHandle,
    }

    impl FrameHost for StopOnExitHost {
        fn request_frame(&mut self) -> bool {
            if self.frames == 0 {
                self.stop.stop();
                return false;
            }
            self.frames -= 1;
            true
        }
    }

    #[test]
    fn test_stop_after_host_ends_is_kept() {
        let (mut scheduler, _) = manual_scheduler();
        let mut host = StopOnExitHost { frames: 2, stop: scheduler.stop_handle() };

        let ticks = scheduler
            .run(&mut SceneContext::new(), &mut no_driver(), &mut host, &mut RecordingRenderer::new())
            .unwrap();
        assert_eq!(ticks, 2);
        assert!(scheduler.stop_handle().is_stopped());

        let ticks = scheduler
            .run(&mut SceneContext::new(), &mut no_driver(), &mut ManualHost::new(5), &mut RecordingRenderer::new())
            .unwrap();
        assert_eq!(ticks, 0);
        assert!(!scheduler.stop_handle().is_stopped());
    }

    #[test]
    fn test_start_twice_rejected() {
        let (mut scheduler, _) = manual_scheduler();
        scheduler.start().unwrap();

        assert_eq!(scheduler.start(), Err(SchedulerError::AlreadyRunning));
        let err = scheduler
            .run(&mut SceneContext::new(), &mut no_driver(), &mut ManualHost::new(1), &mut RecordingRenderer::new())
            .unwrap_err();
        assert_eq!(err, SchedulerError::AlreadyRunning);

        scheduler.halt();
        assert!(scheduler.start().is_ok());
    }
}
