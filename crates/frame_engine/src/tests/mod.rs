//! Cross-module scenarios driven end to end through the engine
//!
//! Every scenario runs on a manual clock and a manual frame host so frame
//! timing is exact, and inspects what the recording renderer was handed.

mod lifecycle;
mod shadow_path;

use crate::engine::Engine;
use crate::config::EngineConfig;
use crate::foundation::time::{Clock, ManualTimeSource};
use crate::scheduler::ManualHost;

/// Engine on a manual clock, plus the handle that moves that clock
pub(crate) fn manual_engine(config: EngineConfig) -> (Engine, ManualTimeSource) {
    let time = ManualTimeSource::new();
    let engine = Engine::new(config).with_clock(Clock::with_source(time.clone()));
    (engine, time)
}

/// Host granting `frames` frames, advancing `time` by `dt` before each
pub(crate) fn stepping_host(time: &ManualTimeSource, frames: u64, dt: f32) -> ManualHost {
    let time = time.clone();
    ManualHost::new(frames).on_frame(move |_| time.advance(dt))
}
