//! Shared plumbing for the demo binaries
//!
//! Every demo runs headless: frames are paced by a [`FixedRateHost`] and
//! handed to a [`RecordingRenderer`], and the final frame is summarized in
//! the log.

use frame_engine::config::ConfigError;
use frame_engine::prelude::*;
use thiserror::Error;

/// Demo-level errors
#[derive(Error, Debug)]
pub enum DemoError {
    /// Config file could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Session failed
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Initialize logging the way every demo does
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Config from the path given as first argument, or `default`
pub fn load_config(default: EngineConfig) -> Result<EngineConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            Ok(EngineConfig::load_from_file(&path)?)
        }
        None => Ok(default),
    }
}

/// Run `app` headless and log what the last frame looked like
pub fn run_headless<A: Application>(
    config: EngineConfig,
    app: &mut A,
    assets: &AssetRegistry,
) -> Result<u64, DemoError> {
    let mut host = FixedRateHost::new(config.frame.target_fps).with_max_frames(config.frame.max_frames);
    let mut renderer = RecordingRenderer::new();

    let frames = Engine::run(config, app, assets, &mut host, &mut renderer)?;

    if let Some(frame) = renderer.last_frame() {
        log::info!("Last frame #{} (clear {})", frame.frame, frame.clear_color);
        for object in &frame.objects {
            log::info!(
                "  {:<10} at ({:6.2}, {:6.2}, {:6.2}) tint {} shadow {}",
                object.name,
                object.position.x,
                object.position.y,
                object.position.z,
                object.tint.map_or_else(|| "-".to_string(), |tint| tint.to_string()),
                object.decal.map_or_else(|| "-".to_string(), |decal| format!("{:.2}", decal.opacity)),
            );
        }
        for (key, value) in &frame.uniforms {
            log::info!("  uniform {} = {:?}", key, value);
        }
    }
    Ok(frames)
}
