//! Core engine implementation
//!
//! Composes a session: scene from config, application setup, the frame
//! loop, then cleanup.

use thiserror::Error;

use crate::application::{AppError, Application, SetupContext};
use crate::assets::AssetProvider;
use crate::config::{ConfigError, EngineConfig};
use crate::foundation::time::Clock;
use crate::render::Renderer;
use crate::scene::SceneContext;
use crate::scheduler::{FrameHost, FrameScheduler, SchedulerError, StopHandle};

/// Main engine struct
///
/// Owns the scheduler for one session.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    scheduler: FrameScheduler,
}

impl Engine {
    /// Create an engine reading the system clock
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scheduler: FrameScheduler::new(),
        }
    }

    /// Replace the clock, e.g. with a manual one for replay
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.scheduler = FrameScheduler::with_clock(clock);
        self
    }

    /// Handle that stops the session from elsewhere
    pub fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    /// Session configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a session with a default engine; returns the number of frames produced
    pub fn run<A: Application>(
        config: EngineConfig,
        app: &mut A,
        assets: &dyn AssetProvider,
        host: &mut dyn FrameHost,
        renderer: &mut dyn Renderer,
    ) -> Result<u64, EngineError> {
        Self::new(config).execute(app, assets, host, renderer)
    }

    /// Run a session on this engine; returns the number of frames produced
    pub fn execute<A: Application>(
        &mut self,
        app: &mut A,
        assets: &dyn AssetProvider,
        host: &mut dyn FrameHost,
        renderer: &mut dyn Renderer,
    ) -> Result<u64, EngineError> {
        log::info!("Initializing engine...");
        self.config.validate()?;

        let mut scene = self.build_scene();
        {
            let mut ctx = SetupContext {
                scene: &mut scene,
                assets,
                config: &self.config,
            };
            app.setup(&mut ctx).map_err(|e| {
                log::error!("Application setup failed: {}", e);
                EngineError::Application(e)
            })?;
        }
        log::info!(
            "Scene ready: {} objects, {} decals, {} uniforms",
            scene.objects.len(),
            scene.decals.len(),
            scene.uniforms.len()
        );

        log::info!("Starting main loop...");
        let result = self.scheduler.run(&mut scene, &mut *app, host, renderer);

        app.cleanup(&mut scene);
        log::info!("Engine shutdown complete");

        Ok(result?)
    }

    fn build_scene(&self) -> SceneContext {
        let mut scene = SceneContext::with_settings(self.config.shadow, self.config.highlight);
        scene.camera = self.config.camera.build();
        scene.pick_source = self.config.pick.map(Into::into);
        scene.clear_color.set(self.config.clear_color);
        scene
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application failed
    #[error("Application error: {0}")]
    Application(#[from] AppError),

    /// Frame loop could not start
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}
