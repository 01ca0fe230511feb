//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::{AssetError, AssetProvider};
use crate::config::{ConfigError, EngineConfig};
use crate::control::ControlError;
use crate::scene::SceneContext;
use crate::scheduler::SceneDriver;
use crate::uniforms::UniformError;

/// What an application gets while assembling its scene
pub struct SetupContext<'a> {
    /// Scene to populate
    pub scene: &'a mut SceneContext,
    /// Resolves mesh and material names
    pub assets: &'a dyn AssetProvider,
    /// Session configuration
    pub config: &'a EngineConfig,
}

/// Application lifecycle trait
///
/// Implement this trait to build a scene on top of the frame pipeline. The
/// [`SceneDriver`] half is called every frame and is the only place object
/// transforms may change.
pub trait Application: SceneDriver {
    /// Assemble the scene
    ///
    /// Called once before the first frame. Register tracked objects, uniform
    /// bindings and controls here. Any error aborts the session before a
    /// frame is produced.
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError>;

    /// Called once after the last frame
    fn cleanup(&mut self, _scene: &mut SceneContext) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// A named asset could not be resolved
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Uniform registration failed
    #[error("Uniform error: {0}")]
    Uniform(#[from] UniformError),

    /// Control registration failed
    #[error("Control error: {0}")]
    Control(#[from] ControlError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
