//! # Frame Engine
//!
//! A per-frame visual state pipeline for small interactive 3D scenes.
//!
//! ## Features
//!
//! - **Uniform Animation**: Time-driven shader uniforms with live overrides
//! - **Ray Picking**: Nearest-first hit testing with a binary hover tint
//! - **Fake Shadows**: Opacity-faded decals projected under moving objects
//! - **Live Controls**: Range-limited tuning values bound to uniforms or state
//! - **Headless Rendering**: A recording renderer for tests and replay
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frame_engine::prelude::*;
//!
//! struct Bobbing {
//!     ball: Option<ObjectId>,
//! }
//!
//! impl SceneDriver for Bobbing {
//!     fn update(&mut self, frame: &FrameContext, scene: &mut SceneContext) {
//!         if let Some(ball) = self.ball {
//!             scene.objects.set_position(ball, Vec3::new(0.0, frame.elapsed.sin(), 0.0));
//!         }
//!     }
//! }
//!
//! impl Application for Bobbing {
//!     fn setup(&mut self, ctx: &mut SetupContext<'_>) -> Result<(), AppError> {
//!         let mesh = ctx.assets.get_mesh("sphere")?;
//!         let material = ctx.assets.get_material("basic")?;
//!         let ball = TrackedObject::new("ball", mesh, material, Bounds::Sphere { radius: 0.5 });
//!         self.ball = Some(ctx.scene.track(ball));
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assets = AssetRegistry::new().with_mesh("sphere").with_material("basic");
//!     let mut app = Bobbing { ball: None };
//!     let mut host = FixedRateHost::new(60).with_max_frames(Some(120));
//!     let mut renderer = RecordingRenderer::new();
//!     Engine::run(EngineConfig::default(), &mut app, &assets, &mut host, &mut renderer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod control;
pub mod foundation;
pub mod picking;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod shadow;
pub mod uniforms;

mod application;
mod engine;

#[cfg(test)]
mod tests;

pub use application::{AppError, Application, SetupContext};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, AssetProvider, AssetRegistry, MaterialHandle, MeshHandle},
        config::{Config, EngineConfig, PickConfig},
        control::{shared, ControlBinding, ControlPanel, ControlSpec, ControlValue, LocalControlPanel, Shared},
        foundation::{color::Color, math::Vec3},
        picking::{HitResult, PickSource, PointerState},
        render::{Camera, RecordingRenderer, Renderer},
        scene::{Bounds, ObjectFlags, ObjectId, SceneContext, TrackedObject},
        scheduler::{FixedRateHost, FrameContext, FrameHost, ManualHost, SceneDriver},
        shadow::ShadowSettings,
        uniforms::{UniformBinding, UniformDomain, UniformHandle, UniformKey, UniformRule, UniformValue},
        AppError, Application, Engine, EngineError, SetupContext,
    };
}
