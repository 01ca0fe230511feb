//! Rendering seam
//!
//! The pipeline never draws anything itself. Once per tick it hands the
//! finished [`SceneContext`] to a [`Renderer`], which also supplies the
//! ray-object intersection primitive used for picking.

pub mod camera;
pub mod headless;

pub use camera::Camera;
pub use headless::{FrameSnapshot, ObjectSnapshot, RecordingRenderer};

pub use crate::picking::Intersect;
use crate::scene::SceneContext;

/// External renderer driven once per tick
pub trait Renderer: Intersect {
    /// Draw the scene as seen from `camera`
    fn render(&mut self, scene: &SceneContext, camera: &Camera);
}
