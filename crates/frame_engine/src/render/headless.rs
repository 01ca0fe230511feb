//! Headless renderer that records what it was asked to draw

use std::collections::VecDeque;

use super::{Camera, Renderer};
use crate::foundation::color::Color;
use crate::foundation::math::Vec3;
use crate::picking::{BoundsIntersector, Intersect, Ray};
use crate::scene::{ObjectId, SceneContext, TrackedObject};
use crate::shadow::ShadowDecal;
use crate::uniforms::{UniformKey, UniformValue};

/// Visual state of one tracked object as handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    /// Object identity
    pub id: ObjectId,
    /// Object name
    pub name: String,
    /// World position
    pub position: Vec3,
    /// Highlight tint, for pickable objects
    pub tint: Option<Color>,
    /// Shadow decal, for shadow casters
    pub decal: Option<ShadowDecal>,
}

/// Everything a renderer would have drawn for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    /// 1-based index of the rendered frame
    pub frame: u64,
    /// Clear color
    pub clear_color: Color,
    /// Camera position
    pub camera_position: Vec3,
    /// Objects in registration order
    pub objects: Vec<ObjectSnapshot>,
    /// Uniform values in registration order
    pub uniforms: Vec<(UniformKey, UniformValue)>,
}

impl FrameSnapshot {
    /// Find an object by name
    pub fn object(&self, name: &str) -> Option<&ObjectSnapshot> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Find a uniform value by name, across materials
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms
            .iter()
            .find(|(key, _)| key.name == name)
            .map(|(_, value)| *value)
    }
}

/// Renderer that keeps snapshots instead of drawing
///
/// Used by tests and by the demo binaries when no display is attached.
#[derive(Debug)]
pub struct RecordingRenderer<X = BoundsIntersector> {
    intersector: X,
    frames: u64,
    history: VecDeque<FrameSnapshot>,
    history_limit: usize,
}

impl RecordingRenderer {
    /// Recorder using analytic bounds for picking, keeping only the last frame
    pub fn new() -> Self {
        Self::with_intersector(BoundsIntersector)
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<X: Intersect> RecordingRenderer<X> {
    /// Recorder with a custom intersection primitive
    pub fn with_intersector(intersector: X) -> Self {
        Self {
            intersector,
            frames: 0,
            history: VecDeque::new(),
            history_limit: 1,
        }
    }

    /// Keep up to `limit` most recent frames
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Number of frames rendered so far
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Most recent frame
    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.history.back()
    }

    /// Retained frames, oldest first
    pub fn history(&self) -> impl Iterator<Item = &FrameSnapshot> {
        self.history.iter()
    }
}

impl<X: Intersect> Intersect for RecordingRenderer<X> {
    fn intersect(&self, ray: &Ray, object: &TrackedObject) -> Option<f32> {
        self.intersector.intersect(ray, object)
    }
}

impl<X: Intersect> Renderer for RecordingRenderer<X> {
    fn render(&mut self, scene: &SceneContext, camera: &Camera) {
        self.frames += 1;

        let objects = scene
            .objects
            .iter()
            .map(|(id, object)| ObjectSnapshot {
                id,
                name: object.name.clone(),
                position: object.position,
                tint: scene.tints.get(id).copied(),
                decal: scene.decals.get(id).copied(),
            })
            .collect();

        let snapshot = FrameSnapshot {
            frame: self.frames,
            clear_color: scene.clear_color.get(),
            camera_position: camera.position,
            objects,
            uniforms: scene.uniforms.snapshot(),
        };
        log::trace!(
            "Recorded frame {} ({} objects, {} uniforms)",
            snapshot.frame,
            snapshot.objects.len(),
            snapshot.uniforms.len()
        );

        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MaterialHandle, MeshHandle};
    use crate::scene::Bounds;

    #[test]
    fn test_records_scene_state() {
        let mut scene = SceneContext::new();
        scene.track(TrackedObject::new("ball", MeshHandle(1), MaterialHandle(1), Bounds::Sphere { radius: 0.5 }));
        scene.clear_color.set(Color::from_hex(0x201919));
        let mut renderer = RecordingRenderer::new();

        let camera = scene.camera.clone();
        renderer.render(&scene, &camera);

        let frame = renderer.last_frame().unwrap();
        assert_eq!(frame.frame, 1);
        assert_eq!(frame.clear_color, Color::from_hex(0x201919));
        let ball = frame.object("ball").unwrap();
        assert!(ball.decal.is_some());
        assert!(ball.tint.is_some());
    }

    #[test]
    fn test_history_limit() {
        let scene = SceneContext::new();
        let mut renderer = RecordingRenderer::new().with_history(3);

        for _ in 0..5 {
            renderer.render(&scene, &scene.camera);
        }

        let frames: Vec<_> = renderer.history().map(|f| f.frame).collect();
        assert_eq!(frames, [3, 4, 5]);
        assert_eq!(renderer.frames_rendered(), 5);
    }
}
