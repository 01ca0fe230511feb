//! Per-session scene state
//!
//! Everything the frame pipeline reads or writes lives here and is passed
//! explicitly to each pass.

use std::cell::Cell;
use std::rc::Rc;

use slotmap::SecondaryMap;

use super::{ObjectId, ObjectSet, TrackedObject};
use crate::control::Shared;
use crate::foundation::color::Color;
use crate::picking::{HighlightStyle, HitResult, PickSource};
use crate::render::Camera;
use crate::shadow::{shadow_opacity, ShadowDecal, ShadowSettings, DECAL_EPSILON};
use crate::uniforms::UniformAnimator;

/// Default clear color, a dark neutral grey
pub const DEFAULT_CLEAR_COLOR: Color = Color::new(0.1, 0.1, 0.1);

/// Scene state for one session
#[derive(Debug)]
pub struct SceneContext {
    /// Tracked objects; the scene driver is their only position writer
    pub objects: ObjectSet,
    /// One decal per shadow-casting object
    pub decals: SecondaryMap<ObjectId, ShadowDecal>,
    /// Highlight tint per pickable object
    pub tints: SecondaryMap<ObjectId, Color>,
    /// Animated shader uniforms
    pub uniforms: UniformAnimator,
    /// Scene camera
    pub camera: Camera,
    /// Ray source for picking; no picking runs when unset
    pub pick_source: Option<PickSource>,
    /// Decal plane and falloff
    pub shadow: ShadowSettings,
    /// Highlight tints
    pub highlight: HighlightStyle,
    /// Clear color, shared so control callbacks can write it
    pub clear_color: Shared<Color>,
    /// Hits from the most recent pick
    pub last_hits: HitResult,
}

impl SceneContext {
    /// Empty scene with default settings
    pub fn new() -> Self {
        Self::with_settings(ShadowSettings::default(), HighlightStyle::default())
    }

    /// Empty scene with explicit shadow and highlight settings
    pub fn with_settings(shadow: ShadowSettings, highlight: HighlightStyle) -> Self {
        Self {
            objects: ObjectSet::new(),
            decals: SecondaryMap::new(),
            tints: SecondaryMap::new(),
            uniforms: UniformAnimator::new(),
            camera: Camera::default(),
            pick_source: None,
            shadow,
            highlight,
            clear_color: Rc::new(Cell::new(DEFAULT_CLEAR_COLOR)),
            last_hits: HitResult::empty(),
        }
    }

    /// Register an object, creating its decal and base tint as its flags require
    ///
    /// A new decal starts under the object with its opacity already
    /// computed, so the first rendered frame is consistent.
    pub fn track(&mut self, object: TrackedObject) -> ObjectId {
        let casts_shadow = object.casts_shadow();
        let pickable = object.is_pickable();
        let position = object.position;
        log::debug!("Tracking '{}' (flags {:?})", object.name, object.flags);

        let id = self.objects.insert(object);
        if casts_shadow {
            let mut decal = ShadowDecal::new(self.shadow.plane_y);
            decal.position.x = position.x;
            decal.position.z = position.z;
            decal.opacity = shadow_opacity(position.y, self.shadow.falloff);
            self.decals.insert(id, decal);
        }
        if pickable {
            self.tints.insert(id, self.highlight.base_tint);
        }
        id
    }

    /// Height at which decals are drawn
    pub fn decal_height(&self) -> f32 {
        self.shadow.plane_y + DECAL_EPSILON
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MaterialHandle, MeshHandle};
    use crate::foundation::math::Vec3;
    use crate::scene::{Bounds, ObjectFlags};
    use approx::assert_relative_eq;

    fn ball() -> TrackedObject {
        TrackedObject::new("ball", MeshHandle(1), MaterialHandle(1), Bounds::Sphere { radius: 0.5 })
    }

    #[test]
    fn test_track_creates_decal_and_tint() {
        let mut scene = SceneContext::new();
        let id = scene.track(ball().with_position(Vec3::new(1.0, 0.0, -2.0)));

        let decal = scene.decals[id];
        assert_relative_eq!(decal.position, Vec3::new(1.0, scene.decal_height(), -2.0));
        assert_relative_eq!(decal.opacity, 0.42);
        assert_eq!(scene.tints[id], scene.highlight.base_tint);
    }

    #[test]
    fn test_track_respects_flags() {
        let mut scene = SceneContext::new();
        let ground = scene.track(ball().with_flags(ObjectFlags::empty()));
        let sphere = scene.track(ball().with_flags(ObjectFlags::PICKABLE));

        assert!(!scene.decals.contains_key(ground));
        assert!(!scene.tints.contains_key(ground));
        assert!(!scene.decals.contains_key(sphere));
        assert!(scene.tints.contains_key(sphere));
        assert_eq!(scene.objects.len(), 2);
    }
}
