//! Projected fake shadows
//!
//! Each shadow-casting object owns a flat decal lying just above a reference
//! plane. The decal follows the object in X/Z and fades as the object rises,
//! standing in for a real shadow map in simple "ball above ground" scenes.

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use crate::foundation::math::{utils, Vec3};
use crate::scene::{ObjectId, ObjectSet};

/// Lift above the reference plane that keeps the decal from z-fighting it
pub const DECAL_EPSILON: f32 = 0.01;

/// Per-scene shadow constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    /// Height of the plane the decals lie on
    pub plane_y: f32,
    /// Opacity falloff constant `k`
    pub falloff: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            plane_y: -1.5,
            falloff: 0.42,
        }
    }
}

/// Flat, opacity-modulated quad standing in for an object's shadow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDecal {
    /// Center of the quad in world space
    pub position: Vec3,
    /// Alpha in [0, 1]
    pub opacity: f32,
}

impl ShadowDecal {
    /// Decal resting on a plane at `plane_y`, fully transparent
    pub fn new(plane_y: f32) -> Self {
        Self {
            position: Vec3::new(0.0, plane_y + DECAL_EPSILON, 0.0),
            opacity: 0.0,
        }
    }
}

/// Decal opacity for an object at `height`: `clamp((1 - height) * falloff, 0, 1)`
///
/// Non-finite results collapse to fully transparent.
pub fn shadow_opacity(height: f32, falloff: f32) -> f32 {
    let raw = (1.0 - height) * falloff;
    if raw.is_nan() {
        return 0.0;
    }
    utils::clamp(raw, 0.0, 1.0)
}

/// Keeps every decal under its object
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowDecalSystem;

impl ShadowDecalSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    /// Reposition and refade every decal from its object's position
    ///
    /// Reads object positions only. Each decal depends on its own object
    /// alone, so the result is independent of iteration order and calling
    /// this twice with the same inputs leaves the same state.
    pub fn update(&self, objects: &ObjectSet, decals: &mut SecondaryMap<ObjectId, ShadowDecal>, settings: &ShadowSettings) {
        for (id, object) in objects.iter() {
            if !object.casts_shadow() {
                continue;
            }
            let Some(decal) = decals.get_mut(id) else {
                continue;
            };

            decal.position = Vec3::new(object.position.x, settings.plane_y + DECAL_EPSILON, object.position.z);
            decal.opacity = shadow_opacity(object.position.y, settings.falloff);
        }
    }
}
