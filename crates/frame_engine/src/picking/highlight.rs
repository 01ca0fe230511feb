//! Binary hover tint driven by the pick result
//!
//! Every pickable object is rewritten every time the pass runs: hit objects
//! get the hit tint, everything else the base tint. There is no diffing
//! against the previous frame, so an object leaving the ray can never keep a
//! stale tint.

use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use super::HitResult;
use crate::foundation::color::Color;
use crate::scene::{ObjectId, ObjectSet};

/// Tints applied by the highlight pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    /// Tint for objects not under the ray
    pub base_tint: Color,
    /// Tint for objects under the ray
    pub hit_tint: Color,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            base_tint: Color::from_hex(0xED3080),
            hit_tint: Color::from_hex(0xF7D5E0),
        }
    }
}

/// Applies [`HighlightStyle`] from a [`HitResult`]
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightPass;

impl HighlightPass {
    /// Overwrite the tint of every pickable object; returns how many are lit
    pub fn apply(
        &self,
        hits: &HitResult,
        objects: &ObjectSet,
        tints: &mut SecondaryMap<ObjectId, Color>,
        style: &HighlightStyle,
    ) -> usize {
        let mut lit = 0;
        for (id, _) in objects.pickable() {
            let tint = if hits.contains(id) {
                lit += 1;
                style.hit_tint
            } else {
                style.base_tint
            };
            tints.insert(id, tint);
        }
        lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{MaterialHandle, MeshHandle};
    use crate::foundation::math::Vec3;
    use crate::picking::{BoundsIntersector, RayPicker};
    use crate::scene::{Bounds, ObjectFlags, TrackedObject};

    fn ball(x: f32, y: f32) -> TrackedObject {
        TrackedObject::new("ball", MeshHandle(1), MaterialHandle(1), Bounds::Sphere { radius: 0.5 })
            .with_position(Vec3::new(x, y, 0.0))
    }

    #[test]
    fn test_full_overwrite_each_pass() {
        let mut objects = ObjectSet::new();
        let a = objects.insert(ball(-2.0, 0.0));
        let b = objects.insert(ball(2.0, 0.0));
        let style = HighlightStyle::default();
        let mut tints = SecondaryMap::new();
        let picker = RayPicker::new();

        let hits = picker.pick(Vec3::new(-3.0, 0.0, 0.0), Vec3::x(), objects.iter(), &BoundsIntersector);
        assert_eq!(HighlightPass.apply(&hits, &objects, &mut tints, &style), 2);
        assert_eq!(tints[a], style.hit_tint);
        assert_eq!(tints[b], style.hit_tint);

        // Ball b bobs out of the ray: it must revert, not keep the old tint
        objects.set_position(b, Vec3::new(2.0, 1.5, 0.0));
        let hits = picker.pick(Vec3::new(-3.0, 0.0, 0.0), Vec3::x(), objects.iter(), &BoundsIntersector);
        assert_eq!(HighlightPass.apply(&hits, &objects, &mut tints, &style), 1);
        assert_eq!(tints[a], style.hit_tint);
        assert_eq!(tints[b], style.base_tint);
    }

    #[test]
    fn test_non_pickable_objects_untouched() {
        let mut objects = ObjectSet::new();
        let ground = objects.insert(ball(0.0, -1.5).with_flags(ObjectFlags::empty()));
        let mut tints = SecondaryMap::new();

        HighlightPass.apply(&HitResult::empty(), &objects, &mut tints, &HighlightStyle::default());

        assert!(!tints.contains_key(ground));
    }
}
