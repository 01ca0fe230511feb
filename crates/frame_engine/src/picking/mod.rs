//! Ray picking against the tracked object set
//!
//! Orchestrates the per-frame hit test: build a ray, ask the renderer's
//! intersection primitive about every candidate, and order the forward hits
//! nearest first.

pub mod highlight;
pub mod pointer;
pub mod ray;

pub use highlight::{HighlightPass, HighlightStyle};
pub use pointer::PointerState;
pub use ray::{PickError, Ray};

use crate::foundation::math::Vec3;
use crate::render::Camera;
use crate::scene::{ObjectId, TrackedObject};

/// Ray-object intersection primitive
///
/// Normally supplied by the renderer, which knows the real geometry.
pub trait Intersect {
    /// Distance along `ray` to `object`, or `None` when it is missed
    fn intersect(&self, ray: &Ray, object: &TrackedObject) -> Option<f32>;
}

/// Analytic intersector using each object's [`Bounds`](crate::scene::Bounds)
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsIntersector;

impl Intersect for BoundsIntersector {
    fn intersect(&self, ray: &Ray, object: &TrackedObject) -> Option<f32> {
        object.bounds.intersect_ray(object.position, ray)
    }
}

/// One object hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// The object that was hit
    pub object: ObjectId,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
}

/// Ordered outcome of a pick, nearest first
///
/// An empty result is a normal "nothing under the ray" answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitResult {
    hits: Vec<Hit>,
}

impl HitResult {
    /// Result with no hits
    pub fn empty() -> Self {
        Self::default()
    }

    /// Closest hit, if any
    pub fn nearest(&self) -> Option<&Hit> {
        self.hits.first()
    }

    /// Whether `object` was hit
    pub fn contains(&self, object: ObjectId) -> bool {
        self.hits.iter().any(|hit| hit.object == object)
    }

    /// Iterate hits nearest first
    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }

    /// Get number of hits
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether nothing was hit
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Where this frame's pick ray comes from
#[derive(Debug, Clone)]
pub enum PickSource {
    /// Fixed ray in world space
    Fixed {
        /// Ray origin
        origin: Vec3,
        /// Ray direction, normalized when the ray is built
        direction: Vec3,
    },
    /// Ray through the pointer position, unprojected by the camera
    Pointer(PointerState),
}

impl PickSource {
    /// Resolve the source into `(origin, direction)` for this frame
    ///
    /// Returns `None` when a pointer ray cannot be unprojected.
    pub fn resolve(&self, camera: &Camera) -> Option<(Vec3, Vec3)> {
        match self {
            Self::Fixed { origin, direction } => Some((*origin, *direction)),
            Self::Pointer(pointer) => {
                let (ndc_x, ndc_y) = pointer.screen_to_ndc()?;
                camera
                    .screen_to_world_ray(ndc_x, ndc_y)
                    .map(|ray| (ray.origin(), ray.direction()))
            }
        }
    }
}

/// Ray construction and nearest-hit ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct RayPicker;

impl RayPicker {
    /// Create a picker
    pub fn new() -> Self {
        Self
    }

    /// Cast a ray from `origin` along `direction` against `candidates`
    ///
    /// The direction is normalized first. A direction that cannot be
    /// normalized skips the pick and yields an empty result. Only finite,
    /// strictly positive distances count. Hits are ordered by distance;
    /// equal distances keep the candidates' input order.
    ///
    /// Ties are exact float equality, not an epsilon window. Treating
    /// near-equal distances as tied would let an earlier but slightly
    /// farther candidate sort ahead of a nearer one, and the result must
    /// stay non-decreasing in distance.
    pub fn pick<'a, I, X>(&self, origin: Vec3, direction: Vec3, candidates: I, intersector: &X) -> HitResult
    where
        I: IntoIterator<Item = (ObjectId, &'a TrackedObject)>,
        X: Intersect + ?Sized,
    {
        match Ray::new(origin, direction) {
            Ok(ray) => self.cast(&ray, candidates, intersector),
            Err(err) => {
                log::debug!("Skipping pick: {}", err);
                HitResult::empty()
            }
        }
    }

    /// Cast an already-built ray against `candidates`
    pub fn cast<'a, I, X>(&self, ray: &Ray, candidates: I, intersector: &X) -> HitResult
    where
        I: IntoIterator<Item = (ObjectId, &'a TrackedObject)>,
        X: Intersect + ?Sized,
    {
        let mut hits: Vec<Hit> = candidates
            .into_iter()
            .filter_map(|(id, object)| {
                intersector
                    .intersect(ray, object)
                    .filter(|distance| distance.is_finite() && *distance > 0.0)
                    .map(|distance| Hit { object: id, distance })
            })
            .collect();

        // Stable sort keeps input order for equal distances
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        log::trace!("Pick ray {:?} hit {} object(s)", ray.origin(), hits.len());
        HitResult { hits }
    }
}
