//! Rays and the bounding primitives they are tested against
//!
//! Provides the analytic ray-sphere and ray-box intersection routines used
//! by the default intersector.

use thiserror::Error;

use crate::foundation::math::{constants::DIRECTION_EPSILON, Vec3};

/// Errors raised while building a ray
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickError {
    /// Direction was zero, too short to normalize, or not finite
    #[error("Degenerate ray direction")]
    DegenerateRay,
}

/// A ray for ray casting and picking
///
/// The direction is always unit length; [`Ray::new`] is the only way to
/// build one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, PickError> {
        let length = direction.magnitude();
        if !length.is_finite() || length < DIRECTION_EPSILON || !origin.iter().all(|c| c.is_finite()) {
            return Err(PickError::DegenerateRay);
        }
        Ok(Self {
            origin,
            direction: direction / length,
        })
    }

    /// The origin point of the ray in world space
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// The unit direction of the ray
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A bounding sphere for picking
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Distance along the ray to the first forward intersection
    ///
    /// When the origin is inside the sphere the entry point lies behind the
    /// ray, so the exit point is reported instead.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin() - self.center;

        // Direction is unit length, so a == 1
        let b = oc.dot(&ray.direction());
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = -b - sqrt_discriminant;
        let t2 = -b + sqrt_discriminant;

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// An axis-aligned bounding box for picking
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl BoundingBox {
    /// Box centered on `center` extending `half_extents` along each axis
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test; same forward-only convention as [`BoundingSphere::intersect_ray`]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin()[axis];
            let direction = ray.direction()[axis];

            if direction.abs() < DIRECTION_EPSILON {
                // Parallel to this slab: must already be inside it
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_near > 0.0 {
            Some(t_near)
        } else if t_far > 0.0 {
            Some(t_far)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert_relative_eq!(ray.direction().magnitude(), 1.0);
        assert_relative_eq!(ray.point_at(2.0), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_directions_rejected() {
        assert_eq!(Ray::new(Vec3::zeros(), Vec3::zeros()), Err(PickError::DegenerateRay));
        assert_eq!(
            Ray::new(Vec3::zeros(), Vec3::new(f32::NAN, 1.0, 0.0)),
            Err(PickError::DegenerateRay)
        );
        assert_eq!(
            Ray::new(Vec3::new(f32::INFINITY, 0.0, 0.0), Vec3::x()),
            Err(PickError::DegenerateRay)
        );
    }

    #[test]
    fn test_sphere_hit_distance() {
        let ray = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::x()).unwrap();
        let sphere = BoundingSphere::new(Vec3::new(-2.0, 0.0, 0.0), 0.5);
        assert_relative_eq!(sphere.intersect_ray(&ray).unwrap(), 0.5, epsilon = 1.0e-5);
    }

    #[test]
    fn test_sphere_behind_ray_missed() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::x()).unwrap();
        let sphere = BoundingSphere::new(Vec3::zeros(), 0.5);
        assert!(sphere.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_sphere_origin_inside_reports_exit() {
        let ray = Ray::new(Vec3::zeros(), Vec3::x()).unwrap();
        let sphere = BoundingSphere::new(Vec3::zeros(), 0.5);
        assert_relative_eq!(sphere.intersect_ray(&ray).unwrap(), 0.5, epsilon = 1.0e-5);
    }

    #[test]
    fn test_box_hit_and_miss() {
        let cube = BoundingBox::from_center(Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.375, 0.375, 0.375));
        let hit = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::x()).unwrap();
        let miss = Ray::new(Vec3::new(-3.0, 1.0, 0.0), Vec3::x()).unwrap();

        assert_relative_eq!(cube.intersect_ray(&hit).unwrap(), 3.125, epsilon = 1.0e-5);
        assert!(cube.intersect_ray(&miss).is_none());
    }
}
