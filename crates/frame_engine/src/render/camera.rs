//! # Perspective camera
//!
//! View and projection math for the scene camera, plus unprojection of
//! pointer positions into world-space pick rays.
//!
//! ## Coordinate System
//! - World and view space are right-handed and Y-up
//! - Clip space is Y-down with depth in [0, 1]; the flip is applied by
//!   [`Mat4Ext::vulkan_coordinate_transform`] between view and projection

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::picking::Ray;

/// Perspective camera with a look-at orientation
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// World-to-view transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection
    pub fn get_projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined view-projection: P × X × V
    ///
    /// - P = Perspective projection matrix
    /// - X = Y-down coordinate transform
    /// - V = View matrix (world to camera space)
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        let view_matrix = self.get_view_matrix();
        let coord_transform = Mat4::vulkan_coordinate_transform();
        let projection_matrix = self.get_projection_matrix();

        projection_matrix * coord_transform * view_matrix
    }

    /// Convert an NDC position to a world-space ray from the camera
    ///
    /// `ndc_x` runs -1 (left) to 1 (right), `ndc_y` runs -1 (top) to 1
    /// (bottom). Unprojects the point on the near (z = 0) and far (z = 1)
    /// planes and returns the ray from the camera through them. Returns
    /// `None` when the camera matrices are singular.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.get_view_projection_matrix().try_inverse()?;

        let unproject = |depth: f32| -> Option<Vec3> {
            let h = inv_view_proj * Vec4::new(ndc_x, ndc_y, depth, 1.0);
            (h.w.abs() > f32::EPSILON).then(|| Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w))
        };
        let world_near = unproject(0.0)?;
        let world_far = unproject(1.0)?;

        Ray::new(self.position, world_far - world_near).ok()
    }
}

impl Default for Camera {
    /// Camera above and behind the origin with a 45 degree field of view
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
