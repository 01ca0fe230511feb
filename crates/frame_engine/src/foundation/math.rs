//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the frame pipeline.

pub use nalgebra::{Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Smallest vector length treated as a usable direction
    pub const DIRECTION_EPSILON: f32 = 1.0e-6;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value between min and max
    ///
    /// NaN collapses to `min` so a broken input can never leak out of range.
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        if value.is_nan() || value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Create a perspective projection matrix with depth mapped to [0, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// Flip Y and Z so view space lines up with a Y-down, Z-forward clip space
    fn vulkan_coordinate_transform() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;

        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn vulkan_coordinate_transform() -> Mat4 {
        Mat4::new(
            1.0,  0.0,  0.0, 0.0,
            0.0, -1.0,  0.0, 0.0,
            0.0,  0.0, -1.0, 0.0,
            0.0,  0.0,  0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(utils::clamp(f32::NAN, 0.0, 1.0), 0.0);
        assert_eq!(utils::clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(utils::clamp(-2.0, 0.0, 1.0), 0.0);
        assert_eq!(utils::clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_perspective_depth_range() {
        let projection = Mat4::perspective(utils::deg_to_rad(75.0), 1.0, 0.1, 100.0);

        // Points on the near and far planes (Z forward after the coordinate flip)
        let near = projection * Vec4::new(0.0, 0.0, 0.1, 1.0);
        let far = projection * Vec4::new(0.0, 0.0, 100.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let eye = Vec3::new(1.0, 1.0, 5.0);
        let view = Mat4::look_at(eye, Vec3::zeros(), Vec3::y());
        let transformed = view * Vec4::new(eye.x, eye.y, eye.z, 1.0);

        assert_relative_eq!(transformed.x, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(transformed.y, 0.0, epsilon = 1.0e-5);
        assert_relative_eq!(transformed.z, 0.0, epsilon = 1.0e-5);
    }
}
