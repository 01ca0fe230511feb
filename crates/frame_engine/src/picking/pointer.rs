//! Pointer state for picking operations
//!
//! Converts screen-space pointer coordinates to Normalized Device
//! Coordinates (NDC) so the camera can unproject a pick ray.

/// Pointer position and the viewport it lives in
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    /// Current screen-space X position (pixels)
    pub screen_x: f64,
    /// Current screen-space Y position (pixels)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
}

impl PointerState {
    /// Create a pointer resting in the top-left corner of the viewport
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            viewport_width,
            viewport_height,
        }
    }

    /// Convert screen coordinates to NDC
    ///
    /// NDC range: [-1, 1] where:
    /// - X: -1 = left, +1 = right
    /// - Y: -1 = top, +1 = bottom
    ///
    /// Returns `None` for an empty viewport.
    pub fn screen_to_ndc(&self) -> Option<(f32, f32)> {
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return None;
        }
        let ndc_x = (self.screen_x / f64::from(self.viewport_width)) as f32 * 2.0 - 1.0;
        let ndc_y = (self.screen_y / f64::from(self.viewport_height)) as f32 * 2.0 - 1.0;
        Some((ndc_x, ndc_y))
    }

    /// Update pointer position from host input events
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.screen_x = x;
        self.screen_y = y;
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_screen_to_ndc_center() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.update_position(960.0, 540.0);

        let (ndc_x, ndc_y) = pointer.screen_to_ndc().unwrap();
        assert_relative_eq!(ndc_x, 0.0, epsilon = 0.001);
        assert_relative_eq!(ndc_y, 0.0, epsilon = 0.001);
    }

    #[test]
    fn test_screen_to_ndc_corners() {
        let pointer = PointerState::new(1920, 1080);

        let (ndc_x, ndc_y) = pointer.screen_to_ndc().unwrap();
        assert_relative_eq!(ndc_x, -1.0, epsilon = 0.001); // Left edge
        assert_relative_eq!(ndc_y, -1.0, epsilon = 0.001); // Top edge
    }

    #[test]
    fn test_empty_viewport() {
        let pointer = PointerState::new(0, 1080);
        assert!(pointer.screen_to_ndc().is_none());
    }
}
