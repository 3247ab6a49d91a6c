//! Perspective projection parameters.
//!
//! [`Projection`] is the single source of truth for field of view, aspect ratio
//! and clip planes. The view plane is normalized to a width of 2, so the view
//! distance follows from the horizontal field of view alone:
//!
//! ```text
//!            view plane (width 2)
//!        -1 ----------+---------- +1
//!            \        |        /
//!             \       | d     /
//!              \      |      /     d = 1 / tan(fov / 2)
//!               \     |     /
//!                \____|____/
//!                  fov / 2
//!                   eye
//! ```

use crate::error::{RenderError, Result};
use crate::math::Mat4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Horizontal field of view in radians.
    fov: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    /// Near clipping plane distance.
    z_near: f32,
    /// Far clipping plane distance.
    z_far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_degrees(90.0, 4.0 / 3.0, 5.0, 15000.0)
    }
}

impl Projection {
    /// Creates a new projection. Call [`Projection::validate`] before use if the
    /// values come from outside.
    ///
    /// # Arguments
    /// * `fov` - Horizontal field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn new(fov: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a projection from degrees instead of radians.
    pub fn from_degrees(fov_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(fov_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Checks `0 < fov < π`, `0 < near < far` and a positive aspect ratio.
    pub fn validate(&self) -> Result<()> {
        if !(self.fov > 0.0 && self.fov < std::f32::consts::PI) {
            return Err(RenderError::InvalidConfig(format!(
                "field of view {} rad is outside (0, π)",
                self.fov
            )));
        }
        if !(self.z_near > 0.0 && self.z_far > self.z_near) {
            return Err(RenderError::InvalidConfig(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                self.z_near, self.z_far
            )));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "aspect ratio {} must be positive",
                self.aspect_ratio
            )));
        }
        Ok(())
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) {
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// Updates the aspect ratio (typically called on window resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn view_plane_width(&self) -> f32 {
        2.0
    }

    pub fn view_plane_height(&self) -> f32 {
        2.0 / self.aspect_ratio
    }

    /// Distance from the eye to the view plane.
    pub fn view_distance(&self) -> f32 {
        0.5 * self.view_plane_width() / (0.5 * self.fov).tan()
    }

    /// Row-vector projection matrix.
    ///
    /// Maps camera-space `(x, y, z)` to `(d·x, d·a·y, 1, z)`, so the divide by w
    /// yields `(d·x/z, d·a·y/z, 1/z)`: normalized device x/y in `[-1, 1]` and
    /// reciprocal depth in z.
    pub fn matrix(&self) -> Mat4 {
        let d = self.view_distance();
        Mat4::new([
            [d, 0.0, 0.0, 0.0],
            [0.0, d * self.aspect_ratio, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn ninety_degrees_puts_view_plane_at_one() {
        let proj = Projection::from_degrees(90.0, 1.0, 1.0, 100.0);
        assert_relative_eq!(proj.view_distance(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_plane_height_follows_aspect() {
        let proj = Projection::from_degrees(90.0, 2.0, 1.0, 100.0);
        assert_relative_eq!(proj.view_plane_height(), 1.0);
    }

    #[test]
    fn matrix_stores_reciprocal_depth() {
        let proj = Projection::from_degrees(90.0, 1.0, 1.0, 100.0);
        let p = Vec3::new(4.0, -2.0, 8.0) * proj.matrix();
        assert_relative_eq!(p, Vec3::new(0.5, -0.25, 0.125), epsilon = 1e-6);
    }

    #[test]
    fn validate_rejects_bad_planes_and_fov() {
        assert!(Projection::from_degrees(90.0, 1.0, 10.0, 5.0).validate().is_err());
        assert!(Projection::from_degrees(90.0, 1.0, 0.0, 5.0).validate().is_err());
        assert!(Projection::from_degrees(200.0, 1.0, 1.0, 5.0).validate().is_err());
        assert!(Projection::default().validate().is_ok());
    }
}
