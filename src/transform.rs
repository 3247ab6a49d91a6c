//! Object placement: position, Euler rotation and scale.
//!
//! [`Transform`] has a fluent API and produces the row-vector object-to-world
//! matrix consumed by [`crate::renderlist::RenderList::append_mesh`].

use crate::math::{Mat3, Mat4, Vec3};

/// Position, rotation (Euler angles) and scale of a mesh instance.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```
/// use softrend::transform::Transform;
///
/// let mut transform = Transform::new();
/// transform.set_position_xyz(0.0, 0.0, 20.0).rotate_y(0.1).set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // radians: x = pitch, y = yaw, z = roll
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.set_position(Vec3::new(x, y, z))
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position += delta;
        self
    }

    /// Euler angles in radians (x = pitch, y = yaw, z = roll).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation += delta;
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotate(Vec3::new(angle, 0.0, 0.0))
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotate(Vec3::new(0.0, angle, 0.0))
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotate(Vec3::new(0.0, 0.0, angle))
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.set_scale(Vec3::new(s, s, s))
    }

    /// Object-to-world matrix.
    ///
    /// Row-vector order: scale, then roll, pitch and yaw, then translation.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_parts(Mat3::scaling(self.scale) * self.rotation_matrix(), self.position)
    }

    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_fluent_api() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0)
            .rotate_y(0.5)
            .set_scale_uniform(2.0)
            .translate(Vec3::RIGHT);

        assert_eq!(t.position(), Vec3::new(2.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_to_matrix_scales_before_translating() {
        let mut t = Transform::new();
        t.set_position_xyz(0.0, 0.0, 10.0).set_scale_uniform(2.0);
        assert_eq!(Vec3::new(1.0, 1.0, 1.0) * t.to_matrix(), Vec3::new(2.0, 2.0, 12.0));
    }

    #[test]
    fn test_yaw_turns_forward_toward_right() {
        let mut t = Transform::new();
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        let v = Vec3::FORWARD * t.to_matrix();
        assert_relative_eq!(v, Vec3::RIGHT, epsilon = 1e-6);
    }
}
