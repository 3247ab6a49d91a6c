//! 3x3 matrix using the row-vector convention.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v * Mat3`
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! Rotation and scale live here; [`super::mat4::Mat4`] adds translation on top.

use std::ops::{Add, Mul, Sub};

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;

/// 3x3 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy)]
pub struct Mat3 {
    data: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    pub const fn new(data: [[f32; 3]; 3]) -> Self {
        Mat3 { data }
    }

    pub const fn identity() -> Self {
        Mat3::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Builds a matrix whose rows are the given vectors.
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Mat3::new([[r0.x, r0.y, r0.z], [r1.x, r1.y, r1.z], [r2.x, r2.y, r2.z]])
    }

    /// Builds a matrix whose columns are the given vectors.
    ///
    /// With row vectors, `v * from_cols(a, b, c)` yields `(v·a, v·b, v·c)`,
    /// i.e. projects `v` onto the three axes.
    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Mat3::from_rows(c0, c1, c2).transpose()
    }

    pub fn scaling(s: Vec3) -> Self {
        Mat3::new([[s.x, 0.0, 0.0], [0.0, s.y, 0.0], [0.0, 0.0, s.z]])
    }

    /// Rotation around the X axis (radians).
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]])
    }

    /// Rotation around the Y axis (radians).
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]])
    }

    /// Rotation around the Z axis (radians).
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat3::new([[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Euler rotation: roll (Z) is applied first, then pitch (X), then yaw (Y).
    pub fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        Mat3::rotation_z(roll) * Mat3::rotation_x(pitch) * Mat3::rotation_y(yaw)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    pub fn row(&self, row: usize) -> Vec3 {
        Vec3::new(self.data[row][0], self.data[row][1], self.data[row][2])
    }

    pub fn transpose(&self) -> Self {
        let m = &self.data;
        Mat3::new([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.data;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the inverse via the adjugate.
    /// Returns `None` if the matrix is singular (determinant is zero).
    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }

        let m = &self.data;
        let inv_det = 1.0 / det;
        Some(Mat3::new([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ]))
    }
}

impl PartialEq for Mat3 {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, super::EPSILON)
    }
}

impl AbsDiffEq for Mat3 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        super::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat3 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut result = [[0.0f32; 3]; 3];
        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }
        Mat3::new(result)
    }
}

impl Mul<f32> for Mat3 {
    type Output = Mat3;

    fn mul(mut self, rhs: f32) -> Mat3 {
        self.data.iter_mut().flatten().for_each(|v| *v *= rhs);
        self
    }
}

impl Add<Mat3> for Mat3 {
    type Output = Mat3;

    fn add(mut self, rhs: Mat3) -> Mat3 {
        for (a, b) in self.data.iter_mut().flatten().zip(rhs.data.iter().flatten()) {
            *a += b;
        }
        self
    }
}

impl Sub<Mat3> for Mat3 {
    type Output = Mat3;

    fn sub(mut self, rhs: Mat3) -> Mat3 {
        for (a, b) in self.data.iter_mut().flatten().zip(rhs.data.iter().flatten()) {
            *a -= b;
        }
        self
    }
}

/// Row vector times matrix.
impl Mul<Mat3> for Vec3 {
    type Output = Vec3;

    fn mul(self, m: Mat3) -> Vec3 {
        Vec3::new(
            self.x * m.data[0][0] + self.y * m.data[1][0] + self.z * m.data[2][0],
            self.x * m.data[0][1] + self.y * m.data[1][1] + self.z * m.data[2][1],
            self.x * m.data[0][2] + self.y * m.data[1][2] + self.z * m.data[2][2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_z_quarter_turn() {
        let v = Vec3::RIGHT * Mat3::rotation_z(FRAC_PI_2);
        assert_relative_eq!(v, Vec3::UP, epsilon = 1e-6);
    }

    #[test]
    fn inverse_of_singular_is_none() {
        let m = Mat3::from_rows(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0), Vec3::ONE);
        assert!(m.inverse().is_none());
    }

    #[test]
    fn inverse_times_self_is_identity() {
        let m = Mat3::yaw_pitch_roll(0.3, -0.7, 1.1) * Mat3::scaling(Vec3::new(2.0, 0.5, 3.0));
        let inv = m.inverse().expect("invertible");
        assert_relative_eq!(m * inv, Mat3::identity(), epsilon = 1e-5);
    }

    #[test]
    fn rotations_preserve_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let r = Mat3::yaw_pitch_roll(
                rng.gen_range(-6.3..6.3),
                rng.gen_range(-6.3..6.3),
                rng.gen_range(-6.3..6.3),
            );
            let v = Vec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            assert_relative_eq!((v * r).length(), v.length(), max_relative = 1e-4);
        }
    }

    #[test]
    fn from_cols_projects_onto_axes() {
        let m = Mat3::from_cols(Vec3::RIGHT, Vec3::UP, Vec3::FORWARD);
        assert_eq!(m, Mat3::identity());
        let v = Vec3::new(1.0, 2.0, 3.0) * Mat3::from_cols(Vec3::UP, Vec3::FORWARD, Vec3::RIGHT);
        assert_eq!(v, Vec3::new(2.0, 3.0, 1.0));
    }
}
