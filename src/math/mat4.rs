//! 4x4 affine/projective matrix using the row-vector convention.
//!
//! # Convention
//! - Vectors are **row vectors** on the left: `v * Mat4`
//! - Translation is stored in the **last row**
//! - Transforms chain **left-to-right**: `v * A * B` applies A first, then B
//!
//! # Example
//! ```
//! use softrend::math::{Mat4, Vec3};
//!
//! let transform = Mat4::scaling(Vec3::ONE * 2.0) * Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
//! let p = Vec3::new(1.0, 1.0, 1.0) * transform; // scaled first, then translated
//! assert_eq!(p, Vec3::new(3.0, 2.0, 2.0));
//! ```

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::mat3::Mat3;
use super::vec3::Vec3;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Affine matrix from a linear part and a translation (applied after it).
    pub fn from_parts(linear: Mat3, translation: Vec3) -> Self {
        let mut m = Mat4::identity();
        for row in 0..3 {
            for col in 0..3 {
                m.data[row][col] = linear.get(row, col);
            }
        }
        m.data[3][0] = translation.x;
        m.data[3][1] = translation.y;
        m.data[3][2] = translation.z;
        m
    }

    /// Creates a translation matrix. Translation is stored in the last row.
    pub fn translation(t: Vec3) -> Self {
        Mat4::from_parts(Mat3::identity(), t)
    }

    pub fn scaling(s: Vec3) -> Self {
        Mat4::from_parts(Mat3::scaling(s), Vec3::ZERO)
    }

    pub fn rotation_x(angle: f32) -> Self {
        Mat4::from_parts(Mat3::rotation_x(angle), Vec3::ZERO)
    }

    pub fn rotation_y(angle: f32) -> Self {
        Mat4::from_parts(Mat3::rotation_y(angle), Vec3::ZERO)
    }

    pub fn rotation_z(angle: f32) -> Self {
        Mat4::from_parts(Mat3::rotation_z(angle), Vec3::ZERO)
    }

    /// The upper-left 3x3 block (rotation and scale).
    pub fn linear(&self) -> Mat3 {
        let m = &self.data;
        Mat3::new([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// The translation row.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.data[3][0], self.data[3][1], self.data[3][2])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (row, cells) in out.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.data[col][row];
            }
        }
        Mat4::new(out)
    }

    /// Transforms a direction (w = 0): translation and projection are ignored.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        v * self.linear()
    }

    /// Computes the inverse from the 2x2 sub-determinants of the top and bottom
    /// row pairs. Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let a = &self.data;

        let s0 = a[0][0] * a[1][1] - a[1][0] * a[0][1];
        let s1 = a[0][0] * a[1][2] - a[1][0] * a[0][2];
        let s2 = a[0][0] * a[1][3] - a[1][0] * a[0][3];
        let s3 = a[0][1] * a[1][2] - a[1][1] * a[0][2];
        let s4 = a[0][1] * a[1][3] - a[1][1] * a[0][3];
        let s5 = a[0][2] * a[1][3] - a[1][2] * a[0][3];

        let c5 = a[2][2] * a[3][3] - a[3][2] * a[2][3];
        let c4 = a[2][1] * a[3][3] - a[3][1] * a[2][3];
        let c3 = a[2][1] * a[3][2] - a[3][1] * a[2][2];
        let c2 = a[2][0] * a[3][3] - a[3][0] * a[2][3];
        let c1 = a[2][0] * a[3][2] - a[3][0] * a[2][2];
        let c0 = a[2][0] * a[3][1] - a[3][0] * a[2][1];

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let k = 1.0 / det;

        Some(Mat4::new([
            [
                (a[1][1] * c5 - a[1][2] * c4 + a[1][3] * c3) * k,
                (-a[0][1] * c5 + a[0][2] * c4 - a[0][3] * c3) * k,
                (a[3][1] * s5 - a[3][2] * s4 + a[3][3] * s3) * k,
                (-a[2][1] * s5 + a[2][2] * s4 - a[2][3] * s3) * k,
            ],
            [
                (-a[1][0] * c5 + a[1][2] * c2 - a[1][3] * c1) * k,
                (a[0][0] * c5 - a[0][2] * c2 + a[0][3] * c1) * k,
                (-a[3][0] * s5 + a[3][2] * s2 - a[3][3] * s1) * k,
                (a[2][0] * s5 - a[2][2] * s2 + a[2][3] * s1) * k,
            ],
            [
                (a[1][0] * c4 - a[1][1] * c2 + a[1][3] * c0) * k,
                (-a[0][0] * c4 + a[0][1] * c2 - a[0][3] * c0) * k,
                (a[3][0] * s4 - a[3][1] * s2 + a[3][3] * s0) * k,
                (-a[2][0] * s4 + a[2][1] * s2 - a[2][3] * s0) * k,
            ],
            [
                (-a[1][0] * c3 + a[1][1] * c1 - a[1][2] * c0) * k,
                (a[0][0] * c3 - a[0][1] * c1 + a[0][2] * c0) * k,
                (-a[3][0] * s3 + a[3][1] * s1 - a[3][2] * s0) * k,
                (a[2][0] * s3 - a[2][1] * s1 + a[2][2] * s0) * k,
            ],
        ]))
    }
}

impl PartialEq for Mat4 {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, super::EPSILON)
    }
}

impl AbsDiffEq for Mat4 {
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

impl RelativeEq for Mat4 {
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

/// Matrix multiplication: `v * (A * B) == (v * A) * B`.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a point: `Vec3 * Mat4` (treats the vector as a row with w=1).
///
/// Applies the perspective divide when the resulting w is neither 0 nor 1.
impl Mul<Mat4> for Vec3 {
    type Output = Vec3;

    fn mul(self, m: Mat4) -> Vec3 {
        let d = &m.data;
        let x = self.x * d[0][0] + self.y * d[1][0] + self.z * d[2][0] + d[3][0];
        let y = self.x * d[0][1] + self.y * d[1][1] + self.z * d[2][1] + d[3][1];
        let z = self.x * d[0][2] + self.y * d[1][2] + self.z * d[2][2] + d[3][2];
        let w = self.x * d[0][3] + self.y * d[1][3] + self.z * d[2][3] + d[3][3];

        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_affine(rng: &mut ChaCha8Rng) -> Mat4 {
        let rotation = Mat3::yaw_pitch_roll(
            rng.gen_range(-3.1..3.1),
            rng.gen_range(-3.1..3.1),
            rng.gen_range(-3.1..3.1),
        );
        let scale = Mat3::scaling(Vec3::new(
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
        ));
        let translation = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        Mat4::from_parts(scale * rotation, translation)
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3::ZERO * m, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector(Vec3::RIGHT), Vec3::RIGHT);
    }

    #[test]
    fn multiplication_applies_left_first() {
        let t = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        let r = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        // translate to (1,0,0), then rotate a quarter turn to (0,1,0)
        assert_relative_eq!(Vec3::ZERO * (t * r), Vec3::UP, epsilon = 1e-6);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat4::scaling(Vec3::new(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn inverse_times_self_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let m = random_affine(&mut rng);
            let inv = m.inverse().expect("affine matrices with non-zero scale are invertible");
            assert_relative_eq!(m * inv, Mat4::identity(), epsilon = 1e-4);
        }
    }

    #[test]
    fn inverse_of_product_is_reversed_product_of_inverses() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let a = random_affine(&mut rng);
            let b = random_affine(&mut rng);
            let lhs = (a * b).inverse().expect("invertible");
            let rhs = b.inverse().expect("invertible") * a.inverse().expect("invertible");
            assert_relative_eq!(lhs, rhs, epsilon = 1e-3, max_relative = 1e-3);
        }
    }

    #[test]
    fn projective_row_divides_by_w() {
        let mut m = Mat4::identity();
        m.set(2, 3, 1.0);
        m.set(3, 3, 0.0);
        // w becomes z
        assert_eq!(Vec3::new(4.0, 2.0, 2.0) * m, Vec3::new(2.0, 1.0, 1.0));
    }
}
