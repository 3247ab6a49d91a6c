//! Math primitives: vectors, row-vector matrices and 8-bit RGB color.
//!
//! All matrices follow the **row-vector** convention: a point is transformed
//! as `v * M`, and `A * B` applies `A` first, then `B`.

pub mod color;
pub mod mat3;
pub mod mat4;
pub mod vec2;
pub mod vec3;

pub use color::Color3;
pub use mat3::Mat3;
pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;

/// Absolute tolerance used by the `PartialEq` impls of vectors and matrices.
pub const EPSILON: f32 = 1e-5;

/// Tolerance-based float comparison.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}
