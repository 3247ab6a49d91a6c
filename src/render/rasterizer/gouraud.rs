//! Perspective-correct Gouraud shading.

use super::scanline::{walk, ScanVertex};
use super::Rasterizer;
use crate::math::Color3;
use crate::render::framebuffer::FrameBuffer;
use crate::renderlist::Triangle;

/// Interpolates `color/z` and `1/z` across the triangle and recovers each
/// pixel's color as `(color/z) / (1/z)`. A constant vertex color therefore
/// comes out exactly, whatever the depths.
#[derive(Debug, Default, Clone, Copy)]
pub struct GouraudRasterizer;

impl GouraudRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for GouraudRasterizer {
    fn draw_triangle(&self, triangle: &Triangle, fb: &mut FrameBuffer) {
        let alpha = triangle.alpha();
        let colors = triangle.vertex_colors();
        let positions = triangle.positions();
        let corners: [ScanVertex<3>; 3] = std::array::from_fn(|i| {
            let p = positions[i];
            ScanVertex::new(p.x, p.y, p.z, colors[i].to_f32())
        });

        walk(corners, fb.bounds(), |x, y, inv_z, c| {
            let z = 1.0 / inv_z;
            let color = Color3::from_f32(c[0] * z, c[1] * z, c[2] * z);
            fb.wpixel(x, y, color, Some(inv_z), alpha);
        });
    }
}
