//! Solid fill with one color per face.

use super::scanline::{walk, ScanVertex};
use super::Rasterizer;
use crate::render::framebuffer::FrameBuffer;
use crate::renderlist::Triangle;

/// Fills with the lit face color (or the material color when unlit),
/// depth-tested per pixel, with the material's constant alpha.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatRasterizer;

impl FlatRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for FlatRasterizer {
    fn draw_triangle(&self, triangle: &Triangle, fb: &mut FrameBuffer) {
        let color = triangle.face_color();
        let alpha = triangle.alpha();
        let corners = triangle
            .positions()
            .map(|p| ScanVertex::new(p.x, p.y, p.z, []));

        walk(corners, fb.bounds(), |x, y, inv_z, _| {
            fb.wpixel(x, y, color, Some(inv_z), alpha);
        });
    }
}
