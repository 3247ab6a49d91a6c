//! Perspective-correct texture mapping.

use log::debug;

use super::scanline::{walk, ScanVertex};
use super::Rasterizer;
use crate::math::{Color3, Vec2};
use crate::render::framebuffer::FrameBuffer;
use crate::renderlist::Triangle;

/// Interpolates `u/z`, `v/z` and `color/z`, samples the material texture
/// (nearest, wrapping) and modulates the texel by the vertex color.
///
/// The written alpha is the material alpha scaled by the texel alpha.
#[derive(Debug, Default, Clone, Copy)]
pub struct TexturedRasterizer;

impl TexturedRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for TexturedRasterizer {
    fn draw_triangle(&self, triangle: &Triangle, fb: &mut FrameBuffer) {
        let Some(texture) = triangle.material.as_ref().and_then(|m| m.texture.as_deref()) else {
            debug!("textured triangle without a texture, skipped");
            return;
        };
        let alpha = triangle.alpha() as u32;
        let colors = triangle.vertex_colors();
        let corners: [ScanVertex<5>; 3] = std::array::from_fn(|i| {
            let v = &triangle.vertices[i];
            let uv = v.uv.unwrap_or(Vec2::ZERO);
            let [r, g, b] = colors[i].to_f32();
            ScanVertex::new(v.position.x, v.position.y, v.position.z, [uv.x, uv.y, r, g, b])
        });

        walk(corners, fb.bounds(), |x, y, inv_z, a| {
            let z = 1.0 / inv_z;
            let texel = texture.sample(a[0] * z, a[1] * z);
            let shade = Color3::from_f32(a[2] * z, a[3] * z, a[4] * z);
            let color = Color3::from_argb(texel).modulate(shade);
            let texel_alpha = texel >> 24;
            fb.wpixel(x, y, color, Some(inv_z), ((alpha * texel_alpha) / 255) as u8);
        });
    }
}
