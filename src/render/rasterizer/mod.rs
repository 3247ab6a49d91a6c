//! Triangle rasterizers, one per shading mode.
//!
//! Available variants:
//! - [`WireframeRasterizer`]: Bresenham edges, no fill, no depth test
//! - [`FlatRasterizer`]: one solid color per face
//! - [`GouraudRasterizer`]: perspective-correct per-vertex color
//! - [`TexturedRasterizer`]: perspective-correct UVs, texture times vertex color
//!
//! The filled variants share the scanline walker in `scanline`. The set of
//! shading modes is closed, so [`RasterizerDispatcher`] holds one instance of
//! each variant and picks one with a `match`.

mod flat;
mod gouraud;
pub(crate) mod scanline;
mod textured;
mod wireframe;

pub use flat::FlatRasterizer;
pub use gouraud::GouraudRasterizer;
pub use textured::TexturedRasterizer;
pub use wireframe::WireframeRasterizer;

use super::framebuffer::FrameBuffer;
use crate::material::ShadeMode;
use crate::renderlist::Triangle;

/// Draws one screen-space triangle into a framebuffer.
///
/// Vertex positions are in screen space with `1/z` in the z component.
pub trait Rasterizer {
    fn draw_triangle(&self, triangle: &Triangle, fb: &mut FrameBuffer);
}

/// Holds every rasterizer variant and routes triangles by shading mode.
#[derive(Debug, Default)]
pub struct RasterizerDispatcher {
    wireframe: WireframeRasterizer,
    flat: FlatRasterizer,
    gouraud: GouraudRasterizer,
    textured: TexturedRasterizer,
}

impl RasterizerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `triangle` with the variant for `mode`. Returns false for
    /// [`ShadeMode::Undefined`], which has no rasterizer.
    #[inline]
    pub fn draw(&self, mode: ShadeMode, triangle: &Triangle, fb: &mut FrameBuffer) -> bool {
        match mode {
            ShadeMode::Wireframe => self.wireframe.draw_triangle(triangle, fb),
            ShadeMode::Flat | ShadeMode::PlainColor => self.flat.draw_triangle(triangle, fb),
            ShadeMode::Smooth => self.gouraud.draw_triangle(triangle, fb),
            ShadeMode::Textured => self.textured.draw_triangle(triangle, fb),
            ShadeMode::Undefined => return false,
        }
        true
    }
}
