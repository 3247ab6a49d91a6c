//! Screen-space overlays drawn after the 3D world.

use std::rc::Rc;

use super::framebuffer::FrameBuffer;
use crate::math::Color3;
use crate::texture::Texture;

/// A texture blitted at an integer screen position, top-left anchored.
#[derive(Debug, Clone)]
pub struct GuiObject {
    pub texture: Rc<Texture>,
    pub x: i32,
    pub y: i32,
}

impl GuiObject {
    pub fn new(texture: Rc<Texture>, x: i32, y: i32) -> Self {
        Self { texture, x, y }
    }

    /// Opaque copy with no depth test. Texel alpha is ignored; pixels outside
    /// the framebuffer are dropped.
    pub fn draw(&self, fb: &mut FrameBuffer) {
        let texture = &self.texture;
        for ty in 0..texture.height() {
            for tx in 0..texture.width() {
                if let Some(texel) = texture.at(tx, ty) {
                    fb.set_pixel(self.x + tx as i32, self.y + ty as i32, Color3::from_argb(texel));
                }
            }
        }
    }
}
