//! Presentation targets for a finished frame.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::framebuffer::FrameBuffer;
use crate::error::Result;

/// Something a finished framebuffer can be shown on or copied into.
pub trait Surface {
    fn present(&mut self, fb: &FrameBuffer) -> Result<()>;
}

/// Headless surface backed by an RGBA image. Each `present` replaces the image
/// with the framebuffer contents, resizing it when the framebuffer size changed.
#[derive(Debug, Clone, Default)]
pub struct ImageSurface {
    image: RgbaImage,
    frames: u64,
}

impl ImageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Writes the last presented frame; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }
}

impl Surface for ImageSurface {
    fn present(&mut self, fb: &FrameBuffer) -> Result<()> {
        if self.image.dimensions() != (fb.width(), fb.height()) {
            self.image = RgbaImage::new(fb.width(), fb.height());
        }
        let width = fb.width() as usize;
        for (i, &argb) in fb.color_buffer().iter().enumerate() {
            let [a, r, g, b] = argb.to_be_bytes();
            let (x, y) = ((i % width) as u32, (i / width) as u32);
            self.image.put_pixel(x, y, Rgba([r, g, b, a]));
        }
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color3;

    #[test]
    fn present_copies_pixels_in_rgba_order() {
        let mut fb = FrameBuffer::new(3, 2, Color3::BLACK).unwrap();
        fb.set_pixel(2, 1, Color3::new(10, 20, 30));
        let mut surface = ImageSurface::new();
        surface.present(&fb).unwrap();

        assert_eq!(surface.image().dimensions(), (3, 2));
        assert_eq!(surface.image().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
        assert_eq!(surface.image().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.frames(), 1);
    }

    #[test]
    fn present_follows_framebuffer_resize() {
        let mut fb = FrameBuffer::new(3, 2, Color3::BLACK).unwrap();
        let mut surface = ImageSurface::new();
        surface.present(&fb).unwrap();
        fb.resize(5, 4).unwrap();
        surface.present(&fb).unwrap();
        assert_eq!(surface.image().dimensions(), (5, 4));
    }
}
