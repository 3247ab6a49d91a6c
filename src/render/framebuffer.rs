//! Color and depth planes with the per-pixel write policy.
//!
//! # Depth Buffer
//!
//! The depth plane stores `1/z` (reciprocal camera-space depth) for each pixel.
//! `1/z` interpolates linearly in screen space, and larger values are closer
//! to the camera. Clearing sets every entry to `0.0`, i.e. infinitely far.
//!
//! # Origin
//!
//! Writes take screen coordinates. The framebuffer subtracts its origin before
//! indexing, so a framebuffer can back a sub-rectangle of a larger screen.

use log::info;

use crate::error::{RenderError, Result};
use crate::math::Color3;

/// Largest accepted width or height.
pub const MAX_DIMENSION: u32 = 16384;

/// Owning ARGB color plane plus `1/z` depth plane.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    origin_x: i32,
    origin_y: i32,
    clear_color: Color3,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, clear_color: Color3) -> Result<Self> {
        let (color_buffer, depth_buffer) = allocate_planes(width, height, clear_color)?;
        Ok(Self {
            color_buffer,
            depth_buffer,
            width,
            height,
            origin_x: 0,
            origin_y: 0,
            clear_color,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Screen position of pixel `(0, 0)`.
    pub fn origin(&self) -> (i32, i32) {
        (self.origin_x, self.origin_y)
    }

    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin_x = x;
        self.origin_y = y;
    }

    /// Half-open screen-space rectangle covered: `(x0, y0, x1, y1)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.origin_x,
            self.origin_y,
            self.origin_x + self.width as i32,
            self.origin_y + self.height as i32,
        )
    }

    pub fn clear_color(&self) -> Color3 {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color3) {
        self.clear_color = color;
    }

    /// Resets every color to the clear color and every depth to `0.0`.
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.clear_color.to_argb(0xff));
        self.depth_buffer.fill(0.0);
    }

    /// Row-major ARGB pixels, alpha in the high byte.
    pub fn color_buffer(&self) -> &[u32] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Color plane as bytes, for streaming to a texture.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding or invalid bit patterns and u8 has alignment 1,
        // so any u32 slice can be viewed as four times as many bytes.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let (px, py) = (x - self.origin_x, y - self.origin_y);
        if px >= 0 && px < self.width as i32 && py >= 0 && py < self.height as i32 {
            Some(py as usize * self.width as usize + px as usize)
        } else {
            None
        }
    }

    /// Writes one pixel at screen coordinates `(x, y)`.
    ///
    /// Out-of-bounds writes are ignored. With `Some(depth)`, the write happens
    /// only if `depth` is strictly larger (nearer) than the stored `1/z`, which
    /// it then replaces. With `alpha < 255` the color is blended over the
    /// existing pixel as `(src·a + dst·(255 − a)) / 255`.
    #[inline]
    pub fn wpixel(&mut self, x: i32, y: i32, color: Color3, depth: Option<f32>, alpha: u8) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if let Some(depth) = depth {
            if depth <= self.depth_buffer[idx] {
                return;
            }
            self.depth_buffer[idx] = depth;
        }
        let out = if alpha == u8::MAX {
            color
        } else {
            Color3::blend(color, Color3::from_argb(self.color_buffer[idx]), alpha)
        };
        self.color_buffer[idx] = out.to_argb(0xff);
    }

    /// Opaque write with no depth test (overlays, GUI).
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color3) {
        self.wpixel(x, y, color, None, u8::MAX);
    }

    /// Color at screen coordinates, or `None` if out of bounds.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color3> {
        self.index(x, y)
            .map(|idx| Color3::from_argb(self.color_buffer[idx]))
    }

    /// Stored `1/z` at screen coordinates, or `None` if out of bounds.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    /// Reallocates both planes. Both are allocated before either is swapped in,
    /// so on error the framebuffer is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let (color_buffer, depth_buffer) = allocate_planes(width, height, self.clear_color)?;
        self.color_buffer = color_buffer;
        self.depth_buffer = depth_buffer;
        self.width = width;
        self.height = height;
        info!("framebuffer resized to {}x{}", width, height);
        Ok(())
    }
}

/// Checks a size against `1..=MAX_DIMENSION` on both axes.
pub fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn allocate_planes(width: u32, height: u32, clear_color: Color3) -> Result<(Vec<u32>, Vec<f32>)> {
    validate_dimensions(width, height)?;
    let len = width as usize * height as usize;

    let mut color = Vec::new();
    color.try_reserve_exact(len)?;
    color.resize(len, clear_color.to_argb(0xff));

    let mut depth = Vec::new();
    depth.try_reserve_exact(len)?;
    depth.resize(len, 0.0);

    Ok((color, depth))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Color3 = Color3::new(30, 30, 30);

    fn fb() -> FrameBuffer {
        FrameBuffer::new(4, 3, GREY).unwrap()
    }

    #[test]
    fn new_is_cleared() {
        let fb = fb();
        assert_eq!(fb.color_buffer().len(), 12);
        assert!(fb.color_buffer().iter().all(|&c| c == GREY.to_argb(0xff)));
        assert!(fb.depth_buffer().iter().all(|&d| d == 0.0));
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = fb();
        fb.set_pixel(-1, 0, Color3::RED);
        fb.set_pixel(4, 0, Color3::RED);
        fb.set_pixel(0, 3, Color3::RED);
        assert!(fb.color_buffer().iter().all(|&c| c == GREY.to_argb(0xff)));
        assert_eq!(fb.get_pixel(4, 0), None);
    }

    #[test]
    fn nearer_depth_wins() {
        let mut fb = fb();
        fb.wpixel(1, 1, Color3::RED, Some(0.5), 255);
        fb.wpixel(1, 1, Color3::GREEN, Some(0.25), 255); // farther
        assert_eq!(fb.get_pixel(1, 1), Some(Color3::RED));
        fb.wpixel(1, 1, Color3::BLUE, Some(0.5), 255); // equal is not nearer
        assert_eq!(fb.get_pixel(1, 1), Some(Color3::RED));
        fb.wpixel(1, 1, Color3::BLUE, Some(0.75), 255);
        assert_eq!(fb.get_pixel(1, 1), Some(Color3::BLUE));
        assert_eq!(fb.depth_at(1, 1), Some(0.75));
    }

    #[test]
    fn translucent_write_blends_and_updates_depth() {
        let mut fb = FrameBuffer::new(2, 2, Color3::BLACK).unwrap();
        fb.wpixel(0, 0, Color3::WHITE, Some(0.5), 128);
        assert_eq!(fb.get_pixel(0, 0), Some(Color3::new(128, 128, 128)));
        assert_eq!(fb.depth_at(0, 0), Some(0.5));
    }

    #[test]
    fn origin_offsets_writes() {
        let mut fb = fb();
        fb.set_origin(10, 20);
        fb.set_pixel(10, 20, Color3::RED);
        assert_eq!(fb.color_buffer()[0], Color3::RED.to_argb(0xff));
        assert_eq!(fb.get_pixel(0, 0), None);
        assert_eq!(fb.bounds(), (10, 20, 14, 23));
    }

    #[test]
    fn resize_rejects_zero_and_keeps_old_planes() {
        let mut fb = fb();
        fb.set_pixel(0, 0, Color3::RED);
        assert!(matches!(
            fb.resize(0, 10),
            Err(RenderError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert_eq!(fb.width(), 4);
        assert_eq!(fb.get_pixel(0, 0), Some(Color3::RED));
    }

    #[test]
    fn resize_then_clear() {
        let mut fb = FrameBuffer::new(800, 600, GREY).unwrap();
        fb.wpixel(5, 5, Color3::RED, Some(1.0), 255);
        fb.resize(400, 300).unwrap();
        fb.clear();
        assert_eq!((fb.width(), fb.height()), (400, 300));
        assert_eq!(fb.color_buffer().len(), 400 * 300);
        assert!(fb.color_buffer().iter().all(|&c| c == GREY.to_argb(0xff)));
        assert!(fb.depth_buffer().iter().all(|&d| d == 0.0));
    }
}
