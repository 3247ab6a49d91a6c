use std::path::Path;

use crate::error::{RenderError, Result};
use crate::math::Color3;

/// A 2D ARGB image used for texture mapping and GUI blits.
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl Texture {
    // Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        // Convert RGBA bytes to ARGB u32
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                Color3::new(r, g, b).to_argb(a)
            })
            .collect();

        Self::from_argb(width, height, data)
    }

    /// Wraps already decoded ARGB pixels, row-major from the top-left corner.
    pub fn from_argb(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A texture filled with one opaque color.
    pub fn solid(width: u32, height: u32, color: Color3) -> Result<Self> {
        let len = width as usize * height as usize;
        Self::from_argb(width, height, vec![color.to_argb(0xff); len])
    }

    /// Texel at integer coordinates, `None` outside the image.
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Sample the texture at UV coordinates using nearest-neighbor filtering.
    ///
    /// # UV Coordinate Convention
    /// - UV coordinates are in [0,1] range, (0,0) = bottom-left
    /// - Textures are stored top-left origin, so V is flipped: v_corrected = 1.0 - v
    ///
    /// # Wrapping
    /// Uses repeat/wrap mode via rem_euclid for UVs outside [0,1]
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        // rem_euclid handles negative values correctly, unlike %
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
