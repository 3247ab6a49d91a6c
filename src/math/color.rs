use std::ops::Add;

/// 8-bit RGB color. Arithmetic saturates at 255 instead of wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color3 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color3 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GREEN: Self = Self::new(0, 255, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rounds and clamps float channels into `0..=255`.
    pub fn from_f32(r: f32, g: f32, b: f32) -> Self {
        let channel = |c: f32| c.round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Unpacks the RGB channels of a `0xAARRGGBB` word.
    pub const fn from_argb(argb: u32) -> Self {
        Self::new((argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
    }

    /// Packs into `0xAARRGGBB`.
    pub const fn to_argb(self, alpha: u8) -> u32 {
        ((alpha as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(
            self.r.saturating_add(other.r),
            self.g.saturating_add(other.g),
            self.b.saturating_add(other.b),
        )
    }

    /// Channel-wise product normalized to 255: `self * other / 255`, rounded.
    /// Modulating by white is the identity.
    pub fn modulate(self, other: Self) -> Self {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Self::new(mul(self.r, other.r), mul(self.g, other.g), mul(self.b, other.b))
    }

    /// Alpha-blends `src` over `dst`: `(src·a + dst·(255 − a)) / 255`.
    pub fn blend(src: Self, dst: Self, alpha: u8) -> Self {
        let a = alpha as u16;
        let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * (255 - a)) / 255) as u8;
        Self::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
    }
}

impl Add for Color3 {
    type Output = Color3;

    fn add(self, rhs: Color3) -> Color3 {
        self.saturating_add(rhs)
    }
}

impl From<[u8; 3]> for Color3 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}
