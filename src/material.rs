//! Surface description shared between submeshes.

use std::rc::Rc;

use crate::math::Color3;
use crate::texture::Texture;

/// Selects the rasterizer variant for every triangle using the material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadeMode {
    /// Not renderable. Logged and skipped.
    #[default]
    Undefined,
    /// Edges only, unlit.
    Wireframe,
    /// One lit color per face.
    Flat,
    /// Per-vertex lit colors, perspective-correct interpolation.
    Smooth,
    /// Texture modulated by per-vertex lit colors.
    Textured,
    /// Solid face color, same fill as [`ShadeMode::Flat`].
    PlainColor,
}

impl ShadeMode {
    /// Whether lights contribute to triangles in this mode.
    pub fn is_lit(self) -> bool {
        !matches!(self, ShadeMode::Undefined | ShadeMode::Wireframe)
    }

    /// Whether lights also shade the per-vertex colors.
    pub fn has_vertex_shading(self) -> bool {
        matches!(self, ShadeMode::Smooth | ShadeMode::Textured)
    }
}

impl std::fmt::Display for ShadeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShadeMode::Undefined => write!(f, "Undefined"),
            ShadeMode::Wireframe => write!(f, "Wireframe"),
            ShadeMode::Flat => write!(f, "Flat"),
            ShadeMode::Smooth => write!(f, "Smooth"),
            ShadeMode::Textured => write!(f, "Textured"),
            ShadeMode::PlainColor => write!(f, "PlainColor"),
        }
    }
}

/// Material shared by reference between submeshes and render-list triangles.
///
/// Lighting never writes to a material; lit colors live in the per-frame
/// accumulator of each [`crate::renderlist::Triangle`].
#[derive(Debug, Clone)]
pub struct Material {
    pub shade_mode: ShadeMode,
    pub color: Color3,
    /// 255 is opaque.
    pub alpha: u8,
    pub texture: Option<Rc<Texture>>,
}

impl Material {
    pub fn new(shade_mode: ShadeMode, color: Color3) -> Self {
        Self {
            shade_mode,
            color,
            alpha: u8::MAX,
            texture: None,
        }
    }

    pub fn textured(texture: Rc<Texture>) -> Self {
        Self {
            texture: Some(texture),
            ..Self::new(ShadeMode::Textured, Color3::WHITE)
        }
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha == u8::MAX
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(ShadeMode::Undefined, Color3::WHITE)
    }
}
