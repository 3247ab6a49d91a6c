//! Frame orchestration.
//!
//! Provides the [`Renderer`], which owns the framebuffer and the rasterizer
//! set and drives one frame:
//!
//! ```text
//! begin_frame -> render_world -> render_gui -> end_frame
//! ```
//!
//! A resize requested between `begin_frame` and `end_frame` is deferred to the
//! next `begin_frame` so a frame never straddles two buffer sizes.

use log::{debug, trace, warn};

use super::framebuffer::{validate_dimensions, FrameBuffer};
use super::gui::GuiObject;
use super::rasterizer::RasterizerDispatcher;
use super::surface::Surface;
use crate::error::Result;
use crate::math::Color3;
use crate::renderlist::RenderList;

/// Per-call triangle counters from [`Renderer::render_world`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub clipped: usize,
    pub no_material: usize,
    pub unsupported: usize,
}

impl RenderStats {
    pub fn total(&self) -> usize {
        self.drawn + self.clipped + self.no_material + self.unsupported
    }
}

pub struct Renderer {
    framebuffer: FrameBuffer,
    rasterizers: RasterizerDispatcher,
    in_frame: bool,
    pending_resize: Option<(u32, u32)>,
}

impl Renderer {
    pub fn new(width: u32, height: u32, clear_color: Color3) -> Result<Self> {
        Ok(Self {
            framebuffer: FrameBuffer::new(width, height, clear_color)?,
            rasterizers: RasterizerDispatcher::new(),
            in_frame: false,
            pending_resize: None,
        })
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// True between `begin_frame` and `end_frame`.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Size waiting for the next `begin_frame`, if any.
    pub fn pending_resize(&self) -> Option<(u32, u32)> {
        self.pending_resize
    }

    /// Applies a deferred resize, then clears color and depth.
    pub fn begin_frame(&mut self) -> Result<()> {
        if let Some((width, height)) = self.pending_resize.take() {
            self.framebuffer.resize(width, height)?;
        }
        self.framebuffer.clear();
        self.in_frame = true;
        Ok(())
    }

    /// Draws every visible triangle, walking the list from its end so a list
    /// sorted near-to-far paints back to front.
    pub fn render_world(&mut self, list: &RenderList) -> RenderStats {
        let mut stats = RenderStats::default();

        for triangle in list.iter().rev() {
            if triangle.clipped {
                stats.clipped += 1;
                continue;
            }
            let Some(material) = triangle.material.as_ref() else {
                debug!("triangle without material, skipped");
                stats.no_material += 1;
                continue;
            };
            let mode = material.shade_mode;
            if self.rasterizers.draw(mode, triangle, &mut self.framebuffer) {
                stats.drawn += 1;
            } else {
                debug!("no rasterizer for shade mode {}, skipped", mode);
                stats.unsupported += 1;
            }
        }

        trace!(
            "world: {} drawn, {} clipped, {} without material, {} unsupported",
            stats.drawn,
            stats.clipped,
            stats.no_material,
            stats.unsupported
        );
        stats
    }

    /// Blits overlays in order; later objects cover earlier ones.
    pub fn render_gui(&mut self, objects: &[GuiObject]) {
        for object in objects {
            object.draw(&mut self.framebuffer);
        }
    }

    pub fn end_frame(&mut self, surface: &mut dyn Surface) -> Result<()> {
        self.in_frame = false;
        surface.present(&self.framebuffer)
    }

    /// Resizes the framebuffer now, or at the next `begin_frame` when a frame
    /// is in progress. Invalid sizes are rejected either way.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if self.in_frame {
            validate_dimensions(width, height)?;
            warn!("resize to {}x{} requested mid-frame, deferred", width, height);
            self.pending_resize = Some((width, height));
            Ok(())
        } else {
            self.pending_resize = None;
            self.framebuffer.resize(width, height)
        }
    }

    pub fn set_clear_color(&mut self, color: Color3) {
        self.framebuffer.set_clear_color(color);
    }
}
