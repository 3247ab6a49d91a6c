//! Pixel-producing half of the pipeline: framebuffer, rasterizers, the
//! per-frame orchestrator and presentation surfaces.

pub mod framebuffer;
pub mod gui;
pub mod rasterizer;
pub mod renderer;
pub mod surface;

pub use framebuffer::FrameBuffer;
pub use gui::GuiObject;
pub use rasterizer::{
    FlatRasterizer, GouraudRasterizer, Rasterizer, RasterizerDispatcher, TexturedRasterizer,
    WireframeRasterizer,
};
pub use renderer::{RenderStats, Renderer};
pub use surface::{ImageSurface, Surface};
