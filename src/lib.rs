//! A CPU-based software 3D rendering pipeline.
//!
//! Meshes, materials and lights go through a virtual camera and are
//! rasterized into an in-memory framebuffer. Nothing is hardware accelerated;
//! SDL2 is used only to show the result (behind the `window` feature).
//!
//! # Quick Start
//!
//! ```no_run
//! use softrend::prelude::*;
//! use std::rc::Rc;
//!
//! # fn main() -> softrend::Result<()> {
//! let config = RendererConfig::default();
//! let lights = SceneConfig::default().build_lights()?;
//! let mut engine = Engine::new(&config, lights)?;
//!
//! let material = Rc::new(Material::new(ShadeMode::Flat, Color3::WHITE));
//! let mut transform = Transform::new();
//! transform.set_position_xyz(0.0, 0.0, 40.0).set_scale_uniform(5.0);
//! let mut instances = vec![MeshInstance::new(Mesh::cube(material)?, transform)];
//!
//! let mut surface = ImageSurface::new();
//! engine.render_frame(&mut instances, &[], &mut surface)?;
//! surface.save("frame.png")?;
//! # Ok(())
//! # }
//! ```

pub mod camera;
pub mod config;
pub mod engine;
pub mod error;
pub mod light;
pub mod material;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod render;
pub mod renderlist;
pub mod texture;
pub mod transform;
#[cfg(feature = "window")]
pub mod window;

pub use engine::{Engine, FrameStats};
pub use error::{RenderError, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use softrend::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::{Camera, Viewport};
    pub use crate::config::{DirectionalLightConfig, RendererConfig, SceneConfig};
    pub use crate::engine::{Engine, FrameStats};
    pub use crate::error::{RenderError, Result};
    pub use crate::light::{Attenuation, Cone, Light, LightId, LightKind, LightSet, MAX_LIGHTS};
    pub use crate::material::{Material, ShadeMode};
    pub use crate::math::{Color3, Mat3, Mat4, Vec2, Vec3};
    pub use crate::mesh::{BoundingSphere, Mesh, MeshInstance, SubMesh, Topology, Vertex};
    pub use crate::projection::Projection;
    pub use crate::render::{FrameBuffer, GuiObject, ImageSurface, RenderStats, Renderer, Surface};
    pub use crate::renderlist::{RenderList, Triangle};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;

    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}
