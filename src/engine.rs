//! Core rendering engine.
//!
//! The [`Engine`] struct is the main entry point. It owns the camera, the
//! lights, the renderer and the per-frame render list, and runs the pipeline:
//!
//! 1. Sphere-cull each instance, extract the survivors into the render list
//! 2. Light the list in world space
//! 3. World → camera space, frustum cull, depth sort
//! 4. Camera → screen space
//! 5. Rasterize, blit overlays, present

use log::{info, trace};

use crate::camera::{Camera, Viewport};
use crate::config::RendererConfig;
use crate::error::Result;
use crate::light::LightSet;
use crate::mesh::MeshInstance;
use crate::projection::Projection;
use crate::render::framebuffer::{validate_dimensions, FrameBuffer};
use crate::render::{GuiObject, RenderStats, Renderer, Surface};
use crate::renderlist::RenderList;

/// Counters for one [`Engine::render_frame`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub instances: usize,
    /// Instances rejected by the bounding-sphere test
    pub culled_instances: usize,
    /// Triangles extracted into the render list
    pub triangles: usize,
    pub render: RenderStats,
}

pub struct Engine {
    camera: Camera,
    lights: LightSet,
    renderer: Renderer,
    list: RenderList,
}

impl Engine {
    pub fn new(config: &RendererConfig, lights: LightSet) -> Result<Self> {
        config.validate()?;
        let viewport = Viewport::new(config.width, config.height);
        let projection = Projection::from_degrees(
            config.fov,
            viewport.aspect_ratio(),
            config.near_z,
            config.far_z,
        );
        let camera = Camera::new(config.camera_position, projection, viewport)?;
        let renderer = Renderer::new(config.width, config.height, config.clear_color)?;

        info!(
            "engine created: {}x{}, fov {}, {} lights",
            config.width,
            config.height,
            config.fov,
            lights.len()
        );

        Ok(Self {
            camera,
            lights,
            renderer,
            list: RenderList::new(),
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lights(&self) -> &LightSet {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut LightSet {
        &mut self.lights
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        self.renderer.framebuffer()
    }

    /// The list as left by the last frame, in screen space.
    pub fn render_list(&self) -> &RenderList {
        &self.list
    }

    /// Renders one frame of `instances` plus `gui` overlays and presents it.
    ///
    /// Takes the instances mutably to refresh their cached bounding spheres.
    pub fn render_frame(
        &mut self,
        instances: &mut [MeshInstance],
        gui: &[GuiObject],
        surface: &mut dyn Surface,
    ) -> Result<FrameStats> {
        let mut stats = FrameStats {
            instances: instances.len(),
            ..FrameStats::default()
        };

        self.list.clear();
        for instance in instances.iter_mut() {
            let world = instance.world_matrix();
            let sphere = instance.mesh.compute_bounding_sphere(&world);
            if self.camera.culled(&sphere) {
                stats.culled_instances += 1;
                continue;
            }
            self.list.append_mesh(&instance.mesh, &world);
        }
        stats.triangles = self.list.len();

        self.lights.illuminate(&mut self.list);
        self.camera.to_camera(&mut self.list);
        self.camera.frustum_cull(&mut self.list);
        self.list.sort_back_to_front();
        self.camera.to_screen(&mut self.list);

        self.renderer.begin_frame()?;
        stats.render = self.renderer.render_world(&self.list);
        self.renderer.render_gui(gui);
        self.renderer.end_frame(surface)?;

        trace!(
            "frame: {} instances ({} culled), {} triangles",
            stats.instances,
            stats.culled_instances,
            stats.triangles
        );
        Ok(stats)
    }

    /// Resizes the camera viewport and the framebuffer together. On error
    /// neither changes.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        validate_dimensions(width, height)?;
        let mut camera = self.camera.clone();
        camera.set_viewport(Viewport::new(width, height))?;
        self.renderer.resize(width, height)?;
        self.camera = camera;
        info!("engine resized to {}x{}", width, height);
        Ok(())
    }
}
