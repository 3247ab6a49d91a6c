//! Scene camera: world → camera → screen transforms and frustum culling.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! Screen space has y pointing down and stores `1/z_camera` in z.
//!
//! # Matrices
//!
//! The camera caches three row-vector matrices and rebuilds all of them from
//! every setter, so they are never stale when a transform stage runs:
//!
//! ```text
//! world --[world_to_camera]--> camera --[projection]--> NDC (÷w) --[screen]--> pixels
//! ```
//!
//! # Orientation
//!
//! - **Yaw**: rotation around Y (positive = look right)
//! - **Pitch**: rotation around X (positive = look down)
//! - **Roll**: rotation around Z (applied first, in the camera's own frame)

use crate::error::{RenderError, Result};
use crate::math::{Mat3, Mat4, Vec3};
use crate::mesh::BoundingSphere;
use crate::projection::Projection;
use crate::renderlist::RenderList;

/// Target rectangle in pixels. The origin is added by the screen matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Perspective camera with an orthonormal right/up/direction basis.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    right: Vec3,
    up: Vec3,
    dir: Vec3,

    yaw: f32,
    pitch: f32,
    roll: f32,

    projection: Projection,
    viewport: Viewport,

    world_to_camera: Mat4,
    projection_matrix: Mat4,
    screen: Mat4,
}

impl Camera {
    /// Creates a camera at `position` looking along +Z. The projection's aspect
    /// ratio is taken from `viewport`.
    pub fn new(position: Vec3, mut projection: Projection, viewport: Viewport) -> Result<Self> {
        viewport.validate()?;
        projection.set_aspect_ratio(viewport.aspect_ratio());
        projection.validate()?;

        let mut camera = Self {
            position,
            right: Vec3::RIGHT,
            up: Vec3::UP,
            dir: Vec3::FORWARD,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            projection,
            viewport,
            world_to_camera: Mat4::identity(),
            projection_matrix: Mat4::identity(),
            screen: Mat4::identity(),
        };
        camera.rebuild();
        Ok(camera)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.dir
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// `(yaw, pitch, roll)` in radians.
    pub fn euler_angles(&self) -> (f32, f32, f32) {
        (self.yaw, self.pitch, self.roll)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn world_to_camera(&self) -> &Mat4 {
        &self.world_to_camera
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    pub fn screen_matrix(&self) -> &Mat4 {
        &self.screen
    }

    // =========================================================================
    // Setters (each rebuilds the cached matrices)
    // =========================================================================

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.rebuild();
    }

    /// Points the camera along `dir` with zero roll. A zero vector is ignored.
    pub fn set_direction(&mut self, dir: Vec3) {
        let dir = dir.normalize();
        if dir.is_zero() {
            return;
        }
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = (-dir.y).clamp(-1.0, 1.0).asin();
        self.roll = 0.0;
        self.rebuild();
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.set_direction(target - self.position);
    }

    pub fn set_euler_angles(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.roll = roll;
        self.rebuild();
    }

    /// Horizontal field of view in degrees, `(0, 180)` exclusive.
    pub fn set_fov(&mut self, fov_degrees: f32) -> Result<()> {
        let mut projection = self.projection;
        projection.set_fov(fov_degrees.to_radians());
        projection.validate()?;
        self.projection = projection;
        self.rebuild();
        Ok(())
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) -> Result<()> {
        let mut projection = self.projection;
        projection.set_clip_planes(z_near, z_far);
        projection.validate()?;
        self.projection = projection;
        self.rebuild();
        Ok(())
    }

    /// Retargets the screen mapping and the aspect-dependent projection terms.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        viewport.validate()?;
        self.viewport = viewport;
        self.projection.set_aspect_ratio(viewport.aspect_ratio());
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let rotation = Mat3::yaw_pitch_roll(self.yaw, self.pitch, self.roll);
        self.right = (Vec3::RIGHT * rotation).normalize();
        self.up = (Vec3::UP * rotation).normalize();
        self.dir = (Vec3::FORWARD * rotation).normalize();

        // projects world offsets onto the camera axes
        let to_axes = Mat3::from_cols(self.right, self.up, self.dir);
        self.world_to_camera = Mat4::from_parts(to_axes, -self.position * to_axes);
        self.projection_matrix = self.projection.matrix();

        let alpha = 0.5 * self.viewport.width as f32 - 0.5;
        let beta = 0.5 * self.viewport.height as f32 - 0.5;
        self.screen = Mat4::new([
            [alpha, 0.0, 0.0, 0.0],
            [0.0, -beta, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [
                alpha + self.viewport.x as f32,
                beta + self.viewport.y as f32,
                0.0,
                1.0,
            ],
        ]);
    }

    // =========================================================================
    // Pipeline stages
    // =========================================================================

    /// World → camera space. Positions only; colors, UVs and normals are kept.
    pub fn to_camera(&self, list: &mut RenderList) {
        for triangle in list.iter_mut().filter(|t| !t.clipped) {
            for v in triangle.vertices.iter_mut() {
                v.position = v.position * self.world_to_camera;
            }
        }
    }

    /// Marks camera-space triangles that cannot be visible.
    ///
    /// A triangle is clipped when all three vertices are outside the same
    /// frustum plane, or when any vertex is closer than the near plane (there
    /// is no polygon clipping, so such a triangle cannot be projected safely).
    pub fn frustum_cull(&self, list: &mut RenderList) {
        for triangle in list.iter_mut().filter(|t| !t.clipped) {
            let outcodes = triangle.positions().map(|p| self.outcode(p));
            let all_outside_one_plane = outcodes[0] & outcodes[1] & outcodes[2] != 0;
            let crosses_near = outcodes.iter().any(|c| c & NEAR != 0);
            if all_outside_one_plane || crosses_near {
                triangle.clipped = true;
            }
        }
    }

    fn outcode(&self, p: Vec3) -> u8 {
        let d = self.projection.view_distance();
        let da = d * self.projection.aspect_ratio();
        let mut code = 0;
        if p.z < self.projection.z_near() {
            code |= NEAR;
        }
        if p.z > self.projection.z_far() {
            code |= FAR;
        }
        if d * p.x < -p.z {
            code |= LEFT;
        }
        if d * p.x > p.z {
            code |= RIGHT;
        }
        if da * p.y > p.z {
            code |= TOP;
        }
        if da * p.y < -p.z {
            code |= BOTTOM;
        }
        code
    }

    /// Coarse test of a world-space bounding sphere against the frustum.
    /// Returns true when the sphere is entirely outside.
    pub fn culled(&self, sphere: &BoundingSphere) -> bool {
        let c = sphere.center * self.world_to_camera;
        let r = sphere.radius;
        if c.z + r < self.projection.z_near() || c.z - r > self.projection.z_far() {
            return true;
        }

        let d = self.projection.view_distance();
        let da = d * self.projection.aspect_ratio();
        let side = |k: f32, coord: f32| {
            // signed distances to the two planes k·coord = ±z through the eye
            let norm = (k * k + 1.0).sqrt();
            ((c.z + k * coord) / norm, (c.z - k * coord) / norm)
        };
        let (left, right) = side(d, c.x);
        let (bottom, top) = side(da, c.y);
        [left, right, bottom, top].iter().any(|&dist| dist < -r)
    }

    /// Camera → screen space: projection, perspective divide and viewport
    /// mapping. The resulting z is `1/z_camera`.
    pub fn to_screen(&self, list: &mut RenderList) {
        for triangle in list.iter_mut().filter(|t| !t.clipped) {
            for v in triangle.vertices.iter_mut() {
                v.position = v.position * self.projection_matrix * self.screen;
            }
        }
    }
}

const NEAR: u8 = 1;
const FAR: u8 = 1 << 1;
const LEFT: u8 = 1 << 2;
const RIGHT: u8 = 1 << 3;
const TOP: u8 = 1 << 4;
const BOTTOM: u8 = 1 << 5;
