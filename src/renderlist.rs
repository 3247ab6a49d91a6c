//! Per-frame triangle list.
//!
//! Triangles are copied out of meshes every frame, then transformed, lit,
//! culled and projected in place. Lighting writes into each triangle's
//! [`Shading`] accumulator; materials stay untouched, so the list can be
//! dropped at the end of the frame with no cleanup.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::material::{Material, ShadeMode};
use crate::math::{Color3, Mat4, Vec3};
use crate::mesh::{Mesh, Vertex};

/// Lit colors accumulated for one triangle during the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shading {
    pub face: Color3,
    pub vertices: [Color3; 3],
}

/// Render-list entry.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
    /// Unit face normal, or zero for a degenerate triangle.
    pub normal: Vec3,
    pub material: Option<Rc<Material>>,
    /// Set by culling; every later stage skips the triangle.
    pub clipped: bool,
    /// `None` until a light has visited the triangle this frame.
    pub shading: Option<Shading>,
}

impl Triangle {
    pub fn new(vertices: [Vertex; 3], material: Option<Rc<Material>>) -> Self {
        let mut triangle = Self {
            vertices,
            normal: Vec3::ZERO,
            material,
            clipped: false,
            shading: None,
        };
        triangle.compute_normal();
        triangle
    }

    /// `(v1 - v0) × (v2 - v0)`, normalized. Zero when the corners are collinear.
    pub fn compute_normal(&mut self) {
        let [a, b, c] = self.positions();
        self.normal = (b - a).cross(c - a).normalize();
    }

    pub fn positions(&self) -> [Vec3; 3] {
        self.vertices.map(|v| v.position)
    }

    pub fn shade_mode(&self) -> ShadeMode {
        self.material
            .as_ref()
            .map_or(ShadeMode::Undefined, |m| m.shade_mode)
    }

    pub fn alpha(&self) -> u8 {
        self.material.as_ref().map_or(u8::MAX, |m| m.alpha)
    }

    /// Lit face color, or the material's base color if no light touched the triangle.
    pub fn face_color(&self) -> Color3 {
        match (&self.shading, &self.material) {
            (Some(shading), _) => shading.face,
            (None, Some(material)) => material.color,
            (None, None) => Color3::WHITE,
        }
    }

    /// Lit vertex colors, or the raw vertex colors if no light touched the triangle.
    pub fn vertex_colors(&self) -> [Color3; 3] {
        match &self.shading {
            Some(shading) => shading.vertices,
            None => self.vertices.map(|v| v.color),
        }
    }

    /// Adds one light's contribution, saturating per channel.
    pub fn accumulate(&mut self, face: Color3, vertices: Option<[Color3; 3]>) {
        let shading = self.shading.get_or_insert_with(Shading::default);
        shading.face = shading.face + face;
        if let Some(vertices) = vertices {
            for (acc, c) in shading.vertices.iter_mut().zip(vertices) {
                *acc = *acc + c;
            }
        }
    }

    pub fn average_z(&self) -> f32 {
        self.vertices.iter().map(|v| v.position.z).sum::<f32>() / 3.0
    }
}

/// Ordered triangles for one frame.
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    triangles: Vec<Triangle>,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Triangle> {
        self.triangles.iter_mut()
    }

    /// Triangles not marked clipped.
    pub fn visible(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter().filter(|t| !t.clipped)
    }

    /// Extracts every primitive of `mesh` with positions moved to world space.
    /// Normals are computed from the world-space positions.
    pub fn append_mesh(&mut self, mesh: &Mesh, world: &Mat4) {
        for submesh in mesh.submeshes() {
            let material = submesh.material();
            for mut corners in submesh.primitives() {
                for v in corners.iter_mut() {
                    v.position = v.position * *world;
                }
                self.push(Triangle::new(corners, Some(Rc::clone(material))));
            }
        }
    }

    /// Orders by average camera-space depth, nearest first, so that walking
    /// the list in reverse paints back to front.
    pub fn sort_back_to_front(&mut self) {
        self.triangles.sort_by(|a, b| {
            a.average_z()
                .partial_cmp(&b.average_z())
                .unwrap_or(Ordering::Equal)
        });
    }
}

impl<'a> IntoIterator for &'a RenderList {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

impl<'a> IntoIterator for &'a mut RenderList {
    type Item = &'a mut Triangle;
    type IntoIter = std::slice::IterMut<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SubMesh;

    fn tri(z: f32) -> Triangle {
        Triangle::new(
            [
                Vertex::new(Vec3::new(0.0, 0.0, z)),
                Vertex::new(Vec3::new(0.0, 1.0, z)),
                Vertex::new(Vec3::new(1.0, 0.0, z)),
            ],
            None,
        )
    }

    #[test]
    fn normal_is_unit_or_zero() {
        assert_eq!(tri(1.0).normal, Vec3::new(0.0, 0.0, -1.0));
        let flat = Triangle::new([Vertex::new(Vec3::ONE); 3], None);
        assert!(flat.normal.is_zero());
    }

    #[test]
    fn accumulate_saturates() {
        let mut t = tri(1.0);
        t.accumulate(Color3::new(200, 0, 0), Some([Color3::new(0, 0, 250); 3]));
        t.accumulate(Color3::new(100, 5, 0), Some([Color3::new(0, 0, 10); 3]));
        assert_eq!(t.face_color(), Color3::new(255, 5, 0));
        assert_eq!(t.vertex_colors(), [Color3::new(0, 0, 255); 3]);
    }

    #[test]
    fn unlit_triangle_uses_base_colors() {
        let material = Rc::new(Material::new(ShadeMode::Flat, Color3::GREEN));
        let mut t = tri(1.0);
        t.material = Some(material);
        t.vertices[1].color = Color3::RED;
        assert_eq!(t.face_color(), Color3::GREEN);
        assert_eq!(t.vertex_colors()[1], Color3::RED);
    }

    #[test]
    fn sort_puts_farthest_last() {
        let mut list = RenderList::new();
        list.push(tri(50.0));
        list.push(tri(10.0));
        list.push(tri(30.0));
        list.sort_back_to_front();
        let depths: Vec<f32> = list.iter().rev().map(Triangle::average_z).collect();
        assert_eq!(depths, vec![50.0, 30.0, 10.0]);
    }

    #[test]
    fn append_mesh_moves_to_world_space() {
        let material = Rc::new(Material::new(ShadeMode::Flat, Color3::RED));
        let mut mesh = Mesh::new();
        let verts = tri(0.0).vertices.to_vec();
        mesh.append_submesh(SubMesh::triangles(verts, material).unwrap());

        let mut list = RenderList::new();
        list.append_mesh(&mesh, &Mat4::translation(Vec3::new(0.0, 0.0, 7.0)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.triangles()[0].average_z(), 7.0);
        assert!(list.triangles()[0].material.is_some());
    }
}
