//! Geometry containers: vertices, submeshes and meshes.
//!
//! A [`SubMesh`] owns typed vertex/index arrays and exactly one material.
//! Indices are validated when the submesh is built, so triangle extraction
//! never goes out of bounds.

use std::rc::Rc;

use crate::error::{RenderError, Result};
use crate::material::Material;
use crate::math::{Color3, Mat4, Vec2, Vec3};
use crate::transform::Transform;

/// Per-vertex payload. The same struct flows through every pipeline stage;
/// only the meaning of `position` changes (world, camera, screen).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Color3,
    pub uv: Option<Vec2>,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            color: Color3::WHITE,
            uv: None,
        }
    }

    pub fn with_color(mut self, color: Color3) -> Self {
        self.color = color;
        self
    }

    pub fn with_uv(mut self, uv: Vec2) -> Self {
        self.uv = Some(uv);
        self
    }
}

/// How a submesh's corners form primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Index triplets into the vertex array.
    IndexedTriangles,
    /// Vertex triplets, no index array.
    Triangles,
    /// Vertex pairs, no index array.
    Lines,
}

impl Topology {
    fn name(self) -> &'static str {
        match self {
            Topology::IndexedTriangles => "indexed triangle",
            Topology::Triangles => "triangle",
            Topology::Lines => "line",
        }
    }

    fn corners_per_primitive(self) -> usize {
        match self {
            Topology::IndexedTriangles | Topology::Triangles => 3,
            Topology::Lines => 2,
        }
    }
}

/// Vertices and indices sharing one material.
#[derive(Debug, Clone)]
pub struct SubMesh {
    topology: Topology,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    uvs: Vec<Vec2>,
    uv_indices: Vec<u32>,
    material: Rc<Material>,
}

fn check_bounds(what: &'static str, indices: &[u32], len: usize) -> Result<()> {
    match indices.iter().find(|&&i| i as usize >= len) {
        Some(&index) => Err(RenderError::IndexOutOfBounds {
            what,
            index: index as usize,
            len,
        }),
        None => Ok(()),
    }
}

impl SubMesh {
    /// Indexed triangle list. Every index must address `vertices`.
    pub fn indexed(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        material: Rc<Material>,
    ) -> Result<Self> {
        check_bounds("vertex", &indices, vertices.len())?;
        Self::build(Topology::IndexedTriangles, vertices, indices, material)
    }

    /// Flat triangle list: each vertex triplet is a triangle.
    pub fn triangles(vertices: Vec<Vertex>, material: Rc<Material>) -> Result<Self> {
        Self::build(Topology::Triangles, vertices, Vec::new(), material)
    }

    /// Line list: each vertex pair is a segment.
    pub fn lines(vertices: Vec<Vertex>, material: Rc<Material>) -> Result<Self> {
        Self::build(Topology::Lines, vertices, Vec::new(), material)
    }

    fn build(
        topology: Topology,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        material: Rc<Material>,
    ) -> Result<Self> {
        let submesh = Self {
            topology,
            vertices,
            indices,
            uvs: Vec::new(),
            uv_indices: Vec::new(),
            material,
        };
        let count = submesh.num_corners();
        if count % topology.corners_per_primitive() != 0 {
            return Err(RenderError::IndexCount {
                count,
                topology: topology.name(),
            });
        }
        Ok(submesh)
    }

    /// Attaches a UV array. `uv_indices` maps every corner (index, or vertex for
    /// the non-indexed topologies) to an entry of `uvs`.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>, uv_indices: Vec<u32>) -> Result<Self> {
        let corners = self.num_corners();
        if uv_indices.len() != corners {
            return Err(RenderError::UvIndexMismatch {
                uv: uv_indices.len(),
                indices: corners,
            });
        }
        check_bounds("uv", &uv_indices, uvs.len())?;
        self.uvs = uvs;
        self.uv_indices = uv_indices;
        Ok(self)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn material(&self) -> &Rc<Material> {
        &self.material
    }

    pub fn set_material(&mut self, material: Rc<Material>) {
        self.material = material;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_corners(&self) -> usize {
        match self.topology {
            Topology::IndexedTriangles => self.indices.len(),
            Topology::Triangles | Topology::Lines => self.vertices.len(),
        }
    }

    fn corner(&self, i: usize) -> Vertex {
        let mut vertex = match self.topology {
            Topology::IndexedTriangles => self.vertices[self.indices[i] as usize],
            Topology::Triangles | Topology::Lines => self.vertices[i],
        };
        if !self.uv_indices.is_empty() {
            vertex.uv = Some(self.uvs[self.uv_indices[i] as usize]);
        }
        vertex
    }

    /// Extracts the primitives as vertex triplets. Segments come out as
    /// degenerate `[a, b, b]` triangles.
    pub fn primitives(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        let per = self.topology.corners_per_primitive();
        (0..self.num_corners() / per).map(move |p| {
            let base = p * per;
            match self.topology {
                Topology::Lines => {
                    let (a, b) = (self.corner(base), self.corner(base + 1));
                    [a, b, b]
                }
                _ => [self.corner(base), self.corner(base + 1), self.corner(base + 2)],
            }
        })
    }
}

/// Sphere enclosing a set of points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Centered on the points' bounding box, radius reaching the farthest point.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| (*p - center).length())
            .fold(0.0, f32::max);
        Self { center, radius }
    }
}

/// Ordered submeshes sharing one local frame.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    submeshes: Vec<SubMesh>,
    bounding_sphere: BoundingSphere,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_submesh(&mut self, submesh: SubMesh) {
        self.submeshes.push(submesh);
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    pub fn submeshes_mut(&mut self) -> &mut [SubMesh] {
        &mut self.submeshes
    }

    pub fn num_vertices(&self) -> usize {
        self.submeshes.iter().map(SubMesh::num_vertices).sum()
    }

    pub fn num_submeshes(&self) -> usize {
        self.submeshes.len()
    }

    /// Recomputes and caches the bounding sphere of all vertices under `transform`.
    pub fn compute_bounding_sphere(&mut self, transform: &Mat4) -> BoundingSphere {
        let points: Vec<Vec3> = self
            .submeshes
            .iter()
            .flat_map(|s| s.vertices.iter())
            .map(|v| v.position * *transform)
            .collect();
        self.bounding_sphere = BoundingSphere::from_points(&points);
        self.bounding_sphere
    }

    /// The sphere from the last [`Mesh::compute_bounding_sphere`] call.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// Duplicates submeshes and materials. Materials shared between submeshes
    /// of `self` stay shared between the copies. Textures are not duplicated.
    pub fn deep_clone(&self) -> Mesh {
        let mut copies: Vec<(Rc<Material>, Rc<Material>)> = Vec::new();
        let submeshes = self
            .submeshes
            .iter()
            .map(|submesh| {
                let shared = copies
                    .iter()
                    .find(|(src, _)| Rc::ptr_eq(src, &submesh.material));
                let material = match shared {
                    Some((_, copy)) => Rc::clone(copy),
                    None => {
                        let copy = Rc::new(Material::clone(&submesh.material));
                        copies.push((Rc::clone(&submesh.material), Rc::clone(&copy)));
                        copy
                    }
                };
                SubMesh {
                    material,
                    ..submesh.clone()
                }
            })
            .collect();
        Mesh {
            submeshes,
            bounding_sphere: self.bounding_sphere,
        }
    }

    /// Axis-aligned cube of half-size 1 centered on the origin, 12 triangles
    /// wound so that `(b - a) × (c - a)` points outward.
    pub fn cube(material: Rc<Material>) -> Result<Mesh> {
        const CORNERS: [Vec3; 8] = [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        #[rustfmt::skip]
        const FACES: [u32; 36] = [
            0, 1, 2,  0, 2, 3, // front
            3, 2, 4,  3, 4, 5, // right
            5, 4, 6,  5, 6, 7, // back
            7, 6, 1,  7, 1, 0, // left
            1, 6, 4,  1, 4, 2, // top
            5, 7, 0,  5, 0, 3, // bottom
        ];

        let vertices = CORNERS.iter().map(|&p| Vertex::new(p)).collect();
        let mut mesh = Mesh::new();
        mesh.append_submesh(SubMesh::indexed(vertices, FACES.to_vec(), material)?);
        Ok(mesh)
    }
}

/// A mesh placed in the world.
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub mesh: Mesh,
    pub transform: Transform,
}

impl MeshInstance {
    pub fn new(mesh: Mesh, transform: Transform) -> Self {
        Self { mesh, transform }
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}
