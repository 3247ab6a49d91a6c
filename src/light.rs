//! Light sources and the bounded light registry.
//!
//! Every light adds `intensity ⊙ base × factor / 256` into the shading
//! accumulator of each triangle it reaches. The factor depends on the kind:
//!
//! | Kind        | Factor                                                  |
//! |-------------|---------------------------------------------------------|
//! | Ambient     | `1`                                                     |
//! | Directional | `n · dir`, nothing when `<= 0`                          |
//! | Point       | `(n · l) / (kc + kl·d + kq·d²)`, `l = pos − v0`         |
//! | Spot        | point factor × cone term                                |
//!
//! `dir` is the unit vector toward the light. `l` is deliberately left
//! unnormalized.
//!
//! Running [`LightSet::illuminate`] twice over the same list adds every
//! contribution twice.

use log::{trace, warn};

use crate::error::{RenderError, Result};
use crate::math::{Color3, Vec3};
use crate::renderlist::{RenderList, Triangle};

/// Maximum number of lights a [`LightSet`] holds.
pub const MAX_LIGHTS: usize = 8;

/// Distance attenuation `kc + kl·d + kq·d²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    #[inline]
    pub fn at(&self, distance: f32) -> f32 {
        self.constant + self.linear * distance + self.quadratic * distance * distance
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Spot cone: half-angles in radians and the falloff exponent between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub inner: f32,
    pub outer: f32,
    pub falloff: f32,
}

impl Cone {
    /// 1 inside the inner cone, 0 outside the outer one, a power curve between.
    fn factor(&self, cos_angle: f32) -> f32 {
        let (cos_inner, cos_outer) = (self.inner.cos(), self.outer.cos());
        if cos_angle >= cos_inner {
            1.0
        } else if cos_angle <= cos_outer {
            0.0
        } else {
            ((cos_angle - cos_outer) / (cos_inner - cos_outer)).powf(self.falloff)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional {
        /// Unit vector pointing toward the light.
        direction: Vec3,
    },
    Point {
        position: Vec3,
        attenuation: Attenuation,
    },
    Spot {
        position: Vec3,
        /// Unit vector the spot shines along.
        direction: Vec3,
        attenuation: Attenuation,
        cone: Cone,
    },
}

impl std::fmt::Display for LightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LightKind::Ambient => write!(f, "ambient"),
            LightKind::Directional { .. } => write!(f, "directional"),
            LightKind::Point { .. } => write!(f, "point"),
            LightKind::Spot { .. } => write!(f, "spot"),
        }
    }
}

/// A light source: intensity, on/off switch and kind-specific geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub intensity: Color3,
    pub enabled: bool,
    pub kind: LightKind,
}

impl Light {
    fn with_kind(intensity: Color3, kind: LightKind) -> Self {
        Self {
            intensity,
            enabled: true,
            kind,
        }
    }

    pub fn ambient(intensity: Color3) -> Self {
        Self::with_kind(intensity, LightKind::Ambient)
    }

    /// `direction` points toward the light and is normalized here.
    pub fn directional(intensity: Color3, direction: Vec3) -> Self {
        Self::with_kind(
            intensity,
            LightKind::Directional {
                direction: direction.normalize(),
            },
        )
    }

    pub fn point(intensity: Color3, position: Vec3, attenuation: Attenuation) -> Self {
        Self::with_kind(
            intensity,
            LightKind::Point {
                position,
                attenuation,
            },
        )
    }

    /// `direction` is where the spot shines and is normalized here.
    pub fn spot(
        intensity: Color3,
        position: Vec3,
        direction: Vec3,
        attenuation: Attenuation,
        cone: Cone,
    ) -> Self {
        Self::with_kind(
            intensity,
            LightKind::Spot {
                position,
                direction: direction.normalize(),
                attenuation,
                cone,
            },
        )
    }

    /// Scalar weight of this light on `triangle`, `None` when it adds nothing.
    fn factor(&self, triangle: &Triangle) -> Option<f32> {
        let n = triangle.normal;
        let factor = match self.kind {
            LightKind::Ambient => 1.0,
            LightKind::Directional { direction } => n.dot(direction),
            LightKind::Point {
                position,
                attenuation,
            } => point_factor(n, position - triangle.vertices[0].position, &attenuation)?,
            LightKind::Spot {
                position,
                direction,
                attenuation,
                cone,
            } => {
                let l = position - triangle.vertices[0].position;
                let base = point_factor(n, l, &attenuation)?;
                base * cone.factor((-l).normalize().dot(direction))
            }
        };
        (factor > 0.0).then_some(factor)
    }

    fn contribution(&self, base: Color3, factor: f32) -> Color3 {
        let [ir, ig, ib] = self.intensity.to_f32();
        let [br, bg, bb] = base.to_f32();
        Color3::from_f32(
            ir * br * factor / 256.0,
            ig * bg * factor / 256.0,
            ib * bb * factor / 256.0,
        )
    }

    /// Adds this light's contribution into every eligible triangle of `list`.
    ///
    /// Skips clipped triangles, triangles without a material, undefined and
    /// wireframe modes, and zero normals. A disabled or black light returns
    /// immediately.
    pub fn illuminate(&self, list: &mut RenderList) {
        if !self.enabled || self.intensity == Color3::BLACK {
            return;
        }

        let mut lit = 0usize;
        for triangle in list.iter_mut() {
            if triangle.clipped || triangle.normal.is_zero() {
                continue;
            }
            let Some(material) = triangle.material.as_ref() else {
                continue;
            };
            let mode = material.shade_mode;
            if !mode.is_lit() {
                continue;
            }
            let Some(factor) = self.factor(triangle) else {
                continue;
            };

            let face = self.contribution(material.color, factor);
            let vertices = mode
                .has_vertex_shading()
                .then(|| triangle.vertices.map(|v| self.contribution(v.color, factor)));
            triangle.accumulate(face, vertices);
            lit += 1;
        }
        trace!("{} light reached {} triangles", self.kind, lit);
    }
}

fn point_factor(normal: Vec3, l: Vec3, attenuation: &Attenuation) -> Option<f32> {
    let dp = normal.dot(l);
    let atten = attenuation.at(l.length());
    (dp > 0.0 && atten > 0.0).then(|| dp / atten)
}

/// Slot handle returned by [`LightSet::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

/// Fixed-capacity light registry owned by the scene.
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    slots: [Option<Light>; MAX_LIGHTS],
}

impl LightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a light, or fails with [`RenderError::LightLimit`] leaving the set unchanged.
    pub fn insert(&mut self, light: Light) -> Result<LightId> {
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(light);
                Ok(LightId(slot))
            }
            None => {
                warn!("refusing {} light: {} lights already registered", light.kind, MAX_LIGHTS);
                Err(RenderError::LightLimit)
            }
        }
    }

    /// Frees the slot and returns the light that occupied it.
    pub fn remove(&mut self, id: LightId) -> Option<Light> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: LightId) -> Option<&Light> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Light> {
        self.slots.iter().flatten()
    }

    /// Runs every registered light over `list`, in slot order.
    pub fn illuminate(&self, list: &mut RenderList) {
        for light in self.iter() {
            light.illuminate(list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Material, ShadeMode};
    use crate::mesh::Vertex;
    use std::rc::Rc;

    /// Triangle in the z = 0 plane with normal (0, 0, -1).
    fn facing_minus_z(mode: ShadeMode, color: Color3) -> RenderList {
        let mut list = RenderList::new();
        list.push(Triangle::new(
            [
                Vertex::new(Vec3::new(0.0, 0.0, 0.0)),
                Vertex::new(Vec3::new(0.0, 1.0, 0.0)),
                Vertex::new(Vec3::new(1.0, 0.0, 0.0)),
            ],
            Some(Rc::new(Material::new(mode, color))),
        ));
        list
    }

    fn face(list: &RenderList) -> Color3 {
        list.triangles()[0].face_color()
    }

    #[test]
    fn ambient_full_intensity_on_full_channel() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        Light::ambient(Color3::new(128, 128, 128)).illuminate(&mut list);
        assert_eq!(face(&list), Color3::new(128, 128, 128));
    }

    #[test]
    fn zero_intensity_ambient_leaves_colors_unchanged() {
        let base = Color3::new(10, 200, 33);
        let mut list = facing_minus_z(ShadeMode::Smooth, base);
        Light::ambient(Color3::BLACK).illuminate(&mut list);
        assert!(list.triangles()[0].shading.is_none());
        assert_eq!(face(&list), base);
    }

    #[test]
    fn disabled_light_does_nothing() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        let mut light = Light::ambient(Color3::WHITE);
        light.enabled = false;
        light.illuminate(&mut list);
        assert!(list.triangles()[0].shading.is_none());
    }

    #[test]
    fn wireframe_and_undefined_are_not_lit() {
        for mode in [ShadeMode::Wireframe, ShadeMode::Undefined] {
            let mut list = facing_minus_z(mode, Color3::WHITE);
            Light::ambient(Color3::WHITE).illuminate(&mut list);
            assert!(list.triangles()[0].shading.is_none());
        }
    }

    #[test]
    fn zero_normal_is_skipped() {
        let mut list = RenderList::new();
        list.push(Triangle::new(
            [Vertex::new(Vec3::ONE); 3],
            Some(Rc::new(Material::new(ShadeMode::Flat, Color3::WHITE))),
        ));
        Light::ambient(Color3::WHITE).illuminate(&mut list);
        assert!(list.triangles()[0].shading.is_none());
    }

    #[test]
    fn directional_back_facing_adds_nothing() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        Light::directional(Color3::WHITE, Vec3::FORWARD).illuminate(&mut list);
        assert!(list.triangles()[0].shading.is_none());
    }

    #[test]
    fn directional_never_exceeds_255() {
        let mut list = facing_minus_z(ShadeMode::Smooth, Color3::WHITE);
        let sun = Light::directional(Color3::WHITE, -Vec3::FORWARD);
        for _ in 0..4 {
            sun.illuminate(&mut list);
        }
        assert_eq!(face(&list), Color3::WHITE);
        assert_eq!(list.triangles()[0].vertex_colors(), [Color3::WHITE; 3]);
    }

    #[test]
    fn directional_scales_with_angle() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        let dir = Vec3::new(0.0, 1.0, -1.0);
        Light::directional(Color3::new(200, 0, 0), dir).illuminate(&mut list);
        // 200 * 255 * cos(45°) / 256
        assert_eq!(face(&list), Color3::new(141, 0, 0));
    }

    #[test]
    fn point_light_behind_leaves_color_unchanged() {
        let base = Color3::new(90, 90, 90);
        let mut list = facing_minus_z(ShadeMode::Flat, base);
        let light = Light::point(Color3::WHITE, Vec3::new(0.0, 0.0, 10.0), Attenuation::default());
        light.illuminate(&mut list);
        assert_eq!(face(&list), base);
        assert!(list.triangles()[0].shading.is_none());
    }

    #[test]
    fn point_light_uses_unnormalized_vector() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        // l = (0, 0, -2), n·l = 2, atten = 1 + 0.5 * 2 = 2, factor 1
        let light = Light::point(
            Color3::new(100, 100, 100),
            Vec3::new(0.0, 0.0, -2.0),
            Attenuation::new(1.0, 0.5, 0.0),
        );
        light.illuminate(&mut list);
        assert_eq!(face(&list), Color3::new(100, 100, 100));
    }

    #[test]
    fn spot_outside_outer_cone_adds_nothing() {
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        let cone = Cone {
            inner: 0.1,
            outer: 0.2,
            falloff: 1.0,
        };
        // shining sideways, away from the triangle
        let light = Light::spot(
            Color3::WHITE,
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::RIGHT,
            Attenuation::default(),
            cone,
        );
        light.illuminate(&mut list);
        assert!(list.triangles()[0].shading.is_none());
    }

    #[test]
    fn spot_inside_inner_cone_matches_point() {
        let cone = Cone {
            inner: 0.5,
            outer: 0.8,
            falloff: 2.0,
        };
        let pos = Vec3::new(0.0, 0.0, -4.0);
        let atten = Attenuation::new(1.0, 0.25, 0.0);

        let mut spot_list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        Light::spot(Color3::WHITE, pos, Vec3::FORWARD, atten, cone).illuminate(&mut spot_list);
        let mut point_list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        Light::point(Color3::WHITE, pos, atten).illuminate(&mut point_list);

        assert_eq!(face(&spot_list), face(&point_list));
    }

    #[test]
    fn cone_factor_between_angles() {
        let cone = Cone {
            inner: 0.0,
            outer: std::f32::consts::FRAC_PI_2,
            falloff: 1.0,
        };
        assert!((cone.factor(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(cone.factor(1.0), 1.0);
        assert_eq!(cone.factor(-0.1), 0.0);
    }

    #[test]
    fn light_set_is_bounded() {
        let mut set = LightSet::new();
        let ids: Vec<_> = (0..MAX_LIGHTS)
            .map(|_| set.insert(Light::ambient(Color3::WHITE)).unwrap())
            .collect();
        assert!(matches!(
            set.insert(Light::ambient(Color3::WHITE)),
            Err(RenderError::LightLimit)
        ));
        assert_eq!(set.len(), MAX_LIGHTS);

        assert!(set.remove(ids[3]).is_some());
        assert!(set.remove(ids[3]).is_none());
        assert_eq!(set.insert(Light::ambient(Color3::RED)).unwrap(), ids[3]);
    }

    #[test]
    fn light_set_accumulates_across_lights() {
        let mut set = LightSet::new();
        set.insert(Light::ambient(Color3::new(64, 64, 64))).unwrap();
        set.insert(Light::directional(Color3::new(64, 64, 64), -Vec3::FORWARD))
            .unwrap();
        let mut list = facing_minus_z(ShadeMode::Flat, Color3::WHITE);
        set.illuminate(&mut list);
        // 64 * 255 / 256 = 63.75 -> 64, twice
        assert_eq!(face(&list), Color3::new(128, 128, 128));
    }
}
