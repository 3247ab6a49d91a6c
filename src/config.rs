//! Renderer and scene configuration.
//!
//! Plain structs with defaults and `with_*` builders. Values are checked by
//! [`RendererConfig::validate`] before anything is allocated.

use crate::error::{RenderError, Result};
use crate::light::{Light, LightSet, MAX_LIGHTS};
use crate::math::{Color3, Vec3};
use crate::render::framebuffer::validate_dimensions;

/// Framebuffer size, camera placement and projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    pub camera_position: Vec3,
    /// Horizontal field of view in degrees
    pub fov: f32,
    pub near_z: f32,
    pub far_z: f32,
    pub clear_color: Color3,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            camera_position: Vec3::ZERO,
            fov: 90.0,
            near_z: 5.0,
            far_z: 15000.0,
            clear_color: Color3::BLACK,
        }
    }
}

impl RendererConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_clip_planes(mut self, near_z: f32, far_z: f32) -> Self {
        self.near_z = near_z;
        self.far_z = far_z;
        self
    }

    pub fn with_clear_color(mut self, color: Color3) -> Self {
        self.clear_color = color;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height)?;
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if !(self.near_z > 0.0 && self.far_z > self.near_z) {
            return Err(RenderError::InvalidConfig(format!(
                "clip planes must satisfy 0 < near < far, got near {} far {}",
                self.near_z, self.far_z
            )));
        }
        Ok(())
    }
}

/// One directional light in a [`SceneConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLightConfig {
    pub intensity: Color3,
    /// Points toward the light
    pub direction: Vec3,
}

/// Lights for a scene: one ambient term plus directional lights.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub ambient: Color3,
    pub directional: Vec<DirectionalLightConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ambient: Color3::new(64, 64, 64),
            directional: vec![DirectionalLightConfig {
                intensity: Color3::new(192, 192, 192),
                direction: Vec3::new(-1.0, 1.0, -1.0),
            }],
        }
    }
}

impl SceneConfig {
    /// Builds the light set. A black ambient term is left out. Fails with
    /// [`RenderError::LightLimit`] when the lights do not fit.
    pub fn build_lights(&self) -> Result<LightSet> {
        let ambient = usize::from(self.ambient != Color3::BLACK);
        if ambient + self.directional.len() > MAX_LIGHTS {
            return Err(RenderError::LightLimit);
        }

        let mut lights = LightSet::new();
        if ambient == 1 {
            lights.insert(Light::ambient(self.ambient))?;
        }
        for light in &self.directional {
            lights.insert(Light::directional(light.intensity, light.direction))?;
        }
        Ok(lights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RendererConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_values_are_rejected() {
        let base = RendererConfig::default();
        assert!(matches!(
            base.with_size(0, 600).validate(),
            Err(RenderError::InvalidDimensions { .. })
        ));
        assert!(matches!(base.with_fov(0.0).validate(), Err(RenderError::InvalidConfig(_))));
        assert!(matches!(
            base.with_clip_planes(10.0, 5.0).validate(),
            Err(RenderError::InvalidConfig(_))
        ));
        assert!(base.with_clip_planes(-1.0, 5.0).validate().is_err());
    }

    #[test]
    fn default_scene_builds_two_lights() {
        let lights = SceneConfig::default().build_lights().unwrap();
        assert_eq!(lights.len(), 2);
    }

    #[test]
    fn too_many_lights_fail_up_front() {
        let scene = SceneConfig {
            ambient: Color3::WHITE,
            directional: vec![
                DirectionalLightConfig {
                    intensity: Color3::WHITE,
                    direction: Vec3::UP,
                };
                MAX_LIGHTS
            ],
        };
        assert!(matches!(scene.build_lights(), Err(RenderError::LightLimit)));

        let fits = SceneConfig {
            ambient: Color3::BLACK,
            ..scene
        };
        assert_eq!(fits.build_lights().unwrap().len(), MAX_LIGHTS);
    }
}
