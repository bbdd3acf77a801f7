//! The light rig around the walkman: environment map, ambient, hemisphere and a pair of
//! directional lights.

use glam::Vec3;

use crate::config::LightingConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: Vec3,
    pub ground: Vec3,
    pub intensity: f32,
}

impl HemisphereLight {
    /// Sky color for normals pointing up, ground color pointing down, blended between.
    pub fn color_for(&self, normal: Vec3) -> Vec3 {
        let t = 0.5 * normal.normalize_or_zero().y + 0.5;
        self.ground.lerp(self.sky, t) * self.intensity
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Unit vector from the target towards the light.
    pub direction: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub background: Vec3,
    pub exposure: f32,
    pub environment: String,
    pub ambient_intensity: f32,
    pub hemisphere: HemisphereLight,
    pub directional: Vec<DirectionalLight>,
}

impl LightRig {
    pub fn from_config(config: &LightingConfig) -> Self {
        let directional = config
            .directional
            .iter()
            .filter_map(|light| {
                Vec3::from_array(light.position)
                    .try_normalize()
                    .map(|direction| DirectionalLight {
                        direction,
                        intensity: light.intensity,
                    })
            })
            .collect();
        Self {
            background: Vec3::from_array(config.background),
            exposure: config.exposure,
            environment: config.hdri.clone(),
            ambient_intensity: config.ambient_intensity,
            hemisphere: HemisphereLight {
                sky: Vec3::from_array(config.hemisphere_sky),
                ground: Vec3::from_array(config.hemisphere_ground),
                intensity: config.hemisphere_intensity,
            },
            directional,
        }
    }

    /// Direct light reaching a surface with `normal`, before the environment map and exposure.
    pub fn irradiance(&self, normal: Vec3) -> Vec3 {
        let normal = normal.normalize_or_zero();
        let direct: f32 = self
            .directional
            .iter()
            .map(|light| normal.dot(light.direction).max(0.0) * light.intensity)
            .sum();
        Vec3::splat(self.ambient_intensity + direct) + self.hemisphere.color_for(normal)
    }
}
