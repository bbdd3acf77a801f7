//! Scene configuration. Every field has a default, so a config file only lists what it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub model: ModelConfig,
    pub lighting: LightingConfig,
    pub video: VideoConfig,
    pub nodes: NodeNames,
    pub overlay: OverlayConfig,
    pub seek: SeekConfig,
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
            position: [0.0, 50.0, 20.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub damping_factor: f32,
    pub max_polar_angle: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    /// Radians of orbit per pixel of pointer drag.
    pub rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.25,
            max_polar_angle: std::f32::consts::FRAC_PI_2,
            auto_rotate: true,
            auto_rotate_speed: 1.0,
            rotate_speed: 0.005,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub scale: f32,
    pub env_map_intensity: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "assets/model/model.gltf".to_string(),
            scale: 200.0,
            env_map_intensity: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub background: [f32; 3],
    pub exposure: f32,
    pub hdri: String,
    pub ambient_intensity: f32,
    pub hemisphere_sky: [f32; 3],
    pub hemisphere_ground: [f32; 3],
    pub hemisphere_intensity: f32,
    pub directional: Vec<DirectionalLight>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            exposure: 1.5,
            hdri: "assets/little_paris_under_tower_1k.hdr".to_string(),
            ambient_intensity: 3.0,
            hemisphere_sky: [1.0, 1.0, 1.0],
            hemisphere_ground: [0.267, 0.267, 0.267],
            hemisphere_intensity: 2.0,
            directional: vec![
                DirectionalLight {
                    position: [1.0, 1.0, 1.0],
                    intensity: 2.0,
                },
                DirectionalLight {
                    position: [-1.0, -1.0, -1.0],
                    intensity: 2.0,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    /// The light shines from here towards the origin.
    pub position: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub duration_secs: Option<f64>,
    pub looping: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            url: "https://videodelivery.net/5f2131064379f44031902d4a4b9a6562/manifest/video.m3u8"
                .to_string(),
            width: 1920,
            height: 1080,
            duration_secs: None,
            looping: true,
        }
    }
}

/// Names of the model nodes the controls bind to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeNames {
    pub play: String,
    pub pause: String,
    pub forward: String,
    pub backward: String,
    /// Anchor for the generated overlay quad.
    pub screen: String,
    /// Mesh whose material receives the video when no quad is generated.
    pub screen_surface: String,
}

impl Default for NodeNames {
    fn default() -> Self {
        Self {
            play: "PlayButton".to_string(),
            pause: "PauseButton".to_string(),
            forward: "ForwardButton".to_string(),
            backward: "BackwardButton".to_string(),
            screen: "Glass2".to_string(),
            screen_surface: "Glass2_Glass1_0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayStrategy {
    /// Generate a textured quad in front of the screen mesh.
    Quad,
    /// Put the video on the screen mesh's own material.
    ScreenMaterial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub strategy: OverlayStrategy,
    pub width: f32,
    pub height: f32,
    /// Added to the quad's position in the screen parent's local space.
    pub offset: [f32; 3],
    pub scale: f32,
    /// Euler XYZ angles added after the half turn about Y.
    pub rotation_nudge: [f32; 3],
    pub crop_to_fit: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            strategy: OverlayStrategy::Quad,
            width: 16.0,
            height: 9.0,
            offset: [-0.5, 0.06, 0.05],
            scale: 0.29,
            rotation_nudge: [0.6, 0.0, 3.14],
            crop_to_fit: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekConfig {
    pub step_secs: f64,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self { step_secs: 10.0 }
    }
}
