use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use crate::camera::PerspectiveCamera;
use crate::config::ControlsConfig;

const POLAR_EPSILON: f32 = 1e-6;

/// Orbits the camera around a target on a sphere of fixed radius.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub damping_factor: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    /// Pending (azimuth, polar) change.
    spherical_delta: Vec2,
}

impl OrbitControls {
    pub fn new(config: &ControlsConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            damping_factor: config.damping_factor,
            min_polar_angle: 0.0,
            max_polar_angle: config.max_polar_angle,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            rotate_speed: config.rotate_speed,
            spherical_delta: Vec2::ZERO,
        }
    }

    /// A drag or wheel gesture began; hand the camera to the user.
    pub fn interaction_start(&mut self) {
        self.auto_rotate = false;
    }

    pub fn interaction_end(&mut self) {
        self.auto_rotate = true;
    }

    pub fn rotate_by_pixels(&mut self, delta: Vec2) {
        self.spherical_delta.x -= delta.x * self.rotate_speed;
        self.spherical_delta.y -= delta.y * self.rotate_speed;
    }

    fn damping(&self) -> f32 {
        if self.damping_factor > 0.0 {
            self.damping_factor.min(1.0)
        } else {
            1.0
        }
    }

    /// Applies pending rotation and auto-rotation, then re-aims the camera at the target.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, delta_secs: f32) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            camera.target = self.target;
            return;
        }

        if self.auto_rotate {
            // One full turn per minute at speed 1
            self.spherical_delta.x -= TAU / 60.0 * self.auto_rotate_speed * delta_secs;
        }

        let damping = self.damping();
        let mut theta = offset.x.atan2(offset.z) + self.spherical_delta.x * damping;
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos() + self.spherical_delta.y * damping;

        theta = theta.rem_euclid(TAU);
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        let sin_phi = phi.sin();
        camera.position = self.target
            + Vec3::new(sin_phi * theta.sin(), phi.cos(), sin_phi * theta.cos()) * radius;
        camera.target = self.target;

        self.spherical_delta *= 1.0 - damping;
    }
}
