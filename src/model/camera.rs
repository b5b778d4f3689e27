use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::CameraConfig;

/// Camera orbiting the world origin, parameterized by spherical coordinates.
///
/// `azimuth` is unbounded and wraps through the trig functions. `elevation` is
/// kept strictly inside (-π/2, π/2) by the controller. `radius` has no bound:
/// zooming past zero puts the eye on the opposite side and flips the view.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub azimuth: f32,
    pub elevation: f32,
    pub radius: f32,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            azimuth: config.initial_azimuth,
            elevation: config.initial_elevation,
            radius: config.initial_radius,
            up: Vec3::Y,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: config.aspect,
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    /// Open interval the elevation has to stay in.
    pub fn elevation_in_range(elevation: f32) -> bool {
        elevation > -FRAC_PI_2 && elevation < FRAC_PI_2
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let (sin_el, cos_el) = self.elevation.sin_cos();
        self.radius * Vec3::new(cos_az * cos_el, sin_el, sin_az * cos_el)
    }

    pub fn target(&self) -> Vec3 { Vec3::ZERO }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target(), self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
