use crate::config::CameraConfig;
use crate::controller::input::CursorDelta;
use crate::model::OrbitCamera;

/// Turns drag deltas into orbit and zoom changes on the camera
pub struct CameraController {
    pub mouse_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl CameraController {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            mouse_sensitivity: config.mouse_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
        }
    }

    /// Orbit around the origin.
    ///
    /// An elevation step that would leave (-π/2, π/2) is dropped entirely;
    /// the angle is not snapped to the boundary.
    pub fn apply_orbit(&self, camera: &mut OrbitCamera, delta: CursorDelta) {
        camera.azimuth += self.mouse_sensitivity * delta.dx;
        let elevation = camera.elevation + self.mouse_sensitivity * delta.dy;
        if OrbitCamera::elevation_in_range(elevation) {
            camera.elevation = elevation;
        }
    }

    /// Dragging down moves the eye away. Radius is unbounded and can go negative.
    pub fn apply_zoom(&self, camera: &mut OrbitCamera, delta: CursorDelta) {
        camera.radius += self.zoom_sensitivity * delta.dy;
    }

    pub fn apply_drag(&self, camera: &mut OrbitCamera, delta: CursorDelta, zoom: bool) {
        if zoom {
            self.apply_zoom(camera, delta);
        } else {
            self.apply_orbit(camera, delta);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn delta(dx: f32, dy: f32) -> CursorDelta {
        CursorDelta { dx, dy }
    }

    #[test]
    fn test_zoom_drag_down_increases_radius() {
        let controller = CameraController::default();
        let mut cam = OrbitCamera::default();
        // last y = 100, y = 150
        let d = CursorDelta::between((0.0, 100.0), (0.0, 150.0));
        controller.apply_drag(&mut cam, d, true);
        assert!((cam.radius - 11.5).abs() < EPS);
        assert_eq!(cam.azimuth, FRAC_PI_2);
        assert_eq!(cam.elevation, 0.0);
    }

    #[test]
    fn test_zoom_can_cross_zero() {
        let controller = CameraController::default();
        let mut cam = OrbitCamera::default();
        controller.apply_drag(&mut cam, delta(0.0, -400.0), true);
        assert!((cam.radius + 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_moves_azimuth_and_elevation() {
        let controller = CameraController::default();
        let mut cam = OrbitCamera::default();
        controller.apply_drag(&mut cam, delta(20.0, -10.0), false);
        assert!((cam.azimuth - (FRAC_PI_2 + 0.1)).abs() < EPS);
        assert!((cam.elevation + 0.05).abs() < EPS);
        assert_eq!(cam.radius, 9.0);
    }

    #[test]
    fn test_elevation_step_out_of_range_is_rejected() {
        let controller = CameraController::default();
        let mut cam = OrbitCamera::default();
        cam.elevation = 1.5;
        // 1.5 + 0.1 lands outside; saturating would give π/2 - ε
        controller.apply_orbit(&mut cam, delta(0.0, 20.0));
        assert_eq!(cam.elevation, 1.5);
        // azimuth still follows the horizontal part
        controller.apply_orbit(&mut cam, delta(10.0, 20.0));
        assert!((cam.azimuth - (FRAC_PI_2 + 0.05)).abs() < EPS);
        assert_eq!(cam.elevation, 1.5);
        // a smaller step that fits is still taken
        controller.apply_orbit(&mut cam, delta(0.0, 10.0));
        assert!((cam.elevation - 1.55).abs() < EPS);
    }

    #[test]
    fn test_elevation_stays_in_open_interval() {
        let controller = CameraController::default();
        let mut cam = OrbitCamera::default();
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..10_000 {
            // xorshift, deterministic drag noise biased upwards
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let dy = (seed % 400) as f32 - 150.0;
            let dx = (seed % 97) as f32 - 48.0;
            controller.apply_orbit(&mut cam, delta(dx, dy));
            assert!(cam.elevation > -FRAC_PI_2 && cam.elevation < FRAC_PI_2);
        }
    }
}
