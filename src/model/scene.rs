use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Material and placement of one drawable object
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: u32,
    pub translation: Vec3,
    pub rotation_y: f32,
    pub scale: f32,
    pub color: Vec3,
    pub specular: f32,
    pub diffuse: f32,
}

impl SceneObject {
    /// Translation * Rotation * Scale
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            self.translation,
        )
    }
}

/// The ground plane and the ball sitting above it
pub struct Scene {
    pub plane: SceneObject,
    pub ball: SceneObject,
    pub light_position: Vec3,
}

impl Scene {
    pub fn new() -> Self {
        let plane = SceneObject {
            id: 0,
            translation: Vec3::new(0.0, -2.0, 0.0),
            rotation_y: FRAC_PI_2,
            scale: 3.0,
            color: Vec3::new(0.0, 0.0, 1.0),
            specular: 0.0,
            diffuse: 1.0,
        };
        let ball = SceneObject {
            id: 1,
            translation: plane.translation,
            rotation_y: FRAC_PI_2,
            scale: 0.5,
            color: Vec3::new(1.0, 0.0, 0.0),
            specular: 0.35,
            diffuse: 0.65,
        };
        Self {
            plane,
            ball,
            light_position: Vec3::new(5.0, 5.0, 5.0),
        }
    }

    /// Place the ball `height` above the plane's origin
    pub fn set_ball_height(&mut self, height: f32) {
        self.ball.translation = self.plane.translation + Vec3::new(0.0, height, 0.0);
    }

    #[cfg(test)]
    pub fn objects(&self) -> [&SceneObject; 2] {
        [&self.plane, &self.ball]
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
