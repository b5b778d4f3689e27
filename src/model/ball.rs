use crate::config::PhysicsConfig;

/// Vertical state of the ball.
///
/// `height` is the displacement of the ball's center above the plane; the
/// ball rests at `PhysicsConfig::rest_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceState {
    pub height: f32,
    pub velocity: f32,
    /// Integration steps since the last bounce, counting the bouncing step
    pub steps_since_contact: u32,
}

impl BounceState {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            height: config.initial_height,
            velocity: config.initial_velocity,
            steps_since_contact: 0,
        }
    }

    pub fn is_touching_ground(&self, config: &PhysicsConfig) -> bool {
        (self.height - config.rest_offset).abs() < config.contact_epsilon
            || self.height <= config.rest_offset
    }
}

impl Default for BounceState {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}
