use crate::config::PhysicsConfig;
use crate::model::BounceState;

/// Advances the ball with explicit Euler under constant gravity.
pub struct PhysicsSystem {
    pub config: PhysicsConfig,
}

impl PhysicsSystem {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// One integration step of `dt` seconds.
    ///
    /// A bounce needs the ball inside the contact band and more than one step
    /// since the previous bounce, so a ball that is still below the rest
    /// offset right after bouncing is not reflected a second time.
    pub fn advance(&self, state: &BounceState, dt: f32) -> BounceState {
        let mut next = *state;

        if next.is_touching_ground(&self.config) && next.steps_since_contact > 1 {
            // restitution in [0, 1) makes the factor negative: reflect and damp
            next.velocity *= self.config.restitution - 1.0;
            next.steps_since_contact = 0;
            tracing::trace!(height = next.height, velocity = next.velocity, "bounce");
        }

        next.height += next.velocity * dt + 0.5 * self.config.gravity * dt * dt;
        next.velocity += self.config.gravity * dt;
        next.steps_since_contact = next.steps_since_contact.saturating_add(1);
        next
    }

    /// Drop the ball again from its initial height.
    pub fn reset(&self, state: &BounceState) -> BounceState {
        let steps_since_contact = if self.config.reset_clears_contact {
            0
        } else {
            state.steps_since_contact
        };
        BounceState {
            height: self.config.initial_height,
            velocity: self.config.initial_velocity,
            steps_since_contact,
        }
    }
}

impl Default for PhysicsSystem {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn state(height: f32, velocity: f32, steps_since_contact: u32) -> BounceState {
        BounceState { height, velocity, steps_since_contact }
    }

    #[test]
    fn test_free_fall_one_second() {
        let physics = PhysicsSystem::default();
        let next = physics.advance(&state(5.0, 0.0, 0), 1.0);
        assert!((next.height - 0.1).abs() < EPS, "height was {}", next.height);
        assert!((next.velocity + 9.8).abs() < EPS);
        assert_eq!(next.steps_since_contact, 1);
    }

    #[test]
    fn test_bounce_reflects_and_damps() {
        let physics = PhysicsSystem::default();
        let next = physics.advance(&state(0.5, -5.0, 2), 0.0);
        assert!((next.velocity - 4.75).abs() < EPS, "velocity was {}", next.velocity);
        assert_eq!(next.steps_since_contact, 1);
    }

    #[test]
    fn test_no_bounce_right_after_bounce() {
        let physics = PhysicsSystem::default();
        // Counter of 1 means only the bouncing step has run
        let next = physics.advance(&state(0.2, 3.0, 1), 0.0);
        assert_eq!(next.velocity, 3.0);
        assert_eq!(next.steps_since_contact, 2);

        let first = physics.advance(&state(0.3, -2.0, 0), 0.0);
        assert_eq!(first.velocity, -2.0);
    }

    #[test]
    fn test_advance_is_deterministic() {
        let physics = PhysicsSystem::default();
        let start = state(3.7, -1.25, 4);
        for dt in [0.0, 0.001, 0.016, 0.5, 2.0] {
            assert_eq!(physics.advance(&start, dt), physics.advance(&start, dt));
        }
    }

    #[test]
    fn test_zero_dt_only_applies_bounce() {
        let physics = PhysicsSystem::default();
        let airborne = state(3.0, -1.0, 7);
        let next = physics.advance(&airborne, 0.0);
        assert_eq!(next.height, 3.0);
        assert_eq!(next.velocity, -1.0);
    }

    #[test]
    fn test_bounce_never_gains_speed() {
        for restitution in [0.0, 0.05, 0.5, 0.99] {
            let physics = PhysicsSystem::new(PhysicsConfig { restitution, ..PhysicsConfig::default() });
            for velocity in [-20.0, -5.0, -0.1, 0.0, 2.0] {
                let next = physics.advance(&state(0.5, velocity, 5), 0.0);
                assert!(next.velocity.abs() <= velocity.abs());
                assert_eq!(next.steps_since_contact, 1);
            }
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let physics = PhysicsSystem::default();
        for s in [state(-2.0, 14.0, 9), state(0.5, 0.0, 0), state(5.0, 0.0, 3)] {
            let once = physics.reset(&s);
            let twice = physics.reset(&once);
            assert_eq!(once.height, 5.0);
            assert_eq!(once.velocity, 0.0);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_reset_keeps_contact_counter_by_default() {
        let physics = PhysicsSystem::default();
        assert_eq!(physics.reset(&state(1.0, 2.0, 6)).steps_since_contact, 6);

        let clearing = PhysicsSystem::new(PhysicsConfig { reset_clears_contact: true, ..PhysicsConfig::default() });
        assert_eq!(clearing.reset(&state(1.0, 2.0, 6)).steps_since_contact, 0);
    }

    #[test]
    fn test_ball_stays_between_plane_and_drop_height() {
        let physics = PhysicsSystem::default();
        let mut s = BounceState::default();
        for step in 0..2000 {
            s = physics.advance(&s, 0.016);
            if step >= 1000 {
                assert!(s.height > 0.0 && s.height < 5.0, "height was {} at step {step}", s.height);
            }
        }
    }

    #[test]
    fn test_reset_right_after_bounce_still_bounces_on_landing() {
        let physics = PhysicsSystem::default();
        let mut ball = physics.reset(&state(0.4, 0.1, 0));
        assert_eq!(ball.steps_since_contact, 0);

        let mut bounced = false;
        for _ in 0..200 {
            let before = ball.velocity;
            ball = physics.advance(&ball, 0.016);
            if before < 0.0 && ball.steps_since_contact == 1 {
                bounced = true;
                break;
            }
        }
        assert!(bounced, "ball never bounced after reset");
    }
}
