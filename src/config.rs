use clap::Parser;
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::path::PathBuf;

/// Command line configuration. Every flag defaults to the constant the demo
/// has always shipped with.
#[derive(Parser, Debug, Clone)]
#[command(name = "bouncing-ball", version, about = "A textured ball bouncing on a plane")]
pub struct Config {
    /// Window width in physical pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Window height in physical pixels
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    /// Wavefront OBJ mesh used for the ground plane
    #[arg(long, default_value = "assets/objects/plane.obj")]
    pub plane_mesh: PathBuf,

    /// Wavefront OBJ mesh used for the ball
    #[arg(long, default_value = "assets/objects/sphere.obj")]
    pub sphere_mesh: PathBuf,

    /// Texture applied to both objects (PNG or DDS)
    #[arg(long, default_value = "assets/textures/rough.png")]
    pub texture: PathBuf,

    /// Height the ball is dropped from, above the plane
    #[arg(long, default_value_t = 5.0)]
    pub drop_height: f32,

    /// Fraction of speed kept after a bounce, in [0, 1)
    #[arg(long, default_value_t = 0.05)]
    pub restitution: f32,

    /// Vertical acceleration (negative pulls down)
    #[arg(long, default_value_t = -9.8, allow_negative_numbers = true)]
    pub gravity: f32,

    /// Radians of orbit per pixel of drag
    #[arg(long, default_value_t = 0.005)]
    pub mouse_sensitivity: f32,

    /// Radius change per pixel of shift-drag
    #[arg(long, default_value_t = 0.05)]
    pub zoom_sensitivity: f32,

    /// Also clear the contact counter when the ball is reset
    #[arg(long)]
    pub reset_clears_contact: bool,

    /// Hide the debug overlay
    #[arg(long)]
    pub no_overlay: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroWindowSize { width: u32, height: u32 },
    RestitutionOutOfRange(f32),
    NotFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroWindowSize { width, height } => {
                write!(f, "window size must be non-zero, got {width}x{height}")
            }
            ConfigError::RestitutionOutOfRange(r) => {
                write!(f, "restitution must lie in [0, 1), got {r}")
            }
            ConfigError::NotFinite(name) => write!(f, "{name} must be a finite number"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroWindowSize { width: self.width, height: self.height });
        }
        let finite = [
            ("drop height", self.drop_height),
            ("restitution", self.restitution),
            ("gravity", self.gravity),
            ("mouse sensitivity", self.mouse_sensitivity),
            ("zoom sensitivity", self.zoom_sensitivity),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        if !(0.0..1.0).contains(&self.restitution) {
            return Err(ConfigError::RestitutionOutOfRange(self.restitution));
        }
        Ok(())
    }

    pub fn physics(&self) -> PhysicsConfig {
        PhysicsConfig {
            initial_height: self.drop_height,
            restitution: self.restitution,
            gravity: self.gravity,
            reset_clears_contact: self.reset_clears_contact,
            ..PhysicsConfig::default()
        }
    }

    pub fn camera(&self) -> CameraConfig {
        CameraConfig {
            mouse_sensitivity: self.mouse_sensitivity,
            zoom_sensitivity: self.zoom_sensitivity,
            ..CameraConfig::default()
        }
    }
}

/// Constants of the bounce model.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub initial_height: f32,
    pub initial_velocity: f32,
    pub restitution: f32,
    pub gravity: f32,
    /// Height of the ball's center above the plane when resting
    pub rest_offset: f32,
    pub contact_epsilon: f32,
    pub reset_clears_contact: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            initial_height: 5.0,
            initial_velocity: 0.0,
            restitution: 0.05,
            gravity: -9.8,
            rest_offset: 0.5,
            contact_epsilon: 0.05,
            reset_clears_contact: false,
        }
    }
}

/// Orbit camera constants. The projection never changes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub initial_azimuth: f32,
    pub initial_elevation: f32,
    pub initial_radius: f32,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub mouse_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_azimuth: FRAC_PI_2,
            initial_elevation: 0.0,
            initial_radius: 9.0,
            fov_y_degrees: 60.0,
            aspect: 1.0,
            z_near: 0.1,
            z_far: 100.0,
            mouse_sensitivity: 0.005,
            zoom_sensitivity: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("bouncing-ball").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_defaults_match_builtin_constants() {
        let config = parse(&[]);
        assert_eq!(config.width, 1000);
        assert_eq!(config.height, 1000);
        assert!(config.validate().is_ok());
        assert_eq!(config.physics(), PhysicsConfig::default());
        assert_eq!(config.camera(), CameraConfig::default());
    }

    #[test]
    fn test_negative_gravity_flag() {
        let config = parse(&["--gravity", "-1.62", "--drop-height", "2"]);
        let physics = config.physics();
        assert_eq!(physics.gravity, -1.62);
        assert_eq!(physics.initial_height, 2.0);
    }

    #[test]
    fn test_reset_flag_reaches_physics() {
        let config = parse(&["--reset-clears-contact"]);
        assert!(config.physics().reset_clears_contact);
    }

    #[test]
    fn test_restitution_must_be_below_one() {
        let config = parse(&["--restitution", "1.0"]);
        assert_eq!(config.validate(), Err(ConfigError::RestitutionOutOfRange(1.0)));

        let config = parse(&["--restitution", "0"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = parse(&["--width", "0"]);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWindowSize { .. })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut config = parse(&[]);
        config.gravity = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::NotFinite("gravity")));
    }
}
