use glam::{Mat4, Vec3};
use std::time::{Duration, Instant};

use crate::config::{CameraConfig, PhysicsConfig};
use crate::controller::camera_controller::CameraController;
use crate::controller::input::{DragState, FrameInput, InputState};
use crate::controller::physics::PhysicsSystem;
use crate::model::{BounceState, OrbitCamera, Scene, SceneObject};

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub light_pos: [f32; 3],
    pub ambient: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    pub specular: f32,
    pub diffuse: f32,
    pub object_id: u32,
    pub _pad: [f32; 2],
}

impl ObjectUniform {
    pub fn new(object: &SceneObject) -> Self {
        Self {
            model: object.model_matrix().to_cols_array_2d(),
            color: object.color.to_array(),
            specular: object.specular,
            diffuse: object.diffuse,
            object_id: object.id,
            _pad: [0.0; 2],
        }
    }
}

/// Whole milliseconds of `elapsed`, in seconds.
///
/// Frames shorter than a millisecond produce a zero step, so at very high
/// frame rates the ball does not move.
pub fn quantize_dt(elapsed: Duration) -> f32 {
    elapsed.as_millis() as f32 / 1000.0
}

/// Wall clock for frame deltas
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { start: now, last: now }
    }

    /// Quantized seconds since the previous tick
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = quantize_dt(now.saturating_duration_since(self.last));
        self.last = now;
        dt
    }

    pub fn seconds_since_start(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start).as_secs_f64()
    }
}

/// Matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransforms {
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    pub plane_model: Mat4,
    pub ball_model: Mat4,
}

impl FrameTransforms {
    pub fn camera_uniform(&self) -> CameraUniform {
        CameraUniform {
            view: self.view.to_cols_array_2d(),
            proj: self.projection.to_cols_array_2d(),
            eye: self.eye.extend(1.0).to_array(),
        }
    }
}

/// All per-frame mutable state, owned in one place
pub struct Simulation {
    pub camera: OrbitCamera,
    pub ball: BounceState,
    pub drag: DragState,
    /// Picking hook: only ever cleared, on drag release
    pub selection: Option<usize>,
    pub scene: Scene,
    pub camera_controller: CameraController,
    pub physics_system: PhysicsSystem,
}

impl Simulation {
    pub fn new(physics: PhysicsConfig, camera: CameraConfig) -> Self {
        let ball = BounceState::new(&physics);
        let mut scene = Scene::new();
        scene.set_ball_height(ball.height);
        Self {
            camera: OrbitCamera::new(&camera),
            ball,
            drag: DragState::new(),
            selection: None,
            scene,
            camera_controller: CameraController::new(&camera),
            physics_system: PhysicsSystem::new(physics),
        }
    }

    /// Apply one frame of input, advance the ball by `dt` and derive transforms
    pub fn step(&mut self, input: FrameInput, dt: f32) -> FrameTransforms {
        if input.reset {
            self.ball = self.physics_system.reset(&self.ball);
            tracing::info!(height = self.ball.height, "ball reset");
        }

        if input.drag_released {
            self.selection = None;
        }

        if let Some(delta) = input.drag {
            if self.selection.is_none() {
                self.camera_controller.apply_drag(&mut self.camera, delta, input.zoom);
            }
        }

        self.ball = self.physics_system.advance(&self.ball, dt);
        self.scene.set_ball_height(self.ball.height);

        self.transforms()
    }

    pub fn transforms(&self) -> FrameTransforms {
        FrameTransforms {
            eye: self.camera.eye(),
            view: self.camera.view(),
            projection: self.camera.projection(),
            plane_model: self.scene.plane.model_matrix(),
            ball_model: self.scene.ball.model_matrix(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), CameraConfig::default())
    }
}

/// Main loop state: input accumulation, timing and the simulation
pub struct FrameLoopContext {
    pub simulation: Simulation,
    pub input_state: InputState,
    pub clock: FrameClock,
    pub last_dt: f32,
}

impl FrameLoopContext {
    pub fn new(simulation: Simulation, input_state: InputState, now: Instant) -> Self {
        Self {
            simulation,
            input_state,
            clock: FrameClock::new(now),
            last_dt: 0.0,
        }
    }

    /// Sample input and step the simulation for the frame at `now`
    pub fn update(&mut self, now: Instant) -> FrameTransforms {
        let dt = self.clock.tick(now);
        let timestamp = self.clock.seconds_since_start(now);
        let input = self.input_state.sample(&mut self.simulation.drag, timestamp);
        self.last_dt = dt;
        self.simulation.step(input, dt)
    }
}
