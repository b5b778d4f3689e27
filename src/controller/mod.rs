// CONTROLLER: Input, simulation update and the frame loop
pub mod input;
pub mod physics;
pub mod camera_controller;
pub mod frame_loop;

pub use input::{CursorDelta, DragState, FrameInput, InputEvent, InputState, KeyBindings};
pub use physics::PhysicsSystem;
pub use camera_controller::CameraController;
pub use frame_loop::{
    quantize_dt, CameraUniform, FrameClock, FrameLoopContext, FrameTransforms, LightingUniform,
    ObjectUniform, Simulation,
};
