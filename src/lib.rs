pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod frame;
pub mod math;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod shapes;
pub mod ui;
pub mod vehicle;

pub use camera::{Camera, MovementState};
pub use frame::{CameraId, FramePlan, Orchestrator, SceneRenderer, ViewportSelection, World};
pub use vehicle::{AnimationState, Vehicle};
