//! Test harness for the LOD plane: a winit window that plays the plugin host.

pub mod camera;
pub mod clock;
pub mod renderer;
pub mod scene;
pub mod window;

pub use window::{AppState, RunError, run};
