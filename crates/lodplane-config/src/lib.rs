//! Configuration for the LOD plane harness.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Missing sections or fields fall back to defaults, and unknown
//! fields are ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, CameraConfig, ColorBlendMode, Config, DebugConfig, PlaneConfig, RenderConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
