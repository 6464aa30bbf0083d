//! Opens a window showing the LOD plane.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Up/Down arrows move the camera, F5 reloads the config, Escape quits.

use clap::Parser;
use lodplane_config::{CliArgs, Config, default_config_dir};
use tracing::error;

fn main() {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    lodplane_log::init_logging(
        Some(&log_dir),
        cfg!(debug_assertions) && config.debug.log_to_file,
        Some(&config),
    );

    if let Err(e) = lodplane_app::run(config, config_dir) {
        error!("{e}");
        std::process::exit(1);
    }
}
