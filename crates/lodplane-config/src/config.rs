//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// How the plane mesh is built and textured initially.
    pub plane: PlaneConfig,
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub title: String,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

/// How centroid colours are averaged during subdivision.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ColorBlendMode {
    /// Sum the packed 32-bit words and divide by four.
    #[default]
    PackedInteger,
    /// Average each byte separately.
    PerChannel,
}

/// Plane mesh configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaneConfig {
    /// Subdivision levels below the root quad.
    pub max_depth: u8,
    pub color_blend: ColorBlendMode,
    /// Texture handle bound to every tier at start-up (0 = none).
    pub initial_texture: u32,
}

/// Observer camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial distance from the plane centroid.
    pub start_distance: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Vertical field of view.
    pub fov_y_degrees: f32,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Edge length of the generated tier textures and the plasma texture.
    pub texture_size: u32,
    /// Tier whose texture is replaced by the animated plasma, if any.
    pub plasma_tier: Option<usize>,
    /// Linear RGBA clear colour.
    pub clear_color: [f64; 4],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "LOD Plane".to_string(),
            vsync: true,
        }
    }
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            color_blend: ColorBlendMode::default(),
            initial_texture: 0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_distance: 4.0,
            speed: 0.6,
            fov_y_degrees: 60.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            texture_size: 256,
            plasma_tier: Some(0),
            clear_color: [0.1, 0.1, 0.12, 1.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

/// Platform config directory, e.g. `~/.config/lodplane` on Linux.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lodplane")
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE_NAME), serialized)
            .map_err(ConfigError::WriteError)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
    ron::from_str(&contents).map_err(ConfigError::ParseError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_plane_table() {
        let config = Config::default();
        assert_eq!(config.plane.max_depth, 2);
        assert_eq!(config.plane.color_blend, ColorBlendMode::PackedInteger);
        assert_eq!(config.plane.initial_texture, 0);
        assert_eq!(config.camera.start_distance, 4.0);
        assert_eq!(config.render.plasma_tier, Some(0));
    }

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("max_depth: 2"));
        assert!(ron_str.contains("PackedInteger"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.plane.color_blend = ColorBlendMode::PerChannel;
        config.render.plasma_tier = None;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), plane: (max_depth: 3))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.plane.max_depth, 3);
        assert_eq!(config.plane.color_blend, ColorBlendMode::PackedInteger);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.camera.speed = 2.0;
        config.plane.color_blend = ColorBlendMode::PerChannel;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.plane.max_depth = 1;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.plane.max_depth), Some(1));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_default_config_dir_ends_with_crate_name() {
        assert!(default_config_dir().ends_with("lodplane"));
    }
}
