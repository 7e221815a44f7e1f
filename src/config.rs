//! Application configuration
//!
//! Loaded from a TOML file (first CLI argument, or `naves.toml` in the working
//! directory). Every table and field is optional and falls back to the
//! defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "naves.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub meshes: MeshPaths,
    pub camera: CameraConfig,
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist and parse. Without one, `naves.toml` is
    /// used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA, each channel in 0..=1
    pub clear_color: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Naves".to_string(),
            width: 1024,
            height: 768,
            clear_color: [0.5, 0.5, 0.5, 0.0],
        }
    }
}

/// Constants of the scene layout and of the ship animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Uniform scale applied to every object before translation
    pub uniform_scale: f32,
    /// Hangars sit at -d and +d on the X axis; ships travel between them
    pub hangar_distance: f32,
    /// Position change per frame while moving
    pub ship_speed: f32,
    /// Advance twice per frame, doubling the effective ship speed
    pub legacy_double_step: bool,
    /// Height of the light placed inside each hangar
    pub hangar_light_height: f32,
    /// `LightPosition_worldspace`
    pub world_light: [f32; 3],
    pub ship1: ShipPlacement,
    pub ship2: ShipPlacement,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            uniform_scale: 0.1,
            hangar_distance: 300.0,
            ship_speed: 0.5,
            legacy_double_step: false,
            hangar_light_height: 10.0,
            world_light: [0.0, 0.0, 0.0],
            ship1: ShipPlacement {
                height: -10.0,
                depth: 30.0,
                base_yaw_degrees: 180.0,
            },
            ship2: ShipPlacement {
                height: 15.0,
                depth: -30.0,
                base_yaw_degrees: 0.0,
            },
        }
    }
}

impl SceneConfig {
    /// Ships only reach the opposite hangar with a positive speed and distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("scene.ship_speed", self.ship_speed),
            ("scene.hangar_distance", self.hangar_distance),
            ("scene.uniform_scale", self.uniform_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipPlacement {
    /// Y offset (pre-scale)
    pub height: f32,
    /// Z offset (pre-scale)
    pub depth: f32,
    /// Fixed rotation about +Y applied before the arrival turn
    pub base_yaw_degrees: f32,
}

impl Default for ShipPlacement {
    fn default() -> Self {
        Self {
            height: 0.0,
            depth: 0.0,
            base_yaw_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshPaths {
    pub hangar: PathBuf,
    pub torpedo: PathBuf,
    pub bola: PathBuf,
}

impl Default for MeshPaths {
    fn default() -> Self {
        Self {
            hangar: PathBuf::from("assets/Obj/hangar_modulated.obj"),
            torpedo: PathBuf::from("assets/Obj/nave_torpedo_modulated.obj"),
            bola: PathBuf::from("assets/Obj/nave_bola_modulated.obj"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub horizontal_angle_degrees: f32,
    pub vertical_angle_degrees: f32,
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// World units per second
    pub move_speed: f32,
    /// Radians per pixel of mouse motion
    pub mouse_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 60.0],
            horizontal_angle_degrees: 180.0,
            vertical_angle_degrees: 0.0,
            fov_degrees: 45.0,
            z_near: 0.1,
            z_far: 500.0,
            move_speed: 30.0,
            mouse_speed: 0.005,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_layout() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.window.title, "Naves");
        assert_eq!(config.scene.hangar_distance, 300.0);
        assert_eq!(config.scene.uniform_scale, 0.1);
        assert_eq!(config.scene.ship_speed, 0.5);
        assert!(!config.scene.legacy_double_step);
        assert_eq!(config.scene.ship1.height, -10.0);
        assert_eq!(config.scene.ship1.depth, 30.0);
        assert_eq!(config.scene.ship2.height, 15.0);
        assert_eq!(config.scene.ship2.depth, -30.0);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            [scene]
            ship_speed = 2.0
            legacy_double_step = true

            [scene.ship2]
            depth = -12.5

            [window]
            title = "Hangar test"
            "#,
        )
        .unwrap();

        assert_eq!(config.scene.ship_speed, 2.0);
        assert!(config.scene.legacy_double_step);
        assert_eq!(config.scene.hangar_distance, 300.0);
        assert_eq!(config.scene.ship2.depth, -12.5);
        // fields of a partially given table fall back to ShipPlacement::default
        assert_eq!(config.scene.ship2.height, 0.0);
        assert_eq!(config.scene.ship1, SceneConfig::default().ship1);
        assert_eq!(config.window.title, "Hangar test");
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.meshes, MeshPaths::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_bad_toml_is_rejected() {
        assert!(AppConfig::from_toml_str("[scene]\nship_speed = \"fast\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = AppConfig::load(Some(Path::new("does/not/exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    fn scene_error(toml: &str) -> Option<&'static str> {
        let config = AppConfig::from_toml_str(toml).unwrap();
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            Err(err) => panic!("unexpected error: {err}"),
            Ok(()) => None,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_positive_speed_is_rejected() {
        assert_eq!(scene_error("[scene]\nship_speed = 0.0"), Some("scene.ship_speed"));
        assert_eq!(scene_error("[scene]\nship_speed = -1.0"), Some("scene.ship_speed"));
        assert_eq!(scene_error("[scene]\nship_speed = nan"), Some("scene.ship_speed"));
        assert_eq!(scene_error("[scene]\nship_speed = inf"), Some("scene.ship_speed"));
    }

    #[test]
    fn test_non_positive_distance_is_rejected() {
        assert_eq!(scene_error("[scene]\nhangar_distance = 0.0"), Some("scene.hangar_distance"));
        assert_eq!(scene_error("[scene]\nhangar_distance = -5.0"), Some("scene.hangar_distance"));
    }

    #[test]
    fn test_non_positive_scale_is_rejected() {
        assert_eq!(scene_error("[scene]\nuniform_scale = 0.0"), Some("scene.uniform_scale"));
        assert_eq!(scene_error("[scene]\nuniform_scale = -0.1"), Some("scene.uniform_scale"));
    }

    #[test]
    fn test_invalid_file_fails_to_load() {
        let path = std::env::temp_dir().join(format!("naves-invalid-{}.toml", std::process::id()));
        fs::write(&path, "[scene]\nship_speed = -1.0\nhangar_distance = -5.0\n").unwrap();
        let result = AppConfig::load(Some(&path));
        let _ = fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "scene.ship_speed", value }) if value == -1.0
        ));
    }

    #[test]
    fn test_bundled_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_FILE);
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.scene, SceneConfig::default());
    }
}
