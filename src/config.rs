//! Game settings loaded from JSON
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes. `joust.json` next to the binary is picked up by the front end.

use crate::error::ConfigError;
use crate::game::level::MIN_OBJECT_CAPACITY;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sprite sheet locations, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub title_sheet: String,
    pub main_sheet: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            title_sheet: "asset/Joust_Title_Screen.png".to_string(),
            main_sheet: "asset/Joust_Full_Sprite_Sheet_Bridge.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Capacity of the object and collision registries.
    pub max_objects: usize,
    /// Fixed seed for reproducible runs; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
    /// Milliseconds between spawns.
    pub spawn_cycle_ms: u32,
    /// Spawn points closer than this to an opponent are skipped.
    pub safe_spawn_radius: f32,
    pub allow_spawn_camping: bool,
    pub extra_life_points: u32,
    pub debug_draw_platforms: bool,
    pub window_scale: f32,
    pub assets: AssetConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_objects: 500,
            rng_seed: None,
            spawn_cycle_ms: 2000,
            safe_spawn_radius: 200.0,
            allow_spawn_camping: false,
            extra_life_points: 20000,
            debug_draw_platforms: false,
            window_scale: 1.0,
            assets: AssetConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_objects < MIN_OBJECT_CAPACITY {
            return Err(ConfigError::Capacity {
                max_objects: self.max_objects,
                required: MIN_OBJECT_CAPACITY,
            });
        }
        if self.spawn_cycle_ms == 0 {
            return Err(ConfigError::Invalid("spawn_cycle_ms must be at least 1".to_string()));
        }
        if !self.safe_spawn_radius.is_finite() || self.safe_spawn_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "safe_spawn_radius must be a finite, non-negative distance (got {})",
                self.safe_spawn_radius
            )));
        }
        if self.extra_life_points == 0 {
            return Err(ConfigError::Invalid("extra_life_points must be at least 1".to_string()));
        }
        if !(self.window_scale.is_finite() && self.window_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window_scale must be positive (got {})",
                self.window_scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_objects, 500);
        assert_eq!(config.spawn_cycle_ms, 2000);
        assert_eq!(config.extra_life_points, 20000);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "rng_seed": 7, "allow_spawn_camping": true }"#).unwrap();
        assert_eq!(config.rng_seed, Some(7));
        assert!(config.allow_spawn_camping);
        assert_eq!(config.safe_spawn_radius, 200.0);
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "spawn_cycle_ms": 0 }"#,
            r#"{ "safe_spawn_radius": -1.0 }"#,
            r#"{ "extra_life_points": 0 }"#,
            r#"{ "window_scale": 0.0 }"#,
        ] {
            let result = GameConfig::from_json_str(json);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "accepted {}", json);
        }
    }

    #[test]
    fn test_capacity_must_fit_the_biggest_wave() {
        for max_objects in [0, 1, MIN_OBJECT_CAPACITY - 1] {
            let json = format!(r#"{{ "max_objects": {} }}"#, max_objects);
            let result = GameConfig::from_json_str(&json);
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Capacity { required: MIN_OBJECT_CAPACITY, .. })
                ),
                "accepted {}",
                max_objects
            );
        }

        let json = format!(r#"{{ "max_objects": {} }}"#, MIN_OBJECT_CAPACITY);
        assert!(GameConfig::from_json_str(&json).is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = GameConfig::from_json_str("{ max_objects: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "max_objects": 64, "debug_draw_platforms": true }}"#).unwrap();

        let config = GameConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.max_objects, 64);
        assert!(config.debug_draw_platforms);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GameConfig::load_from_file(dir.path().join("joust.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
