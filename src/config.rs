//! Scene configuration with TOML file support.
//!
//! Every section uses `#[serde(default)]`, so a file that only overrides
//! `[morph]` leaves everything else at its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::morph::DEFAULT_MORPH_RATE;
use crate::systems::{FOLIAGE_SMOOTHING, ORNAMENT_SMOOTHING, SPIRAL_SMOOTHING};

/// Top-level scene settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for attribute generation; random per run when absent.
    pub seed: Option<u64>,
    /// Window title and size.
    pub window: WindowConfig,
    /// Morph driver parameters.
    pub morph: MorphConfig,
    /// Per-renderer progress lag.
    pub smoothing: SmoothingConfig,
    /// Output settings.
    pub render: RenderConfig,
    /// Orbit camera.
    pub camera: CameraConfig,
}

impl SceneConfig {
    /// Load from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Save to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tinsel".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MorphConfig {
    /// Approach speed of the shared progress, per second.
    pub rate: f32,
    /// Whether the scene starts heading toward the assembled tree.
    pub start_formed: bool,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_MORPH_RATE,
            start_formed: true,
        }
    }
}

/// Follow factors per 60 Hz frame; `1.0` means no extra lag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub foliage: f32,
    pub spirals: f32,
    pub ornaments: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            foliage: FOLIAGE_SMOOTHING,
            spirals: SPIRAL_SMOOTHING,
            ornaments: ORNAMENT_SMOOTHING,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on the device pixel ratio fed to the point shaders.
    pub max_pixel_ratio: f32,
    /// Clear colour, linear RGB.
    pub background: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl RenderConfig {
    /// Pixel ratio uniform for a window scale factor.
    pub fn pixel_ratio(&self, scale_factor: f64) -> f32 {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor as f32
        } else {
            1.0
        };
        scale.min(self.max_pixel_ratio.max(1.0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            distance: 35.0,
            min_distance: 15.0,
            max_distance: 60.0,
            auto_rotate_speed: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_toml() {
        let config = SceneConfig {
            seed: Some(7),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SceneConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let text = r"
[morph]
rate = 3.0
";
        let config: SceneConfig = toml::from_str(text).unwrap();
        assert_eq!(config.morph.rate, 3.0);
        assert!(config.morph.start_formed);
        assert_eq!(config.smoothing.foliage, 0.08);
        assert_eq!(config.camera.max_distance, 60.0);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let err = toml::from_str::<SceneConfig>("morph = 5").map_err(ConfigError::from);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let render = RenderConfig::default();
        assert_eq!(render.pixel_ratio(3.0), 2.0);
        assert_eq!(render.pixel_ratio(1.25), 1.25);
        assert_eq!(render.pixel_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("tinsel-config-{}", std::process::id()));
        let path = dir.join("scene.toml");
        let mut config = SceneConfig::default();
        config.window.title = "Test".to_string();
        config.save(&path).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneConfig::load(Path::new("/nonexistent/tinsel.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
