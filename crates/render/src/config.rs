//! Scene configuration.
//!
//! Every field defaults to the reference scene, so an empty YAML document
//! (or no file at all) reproduces it exactly:
//!
//! ```yaml
//! board:
//!   tile_size: 25.0
//! tiles:
//!   light: "#ffffff"
//!   dark: "#444444"
//! renderer:
//!   shadows: true
//!   antialias: true
//! ```

use crate::scene::Material;
use chessboard_common::Color;
use chessboard_layout::{BoardSpec, LayoutError, PieceShape};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileMaterials {
    pub light: Material,
    pub dark: Material,
}

impl Default for TileMaterials {
    fn default() -> Self {
        Self {
            light: Material::with_color(Color::from_hex(0xffffff)),
            dark: Material::with_color(Color::from_hex(0x444444)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceConfig {
    pub shape: PieceShape,
    pub light: Material,
    pub dark: Material,
}

impl Default for PieceConfig {
    fn default() -> Self {
        Self {
            shape: PieceShape::default(),
            light: Material {
                color: Color::from_hex(0xffffff),
                metalness: 0.6,
                roughness: 0.4,
            },
            dark: Material {
                color: Color::from_hex(0x111111),
                metalness: 0.6,
                roughness: 0.4,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
}

impl Default for DirectionalConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.8,
            position: Vec3::new(100.0, 200.0, 100.0),
            target: Vec3::ZERO,
            cast_shadow: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 200.0, 300.0),
            target: Vec3::ZERO,
        }
    }
}

/// Backend-facing switches. Read by GPU renderers at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub shadows: bool,
    /// Edge length of the square shadow depth map, in texels.
    pub shadow_map_size: u32,
    /// Request 4x multisampling when the adapter supports it.
    pub antialias: bool,
    pub clear_color: Color,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            shadows: true,
            shadow_map_size: 2048,
            antialias: true,
            clear_color: Color::BLACK,
        }
    }
}

/// Complete description of the scene to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub board: BoardSpec,
    pub tiles: TileMaterials,
    pub pieces: PieceConfig,
    pub ambient: AmbientConfig,
    pub directional: DirectionalConfig,
    pub camera: CameraConfig,
    pub renderer: RendererSettings,
}

impl SceneConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a defaulted struct.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        self.pieces.shape.validate()?;

        for (field, material) in [
            ("tiles.light", &self.tiles.light),
            ("tiles.dark", &self.tiles.dark),
            ("pieces.light", &self.pieces.light),
            ("pieces.dark", &self.pieces.dark),
        ] {
            if !unit_range(material.metalness) || !unit_range(material.roughness) {
                return Err(invalid(field, "metalness and roughness must lie in [0, 1]"));
            }
        }

        if !non_negative(self.ambient.intensity) {
            return Err(invalid("ambient.intensity", "must be a non-negative number"));
        }
        if !non_negative(self.directional.intensity) {
            return Err(invalid("directional.intensity", "must be a non-negative number"));
        }
        if self.directional.position == self.directional.target {
            return Err(invalid("directional", "position and target coincide"));
        }

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must lie in (0, 180)"));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(invalid("camera", "require 0 < near < far"));
        }
        if cam.position == cam.target {
            return Err(invalid("camera", "position and target coincide"));
        }

        let size = self.renderer.shadow_map_size;
        if !(256..=8192).contains(&size) {
            return Err(invalid(
                "renderer.shadow_map_size",
                format!("{size} is outside 256..=8192"),
            ));
        }
        Ok(())
    }
}

fn unit_range(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.board.tile_size, 25.0);
        assert_eq!(config.tiles.dark.color.hex(), 0x444444);
        assert_eq!(config.pieces.dark.color.hex(), 0x111111);
        assert_eq!(config.pieces.light.metalness, 0.6);
        assert_eq!(config.ambient.intensity, 0.6);
        assert_eq!(config.directional.position, Vec3::new(100.0, 200.0, 100.0));
        assert_eq!(config.camera.fov_degrees, 45.0);
        assert!(config.renderer.shadows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SceneConfig::from_yaml_str("").unwrap(), SceneConfig::default());
        assert_eq!(
            SceneConfig::from_yaml_str("{}").unwrap(),
            SceneConfig::default()
        );
    }

    #[test]
    fn partial_yaml_overrides() {
        let yaml = r##"
board:
  tile_size: 10.0
tiles:
  dark:
    color: "#663300"
renderer:
  shadows: false
camera:
  position: [0.0, 50.0, 80.0]
"##;
        let config = SceneConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.board.tile_size, 10.0);
        assert_eq!(config.board.dimension, 8);
        assert_eq!(config.tiles.dark.color.hex(), 0x663300);
        assert_eq!(config.tiles.dark.roughness, 1.0);
        assert_eq!(config.tiles.light.color.hex(), 0xffffff);
        assert!(!config.renderer.shadows);
        assert_eq!(config.camera.position, Vec3::new(0.0, 50.0, 80.0));
    }

    #[test]
    fn yaml_round_trip() {
        let text = SceneConfig::default().to_yaml_string().unwrap();
        assert!(text.contains("'#444444'") || text.contains("\"#444444\""));
        assert_eq!(
            SceneConfig::from_yaml_str(&text).unwrap(),
            SceneConfig::default()
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let err = SceneConfig::from_yaml_str("board:\n  tile_size: -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Layout(LayoutError::NonPositiveTileSize(_))));

        let err = SceneConfig::from_yaml_str("camera:\n  near: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera", .. }));

        let err = SceneConfig::from_yaml_str("pieces:\n  dark:\n    metalness: 2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "pieces.dark", .. }));

        let err = SceneConfig::from_yaml_str("renderer:\n  shadow_map_size: 16\n").unwrap_err();
        assert!(err.to_string().contains("shadow_map_size"));
    }

    #[test]
    fn rejects_oversized_board_and_shape() {
        let err = SceneConfig::from_yaml_str("board:\n  dimension: 100000\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Layout(LayoutError::DimensionTooLarge(100_000))
        ));

        let yaml = "pieces:\n  shape:\n    radial_segments: 4294967295\n";
        let err = SceneConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Layout(LayoutError::TooManySegments(u32::MAX))
        ));
    }

    #[test]
    fn rejects_bad_colour() {
        let err = SceneConfig::from_yaml_str("tiles:\n  light:\n    color: \"#12\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "ambient:\n  intensity: 0.25").unwrap();
        let config = SceneConfig::load(tmp.path()).unwrap();
        assert_eq!(config.ambient.intensity, 0.25);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SceneConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
