//! TOML configuration
//!
//! Every section and field is optional; anything missing keeps the built-in
//! wildfire defaults.
//!
//! ```toml
//! camera_preset = "saved"
//!
//! [scene]
//! mode = "fire"
//! fire_offsets = [2.0, 4.0, 5.5, 7.0, 25.0]
//!
//! [camera]
//! position = [1166.9, -2348.9, 2780.6]
//! focal_point = [101.0, -1.0, 449.7]
//! view_up = [-0.269, 0.614, 0.742]
//!
//! [animation]
//! directory = "mountain_backcurve40"
//! start = 10000
//! end = 20000
//! step = 1000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::animation::{SnapshotRange, FRAME_INTERVAL};
use crate::backend::PointData;
use crate::camera::Camera;
use crate::error::{Result, VizError};
use crate::scene::{RenderSettings, SceneOptions};
use crate::synthetic::PlumeParams;

/// Snapshot directory, step range and timer period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub directory: PathBuf,
    #[serde(flatten)]
    pub range: SnapshotRange,
    pub interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("mountain_backcurve40"),
            range: SnapshotRange::default(),
            interval_ms: FRAME_INTERVAL.as_millis() as u64,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Where the camera starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraPreset {
    /// The `[camera]` pose as given
    #[default]
    Saved,
    /// Fit the grid bounds, then orbit ([`Camera::orbit_bounds`])
    Orbit,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub scene: SceneOptions,
    pub camera_preset: CameraPreset,
    pub camera: Camera,
    pub render: RenderSettings,
    pub animation: AnimationConfig,
    /// Shape of the synthetic snapshots used without real output files
    pub plume: PlumeParams,
}

impl VizConfig {
    /// Starting camera for `grid` under the configured preset
    #[must_use]
    pub fn camera_for<G: PointData>(&self, grid: &G) -> Camera {
        match self.camera_preset {
            CameraPreset::Saved => self.camera,
            CameraPreset::Orbit => Camera::orbit_bounds(&grid.bounds()),
        }
    }

    /// # Errors
    /// Returns [`VizError::ConfigParse`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| VizError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneMode, TemperatureStyle};

    #[test]
    fn test_empty_config_is_default() {
        let config = VizConfig::from_toml_str("").unwrap();
        assert_eq!(config, VizConfig::default());
        assert_eq!(config.animation.interval(), Duration::from_millis(600));
    }

    #[test]
    fn test_partial_sections() {
        let config = VizConfig::from_toml_str(
            r#"
            [scene]
            mode = "vegetation"
            temperature_style = "ramp"
            vegetation_isovalues = [0.2, 0.4]

            [render]
            window_size = [1280, 720]

            [animation]
            start = 1000
            end = 3000
            step = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.mode, SceneMode::Vegetation);
        assert_eq!(config.scene.temperature_style, TemperatureStyle::Ramp);
        assert_eq!(config.scene.vegetation_isovalues, vec![0.2, 0.4]);
        assert_eq!(config.scene.theta_field, "theta");
        assert_eq!(config.render.window_size, (1280, 720));
        assert_eq!(config.render.max_peels, 100);
        assert_eq!(config.animation.range.steps().unwrap().len(), 5);
        assert_eq!(config.camera, Camera::default());
    }

    #[test]
    fn test_orbit_preset_and_plume_section() {
        let config = VizConfig::from_toml_str(
            r#"
            camera_preset = "orbit"

            [scene]
            temperature_style = "flame-range"

            [plume]
            dimensions = [6, 5, 4]
            ambient = 290.0
            "#,
        )
        .unwrap();
        assert_eq!(config.camera_preset, CameraPreset::Orbit);
        assert_eq!(config.scene.temperature_style, TemperatureStyle::FlameRange);
        assert_eq!(config.plume.dimensions, [6, 5, 4]);
        assert_eq!(config.plume.ambient, 290.0);
        assert_eq!(config.plume.radius, PlumeParams::default().radius);

        let grid = crate::synthetic::plume_snapshot(&config.plume).unwrap();
        let camera = config.camera_for(&grid);
        assert_eq!(camera, Camera::orbit_bounds(&grid.bounds()));
        assert_ne!(camera, Camera::default());

        let saved = VizConfig::default();
        assert_eq!(saved.camera_for(&grid), Camera::default());
    }

    #[test]
    fn test_bad_config_reports_parse_error() {
        let err = VizConfig::from_toml_str("[scene]\nmode = 3").unwrap_err();
        assert!(matches!(err, VizError::ConfigParse(_)));
        let err = VizConfig::load(Path::new("/nonexistent/viz.toml")).unwrap_err();
        assert!(matches!(err, VizError::ConfigIo { .. }));
    }
}
