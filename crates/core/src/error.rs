//! Error types for scene planning
//!
//! Almost every failure here is a configuration mistake (a non-increasing
//! offset list, a palette that does not match its levels) or a missing
//! point array. Rendering failures belong to the backend.

use std::path::PathBuf;

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, VizError>;

/// Errors raised while building levels, tables, scenes and grids
#[derive(Debug, Error)]
pub enum VizError {
    #[error("point array '{name}' not found on grid")]
    MissingPointArray { name: String },

    #[error("scalar field '{name}' has no finite samples")]
    EmptyField { name: String },

    #[error("values must be finite and strictly increasing: position {index} has {value} after {previous}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("value at position {index} is not finite: {value}")]
    NonFinite { index: usize, value: f64 },

    #[error("palette has {colors} entries but there are {levels} levels")]
    PaletteMismatch { colors: usize, levels: usize },

    #[error("color ramp needs at least one stop")]
    EmptyRamp,

    #[error("lookup table needs at least one entry")]
    EmptyTable,

    #[error("grid dimensions {nx}x{ny}x{nz} do not match {points} points")]
    GridShape {
        nx: usize,
        ny: usize,
        nz: usize,
        points: usize,
    },

    #[error("no structured grid registered at {}", path.display())]
    GridNotFound { path: PathBuf },

    #[error("animation step must be positive")]
    ZeroStep,

    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
