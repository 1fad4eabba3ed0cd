//! Fire Visualization Core Library
//!
//! Plans 3D isosurface visualizations of coupled fire-atmosphere simulation
//! output: which potential-temperature contours count as smoke and which as
//! fire, how vegetation density is shaded, and the lookup tables and legends
//! that go with them.
//!
//! ## Overview
//!
//! - Threshold levels relative to ambient temperature, absolute vegetation
//!   densities ([`levels`])
//! - Hand-tuned band palettes ([`palette`]) and piecewise-linear color ramps
//!   ([`ramp`])
//! - Lookup tables and scalar-bar legends ([`lookup_table`], [`scalar_bar`])
//! - Scene plans handed to a pluggable [`backend::VisualizationBackend`]
//!   ([`scene`]), camera reports and snapshot animation
//!
//! Contour extraction, drawing and file formats belong to the backend.

// Core data and errors
pub mod error;
pub mod field;

// Threshold and color math
pub mod levels;
pub mod lookup_table;
pub mod palette;
pub mod ramp;
pub mod scalar_bar;

// Scene assembly and backend plumbing
pub mod animation;
pub mod backend;
pub mod camera;
pub mod config;
pub mod scene;
pub mod synthetic;

// Re-export main types
pub use backend::{MemoryBackend, PointData, StructuredGrid, VisualizationBackend};
pub use camera::{Camera, CameraReport};
pub use config::VizConfig;
pub use error::{Result, VizError};
pub use field::{FieldRange, ScalarField};
pub use levels::{compute_levels, Level, LevelSet};
pub use lookup_table::LookupTable;
pub use palette::{BandKind, BandStyle, Palette, Rgb, Rgba};
pub use ramp::{AlphaRule, ColorRamp, ColorStop};
pub use scene::{SceneMode, SceneOptions, ScenePlan};
