//! Scene planning
//!
//! A [`ScenePlan`] is everything needed to draw one snapshot: which contours
//! to extract, how to color them, the legends, the camera and the window
//! settings. It is computed from the grid's field ranges and then handed to a
//! [`VisualizationBackend`] by [`ScenePlan::realize`].
//!
//! # Layer order
//! Translucent smoke is added before fire and the domain outline comes
//! after the temperature layers, with vegetation last.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::{PointData, StyledSurface, VisualizationBackend};
use crate::camera::Camera;
use crate::error::Result;
use crate::field::{RHOF_1, THETA};
use crate::levels::{
    LevelSet, FIRE_LABELS, FIRE_OFFSETS, FLAME_ISOVALUES, VEGETATION_ISOVALUES, WIDE_FIRE_OFFSETS,
};
use crate::lookup_table::LookupTable;
use crate::palette::{BandStyle, Palette, Rgb};
use crate::ramp::{AlphaRule, ColorRamp, FLAME_RANGE};
use crate::scalar_bar::ScalarBar;

/// Entries in the continuous temperature table
pub const TEMPERATURE_RAMP_SIZE: usize = 256;

/// Which fields to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneMode {
    Fire,
    Vegetation,
    #[default]
    Combined,
}

impl SceneMode {
    #[must_use]
    pub fn shows_fire(self) -> bool {
        matches!(self, SceneMode::Fire | SceneMode::Combined)
    }

    #[must_use]
    pub fn shows_vegetation(self) -> bool {
        matches!(self, SceneMode::Vegetation | SceneMode::Combined)
    }
}

/// How temperature contours are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemperatureStyle {
    /// One solid, translucent surface per level
    #[default]
    Bands,
    /// All levels in one layer colored through a continuous ramp
    Ramp,
    /// Absolute flame isovalues colored blue to red over a fixed
    /// temperature range, independent of ambient
    FlameRange,
}

/// Window and transparency settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub background: Rgb,
    pub window_size: (u32, u32),
    pub alpha_bit_planes: bool,
    pub depth_peeling: bool,
    pub max_peels: u32,
    pub occlusion_ratio: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background: Rgb::new(0.1, 0.1, 0.15),
            window_size: (900, 700),
            alpha_bit_planes: true,
            depth_peeling: true,
            max_peels: 100,
            occlusion_ratio: 0.1,
        }
    }
}

/// What goes into a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub mode: SceneMode,
    pub temperature_style: TemperatureStyle,
    pub theta_field: String,
    pub vegetation_field: String,
    /// Offsets above the coolest sample, used with [`TemperatureStyle::Bands`]
    pub fire_offsets: Vec<f64>,
    /// Four offsets used with [`TemperatureStyle::Ramp`]
    pub ramp_offsets: Vec<f64>,
    /// Absolute isovalues (K) used with [`TemperatureStyle::FlameRange`]
    pub flame_isovalues: Vec<f64>,
    /// Table range (K) used with [`TemperatureStyle::FlameRange`]
    pub flame_range: (f64, f64),
    pub vegetation_isovalues: Vec<f64>,
    pub outline: bool,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            mode: SceneMode::default(),
            temperature_style: TemperatureStyle::default(),
            theta_field: THETA.to_string(),
            vegetation_field: RHOF_1.to_string(),
            fire_offsets: FIRE_OFFSETS.to_vec(),
            ramp_offsets: WIDE_FIRE_OFFSETS.to_vec(),
            flame_isovalues: FLAME_ISOVALUES.to_vec(),
            flame_range: FLAME_RANGE,
            vegetation_isovalues: VEGETATION_ISOVALUES.to_vec(),
            outline: true,
        }
    }
}

/// How a layer's surfaces are drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayerStyle {
    /// Single color and opacity, scalar coloring off
    Solid(BandStyle),
    /// Colored per point through a lookup table
    Mapped { field: String, table: LookupTable },
    Outline { color: Rgb, line_width: f64 },
}

/// Contours of one field (or the outline) drawn with one style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    /// `None` for the outline
    pub field: Option<String>,
    pub isovalues: Vec<f64>,
    pub style: LayerStyle,
}

/// Complete description of one rendered snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenePlan {
    pub mode: SceneMode,
    pub fire_levels: Option<LevelSet>,
    pub fire_styles: Vec<BandStyle>,
    pub vegetation_levels: Option<LevelSet>,
    pub layers: Vec<Layer>,
    pub legends: Vec<ScalarBar>,
    pub camera: Camera,
    pub settings: RenderSettings,
}

impl ScenePlan {
    /// Plan a scene from the grid's field ranges
    ///
    /// # Errors
    /// Fails when a required point array is missing, the configured offsets
    /// or isovalues are not strictly increasing, or the offsets do not match
    /// the palette.
    pub fn build<G: PointData>(
        grid: &G,
        options: &SceneOptions,
        camera: Camera,
        settings: RenderSettings,
    ) -> Result<Self> {
        let mut plan = Self {
            mode: options.mode,
            fire_levels: None,
            fire_styles: Vec::new(),
            vegetation_levels: None,
            layers: Vec::new(),
            legends: Vec::new(),
            camera,
            settings,
        };

        if options.mode.shows_fire() {
            plan.add_fire(grid, options)?;
        }
        if options.outline {
            plan.layers.push(Layer {
                name: "outline".to_string(),
                field: None,
                isovalues: Vec::new(),
                style: LayerStyle::Outline {
                    color: Rgb::WHITE,
                    line_width: 1.0,
                },
            });
        }
        if options.mode.shows_vegetation() {
            plan.add_vegetation(grid, options)?;
        }

        info!(
            "Planned {:?} scene: {} layers, {} legends",
            plan.mode,
            plan.layers.len(),
            plan.legends.len()
        );
        Ok(plan)
    }

    fn add_fire<G: PointData>(&mut self, grid: &G, options: &SceneOptions) -> Result<()> {
        let theta = grid.point_array(&options.theta_field)?;
        let theta_min = theta.min();
        info!(
            "{} range: [{:.3}, {:.3}]",
            theta.name(),
            theta_min,
            theta.max()
        );

        match options.temperature_style {
            TemperatureStyle::Bands => {
                let levels = LevelSet::from_offsets(theta_min, &options.fire_offsets, &FIRE_LABELS)?;
                let empty = levels.outside(theta.range()).len();
                debug!("{} of {} temperature levels outside the data", empty, levels.len());
                let palette = Palette::fire_smoke();
                let styles = palette.assign(&levels)?;
                for (level, style) in levels.levels().iter().zip(&styles) {
                    self.layers.push(Layer {
                        name: level.label.clone(),
                        field: Some(options.theta_field.clone()),
                        isovalues: vec![level.value],
                        style: LayerStyle::Solid(style.clone()),
                    });
                }
                let (lo, hi) = (levels.first(), levels.last());
                let table = LookupTable::from_colors(
                    lo.unwrap_or(theta_min),
                    hi.unwrap_or(theta_min),
                    &palette.colors(),
                )?;
                self.legends.push(ScalarBar::temperature(table));
                self.fire_styles = styles;
                self.fire_levels = Some(levels);
            }
            TemperatureStyle::Ramp => {
                let levels = LevelSet::from_offsets(theta_min, &options.ramp_offsets, &[])?;
                let empty = levels.outside(theta.range()).len();
                debug!("{} of {} ramp levels outside the data", empty, levels.len());
                let ramp = ColorRamp::temperature(theta_min, &levels)?;
                let (lo, hi) = ramp.domain();
                let table = LookupTable::from_ramp(
                    lo,
                    hi,
                    TEMPERATURE_RAMP_SIZE,
                    &ramp,
                    AlphaRule::Interpolate,
                )?;
                self.layers.push(Layer {
                    name: "temperature".to_string(),
                    field: Some(options.theta_field.clone()),
                    isovalues: levels.values(),
                    style: LayerStyle::Mapped {
                        field: options.theta_field.clone(),
                        table: table.clone(),
                    },
                });
                self.legends.push(ScalarBar::temperature(table));
                self.fire_levels = Some(levels);
            }
            TemperatureStyle::FlameRange => {
                let levels = LevelSet::absolute(&options.flame_isovalues, &[])?;
                let empty = levels.outside(theta.range()).len();
                debug!("{} of {} flame levels outside the data", empty, levels.len());
                let (lo, hi) = options.flame_range;
                let ramp = ColorRamp::flame(lo, hi)?;
                let table = LookupTable::from_ramp(
                    lo,
                    hi,
                    TEMPERATURE_RAMP_SIZE,
                    &ramp,
                    AlphaRule::Interpolate,
                )?;
                self.layers.push(Layer {
                    name: "flame".to_string(),
                    field: Some(options.theta_field.clone()),
                    isovalues: levels.values(),
                    style: LayerStyle::Mapped {
                        field: options.theta_field.clone(),
                        table: table.clone(),
                    },
                });
                self.legends.push(ScalarBar::temperature(table));
                self.fire_levels = Some(levels);
            }
        }
        Ok(())
    }

    fn add_vegetation<G: PointData>(&mut self, grid: &G, options: &SceneOptions) -> Result<()> {
        let rhof = grid.point_array(&options.vegetation_field)?;
        let levels = LevelSet::absolute(&options.vegetation_isovalues, &[])?;
        let empty = levels.outside(rhof.range()).len();
        debug!("{} of {} vegetation levels outside the data", empty, levels.len());
        let table = LookupTable::vegetation(rhof.min(), rhof.max())?;
        self.layers.push(Layer {
            name: "vegetation".to_string(),
            field: Some(options.vegetation_field.clone()),
            isovalues: levels.values(),
            style: LayerStyle::Mapped {
                field: options.vegetation_field.clone(),
                table: table.clone(),
            },
        });
        self.legends.push(ScalarBar::vegetation(table));
        self.vegetation_levels = Some(levels);
        Ok(())
    }

    /// Band style for a temperature, or `None` below the first band
    #[must_use]
    pub fn fire_band(&self, theta: f64) -> Option<&BandStyle> {
        let index = self.fire_levels.as_ref()?.band_index(theta)?;
        self.fire_styles.get(index)
    }

    /// Extract every layer's surfaces from `grid` and draw them
    ///
    /// # Errors
    /// Propagates backend failures.
    pub fn realize<B: VisualizationBackend>(&self, backend: &mut B, grid: &B::Grid) -> Result<()> {
        let mut surfaces = Vec::new();
        for layer in &self.layers {
            match &layer.field {
                Some(field) => {
                    for &level in &layer.isovalues {
                        surfaces.push(StyledSurface {
                            layer: layer.name.clone(),
                            surface: backend.build_isosurface(grid, field, level)?,
                            style: layer.style.clone(),
                        });
                    }
                }
                None => surfaces.push(StyledSurface {
                    layer: layer.name.clone(),
                    surface: backend.build_outline(grid)?,
                    style: layer.style.clone(),
                }),
            }
        }
        debug!("Rendering {} surfaces", surfaces.len());
        backend.render(&surfaces, &self.camera, &self.settings)
    }
}
