//! Visualization backend interface
//!
//! Everything that needs a graphics toolkit (reading snapshot files, contour
//! extraction, drawing, windows) sits behind [`VisualizationBackend`]. The
//! planning code only needs point arrays and their ranges from a grid.
//!
//! [`MemoryBackend`] keeps grids in memory and records what it was asked to
//! draw. Its "surface" is the set of grid cells whose corner samples straddle
//! the isovalue, which is where a contour filter would put triangles.

use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::camera::Camera;
use crate::error::{Result, VizError};
use crate::field::ScalarField;
use crate::scene::{LayerStyle, RenderSettings};

/// Axis-aligned extent of a grid's points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

/// Read access to a grid's named point arrays
pub trait PointData {
    /// # Errors
    /// Returns [`VizError::MissingPointArray`] when no array has that name.
    fn point_array(&self, name: &str) -> Result<&ScalarField>;

    /// Points along i, j, k
    fn dimensions(&self) -> [usize; 3];

    fn bounds(&self) -> Bounds;
}

/// A surface ready to draw, with the layer it belongs to
#[derive(Debug, Clone)]
pub struct StyledSurface<S> {
    pub layer: String,
    pub surface: S,
    pub style: LayerStyle,
}

/// External collaborator that owns file formats and graphics
pub trait VisualizationBackend {
    type Grid: PointData;
    type Surface;

    /// # Errors
    /// Backend-specific; the in-memory backend fails for unknown paths.
    fn read_structured_grid(&mut self, path: &Path) -> Result<Self::Grid>;

    /// Contour of `field` at `level`
    ///
    /// # Errors
    /// Fails when the grid has no array called `field`.
    fn build_isosurface(&self, grid: &Self::Grid, field: &str, level: f64)
        -> Result<Self::Surface>;

    /// Wireframe box around the grid
    ///
    /// # Errors
    /// Backend-specific.
    fn build_outline(&self, grid: &Self::Grid) -> Result<Self::Surface>;

    /// Draw one frame
    ///
    /// # Errors
    /// Backend-specific.
    fn render(
        &mut self,
        surfaces: &[StyledSurface<Self::Surface>],
        camera: &Camera,
        settings: &RenderSettings,
    ) -> Result<()>;
}

/// Curvilinear grid with implicit i-j-k topology, i varying fastest
#[derive(Debug, Clone)]
pub struct StructuredGrid {
    dimensions: [usize; 3],
    points: Vec<Vector3<f64>>,
    arrays: FxHashMap<String, ScalarField>,
}

impl StructuredGrid {
    /// # Errors
    /// Returns [`VizError::GridShape`] when `points` does not hold
    /// `nx·ny·nz` points or a dimension is zero.
    pub fn new(dimensions: [usize; 3], points: Vec<Vector3<f64>>) -> Result<Self> {
        let expected = point_count(dimensions, points.len())?;
        if points.len() != expected {
            let [nx, ny, nz] = dimensions;
            return Err(VizError::GridShape {
                nx,
                ny,
                nz,
                points: points.len(),
            });
        }
        Ok(Self {
            dimensions,
            points,
            arrays: FxHashMap::default(),
        })
    }

    /// Rectilinear grid with constant spacing from `origin`
    ///
    /// # Errors
    /// Returns [`VizError::GridShape`] when a dimension is zero or the point
    /// count does not fit in memory.
    pub fn uniform(dimensions: [usize; 3], origin: Vector3<f64>, spacing: Vector3<f64>) -> Result<Self> {
        let [nx, ny, nz] = dimensions;
        let mut points = Vec::with_capacity(point_count(dimensions, 0)?);
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    points.push(Vector3::new(
                        origin.x + i as f64 * spacing.x,
                        origin.y + j as f64 * spacing.y,
                        origin.z + k as f64 * spacing.z,
                    ));
                }
            }
        }
        Self::new(dimensions, points)
    }

    /// Attach a point array, replacing any array with the same name
    ///
    /// # Errors
    /// Returns [`VizError::GridShape`] when the array length differs from the
    /// point count.
    pub fn add_point_array(&mut self, field: ScalarField) -> Result<()> {
        if field.len() != self.points.len() {
            let [nx, ny, nz] = self.dimensions;
            return Err(VizError::GridShape {
                nx,
                ny,
                nz,
                points: field.len(),
            });
        }
        self.arrays.insert(field.name().to_string(), field);
        Ok(())
    }

    /// Fill a point array by evaluating `f` at every point
    ///
    /// # Errors
    /// Fails when every value is NaN.
    pub fn add_point_array_with<F>(&mut self, name: &str, f: F) -> Result<()>
    where
        F: Fn(&Vector3<f64>) -> f64 + Send + Sync,
    {
        let samples: Vec<f64> = self.points.par_iter().map(f).collect();
        self.add_point_array(ScalarField::new(name, samples)?)
    }

    #[must_use]
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Names of attached arrays, sorted
    #[must_use]
    pub fn array_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.arrays.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn point_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, _] = self.dimensions;
        (k * ny + j) * nx + i
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        let [nx, ny, nz] = self.dimensions;
        nx.saturating_sub(1) * ny.saturating_sub(1) * nz.saturating_sub(1)
    }
}

impl PointData for StructuredGrid {
    fn point_array(&self, name: &str) -> Result<&ScalarField> {
        self.arrays
            .get(name)
            .ok_or_else(|| VizError::MissingPointArray {
                name: name.to_string(),
            })
    }

    fn dimensions(&self) -> [usize; 3] {
        self.dimensions
    }

    fn bounds(&self) -> Bounds {
        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);
        for p in &self.points {
            min = min.inf(p);
            max = max.sup(p);
        }
        Bounds { min, max }
    }
}

/// Surface stand-in produced by [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellSurface {
    /// Cells (by lower corner i, j, k) that the contour passes through
    Contour {
        field: String,
        level: f64,
        cells: Vec<[usize; 3]>,
    },
    Outline { bounds: Bounds },
}

impl CellSurface {
    /// Cells touched by a contour; 0 for an outline
    #[must_use]
    pub fn cell_count(&self) -> usize {
        match self {
            CellSurface::Contour { cells, .. } => cells.len(),
            CellSurface::Outline { .. } => 0,
        }
    }
}

/// One drawn surface as recorded by [`MemoryBackend::render`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLayer {
    pub layer: String,
    pub level: Option<f64>,
    pub cells: usize,
    pub style: LayerStyle,
}

/// Everything drawn in one call to `render`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFrame {
    pub layers: Vec<RenderedLayer>,
    pub camera: Camera,
    pub settings: RenderSettings,
}

/// In-memory backend: grids registered by path, frames recorded
#[derive(Debug, Default)]
pub struct MemoryBackend {
    grids: FxHashMap<PathBuf, StructuredGrid>,
    frames: Vec<RenderedFrame>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `grid` readable at `path`
    pub fn insert_grid(&mut self, path: impl Into<PathBuf>, grid: StructuredGrid) {
        self.grids.insert(path.into(), grid);
    }

    /// Whether a grid is registered at `path`
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.grids.contains_key(path)
    }

    #[must_use]
    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }
}

impl VisualizationBackend for MemoryBackend {
    type Grid = StructuredGrid;
    type Surface = CellSurface;

    fn read_structured_grid(&mut self, path: &Path) -> Result<StructuredGrid> {
        let grid = self
            .grids
            .get(path)
            .cloned()
            .ok_or_else(|| VizError::GridNotFound {
                path: path.to_path_buf(),
            })?;
        info!(
            "Loaded structured grid {} ({:?} points)",
            path.display(),
            grid.dimensions
        );
        Ok(grid)
    }

    fn build_isosurface(&self, grid: &StructuredGrid, field: &str, level: f64) -> Result<CellSurface> {
        let samples = grid.point_array(field)?.samples();
        let [nx, ny, nz] = grid.dimensions;
        let (cx, cy, cz) = (
            nx.saturating_sub(1),
            ny.saturating_sub(1),
            nz.saturating_sub(1),
        );

        let cells: Vec<[usize; 3]> = (0..grid.cell_count())
            .into_par_iter()
            .filter_map(|c| {
                let i = c % cx;
                let j = (c / cx) % cy;
                let k = c / (cx * cy);
                let mut below = false;
                let mut above = false;
                for (di, dj, dk) in CORNERS {
                    let v = samples[grid.point_index(i + di, j + dj, k + dk)];
                    if v < level {
                        below = true;
                    } else if v >= level {
                        above = true;
                    }
                }
                (below && above).then_some([i, j, k])
            })
            .collect();

        debug!(
            "Contour {} = {:.3}: {} of {} cells",
            field,
            level,
            cells.len(),
            cx * cy * cz
        );
        Ok(CellSurface::Contour {
            field: field.to_string(),
            level,
            cells,
        })
    }

    fn build_outline(&self, grid: &StructuredGrid) -> Result<CellSurface> {
        Ok(CellSurface::Outline {
            bounds: grid.bounds(),
        })
    }

    fn render(
        &mut self,
        surfaces: &[StyledSurface<CellSurface>],
        camera: &Camera,
        settings: &RenderSettings,
    ) -> Result<()> {
        let layers = surfaces
            .iter()
            .map(|s| RenderedLayer {
                layer: s.layer.clone(),
                level: match &s.surface {
                    CellSurface::Contour { level, .. } => Some(*level),
                    CellSurface::Outline { .. } => None,
                },
                cells: s.surface.cell_count(),
                style: s.style.clone(),
            })
            .collect();
        self.frames.push(RenderedFrame {
            layers,
            camera: *camera,
            settings: settings.clone(),
        });
        Ok(())
    }
}

/// `nx·ny·nz`, rejecting zero dimensions and counts too large to allocate.
/// `points` is only reported back in the error.
fn point_count(dimensions: [usize; 3], points: usize) -> Result<usize> {
    let [nx, ny, nz] = dimensions;
    let shape_error = || VizError::GridShape { nx, ny, nz, points };
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(shape_error());
    }
    let count = nx
        .checked_mul(ny)
        .and_then(|v| v.checked_mul(nz))
        .ok_or_else(shape_error)?;
    // Vec cannot hold more than isize::MAX bytes
    let bytes = count
        .checked_mul(std::mem::size_of::<Vector3<f64>>())
        .ok_or_else(shape_error)?;
    if bytes > isize::MAX as usize {
        return Err(shape_error());
    }
    Ok(count)
}

/// Corner offsets of a hexahedral cell
const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
    (1, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (0, 1, 1),
    (1, 1, 1),
];
