//! Synthetic wildfire snapshots
//!
//! Builds structured grids that look like coupled fire-atmosphere output:
//! ambient potential temperature with a Gaussian hot plume that leans
//! downwind with height, over a canopy layer of vegetation density that is
//! consumed under the plume. Used by the headless demo and by tests in
//! place of real snapshot files.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::backend::StructuredGrid;
use crate::error::Result;
use crate::field::{RHOF_1, THETA};

/// Shape of the synthetic plume and canopy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeParams {
    /// Points along x, y, z
    pub dimensions: [usize; 3],
    /// Grid spacing (m)
    pub spacing: [f64; 3],
    /// Ambient potential temperature (K)
    pub ambient: f64,
    /// Plume core excess temperature (K)
    pub peak_excess: f64,
    /// Plume base position (m)
    pub source: [f64; 2],
    /// Plume e-folding radius (m)
    pub radius: f64,
    /// Downwind drift of the plume axis per metre of height
    pub lean: f64,
    /// Canopy top (m)
    pub canopy_height: f64,
    /// Unburnt fuel density (kg/m³)
    pub fuel_density: f64,
}

impl Default for PlumeParams {
    fn default() -> Self {
        Self {
            dimensions: [24, 24, 16],
            spacing: [10.0, 10.0, 10.0],
            ambient: 298.0,
            peak_excess: 60.0,
            source: [80.0, 115.0],
            radius: 30.0,
            lean: 0.5,
            canopy_height: 40.0,
            fuel_density: 0.7,
        }
    }
}

impl PlumeParams {
    /// Same plume with its source moved `distance` metres downwind (+x),
    /// e.g. for successive animation frames
    #[must_use]
    pub fn advanced(&self, distance: f64) -> Self {
        let mut next = *self;
        next.source[0] += distance;
        next
    }

    /// Potential temperature at `p`
    #[must_use]
    pub fn theta(&self, p: &Vector3<f64>) -> f64 {
        let axis_x = self.source[0] + self.lean * p.z;
        let dx = p.x - axis_x;
        let dy = p.y - self.source[1];
        let r2 = (dx * dx + dy * dy) / (self.radius * self.radius);
        // Plume cools with height
        let decay = (-p.z / (4.0 * self.radius)).exp();
        self.ambient + self.peak_excess * decay * (-r2).exp()
    }

    /// Vegetation density at `p`; zero above the canopy and where burnt
    #[must_use]
    pub fn vegetation(&self, p: &Vector3<f64>) -> f64 {
        if p.z > self.canopy_height {
            return 0.0;
        }
        let dx = p.x - self.source[0];
        let dy = p.y - self.source[1];
        let burnt = (-(dx * dx + dy * dy) / (self.radius * self.radius)).exp();
        let profile = 1.0 - p.z / (self.canopy_height + 1e-9) * 0.5;
        (self.fuel_density * profile * (1.0 - burnt)).max(0.0)
    }
}

/// Uniform grid with `theta` and `rhof_1` point arrays
///
/// # Errors
/// Fails when a dimension is zero.
pub fn plume_snapshot(params: &PlumeParams) -> Result<StructuredGrid> {
    let [sx, sy, sz] = params.spacing;
    let mut grid = StructuredGrid::uniform(
        params.dimensions,
        Vector3::zeros(),
        Vector3::new(sx, sy, sz),
    )?;
    grid.add_point_array_with(THETA, |p| params.theta(p))?;
    grid.add_point_array_with(RHOF_1, |p| params.vegetation(p))?;
    Ok(grid)
}
