//! Named scalar point arrays
//!
//! A `ScalarField` is one point-data array of a structured grid, e.g. the
//! potential temperature `theta` (K) or the vegetation density `rhof_1`.
//! The range is computed once on construction and the samples are never
//! mutated afterwards.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, VizError};

/// Name of the potential temperature array in wildfire snapshots
pub const THETA: &str = "theta";

/// Name of the vegetation (fuel) density array in wildfire snapshots
pub const RHOF_1: &str = "rhof_1";

/// Inclusive `[min, max]` of a field's finite samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Named, immutable array of point samples
#[derive(Debug, Clone)]
pub struct ScalarField {
    name: String,
    samples: Vec<f64>,
    range: FieldRange,
}

impl ScalarField {
    /// Wrap samples under a name and compute their range.
    ///
    /// NaN samples are skipped for the range; they stay in the array.
    ///
    /// # Errors
    /// Returns [`VizError::EmptyField`] when no sample is finite.
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Result<Self> {
        let name = name.into();
        let range = compute_range(&samples).ok_or_else(|| VizError::EmptyField {
            name: name.clone(),
        })?;
        Ok(Self {
            name,
            samples,
            range,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> FieldRange {
        self.range
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.range.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.range.max
    }
}

/// Parallel min/max over the finite samples
fn compute_range(samples: &[f64]) -> Option<FieldRange> {
    let (min, max) = samples
        .par_iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        )
        .reduce(
            || (f64::INFINITY, f64::NEG_INFINITY),
            |(a_lo, a_hi), (b_lo, b_hi)| (a_lo.min(b_lo), a_hi.max(b_hi)),
        );

    (min <= max).then_some(FieldRange { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_ignores_nan() {
        let field = ScalarField::new(THETA, vec![301.0, f64::NAN, 298.0, 340.5]).unwrap();
        assert_eq!(field.min(), 298.0);
        assert_eq!(field.max(), 340.5);
        assert_eq!(field.len(), 4);
    }

    #[test]
    fn test_empty_field_rejected() {
        assert!(matches!(
            ScalarField::new(RHOF_1, Vec::new()),
            Err(VizError::EmptyField { .. })
        ));
        assert!(ScalarField::new(RHOF_1, vec![f64::NAN; 3]).is_err());
    }

    #[test]
    fn test_parallel_range_matches_sequential() {
        let samples: Vec<f64> = (0..100_000).map(|i| ((i * 7919) % 1000) as f64 * 0.25).collect();
        let field = ScalarField::new("x", samples.clone()).unwrap();
        let seq_min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let seq_max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(field.min(), seq_min);
        assert_eq!(field.max(), seq_max);
    }

    #[test]
    fn test_range_contains() {
        let range = FieldRange {
            min: 0.0,
            max: 0.6,
        };
        assert!(range.contains(0.3));
        assert!(!range.contains(0.61));
        assert!((range.span() - 0.6).abs() < 1e-12);
    }
}
