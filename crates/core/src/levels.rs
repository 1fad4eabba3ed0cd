//! Isovalue selection
//!
//! Temperature levels are relative: each one sits a fixed offset above the
//! coolest sample of the snapshot (the ambient potential temperature), so the
//! same offsets work across snapshots and across runs with different ambient
//! conditions. Vegetation levels are absolute densities.
//!
//! # Example
//! ```
//! use fire_viz_core::levels::{compute_levels, FIRE_OFFSETS};
//!
//! let levels = compute_levels(298.0, &FIRE_OFFSETS);
//! assert_eq!(levels, vec![300.0, 302.0, 303.5, 305.0, 323.0]);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, VizError};
use crate::field::FieldRange;

/// Offsets above ambient: smoke (cool), smoke (warmer), fire (hot),
/// fire (hotter), fire (very hot)
pub const FIRE_OFFSETS: [f64; 5] = [2.0, 4.0, 5.5, 7.0, 25.0];

/// Band labels matching [`FIRE_OFFSETS`]
pub const FIRE_LABELS: [&str; 5] = [
    "smoke (cool)",
    "smoke (warmer)",
    "fire (hot)",
    "fire (hotter)",
    "fire (very hot)",
];

/// Wider spacing used with the continuous temperature ramp: barely above
/// ambient, smoke, hot, very hot
pub const WIDE_FIRE_OFFSETS: [f64; 4] = [1.0, 5.0, 20.0, 80.0];

/// Absolute flame-temperature isovalues (K)
pub const FLAME_ISOVALUES: [f64; 4] = [450.0, 550.0, 650.0, 750.0];

/// Vegetation density isovalues
pub const VEGETATION_ISOVALUES: [f64; 6] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];

/// Add each offset to `min`.
///
/// Order is preserved, so increasing offsets give increasing levels.
#[must_use]
pub fn compute_levels(min: f64, offsets: &[f64]) -> Vec<f64> {
    offsets.iter().map(|offset| min + offset).collect()
}

/// Check that `values` are finite and strictly increasing
///
/// # Errors
/// Names the first position that breaks the ordering or is not finite.
pub fn validate_increasing(values: &[f64]) -> Result<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(VizError::NonFinite { index, value });
        }
        if index > 0 && value <= values[index - 1] {
            return Err(VizError::NotIncreasing {
                index,
                previous: values[index - 1],
                value,
            });
        }
    }
    Ok(())
}

/// One threshold with its band label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Level {
    pub label: String,
    pub value: f64,
}

/// Strictly increasing thresholds that split a field into bands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    /// Levels `min + offset` for each offset.
    ///
    /// Labels are taken from `labels` by position; missing labels become
    /// `"level <n>"`.
    ///
    /// # Errors
    /// Fails when the offsets are not finite and strictly increasing. The
    /// sums are checked too: with a `min` so large that neighbouring
    /// offsets are below its float resolution (around 1e16 for unit
    /// offsets) two levels round to the same value and this returns
    /// [`VizError::NotIncreasing`]. Temperatures never get near that.
    pub fn from_offsets(min: f64, offsets: &[f64], labels: &[&str]) -> Result<Self> {
        validate_increasing(offsets)?;
        Self::labelled(compute_levels(min, offsets), labels)
    }

    /// Fixed absolute isovalues, e.g. vegetation density.
    ///
    /// # Errors
    /// Fails when the values are not finite and strictly increasing.
    pub fn absolute(values: &[f64], labels: &[&str]) -> Result<Self> {
        Self::labelled(values.to_vec(), labels)
    }

    /// The five smoke/fire levels above `theta_min`
    #[must_use]
    pub fn fire(theta_min: f64) -> Self {
        let levels = compute_levels(theta_min, &FIRE_OFFSETS)
            .into_iter()
            .zip(FIRE_LABELS)
            .map(|(value, label)| Level {
                label: label.to_string(),
                value,
            })
            .collect();
        Self { levels }
    }

    /// The six vegetation density levels
    #[must_use]
    pub fn vegetation() -> Self {
        let levels = VEGETATION_ISOVALUES
            .iter()
            .map(|&value| Level {
                label: format!("density {value:.1}"),
                value,
            })
            .collect();
        Self { levels }
    }

    fn labelled(values: Vec<f64>, labels: &[&str]) -> Result<Self> {
        validate_increasing(&values)?;
        let levels = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Level {
                label: labels
                    .get(i)
                    .map_or_else(|| format!("level {}", i + 1), |l| (*l).to_string()),
                value,
            })
            .collect();
        Ok(Self { levels })
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.levels.iter().map(|l| l.value).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<f64> {
        self.levels.first().map(|l| l.value)
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.levels.last().map(|l| l.value)
    }

    /// Index of the highest level that `value` reaches
    ///
    /// `None` below the first level (ambient air, bare ground).
    #[must_use]
    pub fn band_index(&self, value: f64) -> Option<usize> {
        let reached = self.levels.partition_point(|l| l.value <= value);
        reached.checked_sub(1)
    }

    /// Levels that fall outside `range` and will produce empty surfaces
    #[must_use]
    pub fn outside(&self, range: FieldRange) -> Vec<&Level> {
        let outside: Vec<&Level> = self
            .levels
            .iter()
            .filter(|l| !range.contains(l.value))
            .collect();
        for level in &outside {
            debug!(
                "Level '{}' = {:.3} outside field range [{:.3}, {:.3}]",
                level.label, level.value, range.min, range.max
            );
        }
        outside
    }
}
