//! Scalar-to-color lookup tables
//!
//! A table is `N` RGBA entries spread evenly over a scalar range. Values are
//! mapped to entries with `floor((v - lo) · N / (hi - lo))`, clamped to the
//! table, which is the convention legends and mappers expect.
//!
//! Three ways to fill a table:
//! - one entry per band color ([`LookupTable::from_colors`]),
//! - sampled from a [`ColorRamp`] ([`LookupTable::from_ramp`]),
//! - linear hue/saturation/value ranges ([`LookupTable::from_hsv`]).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, VizError};
use crate::palette::{Rgb, Rgba};
use crate::ramp::{AlphaRule, ColorRamp};

/// Range substituted when a requested range is unusable
pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

/// Entry count of the vegetation density table
pub const VEGETATION_TABLE_SIZE: usize = 256;

/// Per-channel transform applied after HSV → RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RampMode {
    Linear,
    /// `0.5·(1 + cos((1 − c)·π))`, the classic lookup-table default
    #[default]
    SCurve,
}

impl RampMode {
    fn apply(self, c: f64) -> f64 {
        match self {
            RampMode::Linear => c,
            RampMode::SCurve => 0.5 * (1.0 + ((1.0 - c) * PI).cos()),
        }
    }
}

/// Start and end of a linearly varied HSV channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub start: f64,
    pub end: f64,
}

impl ChannelRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn constant(value: f64) -> Self {
        Self::new(value, value)
    }
}

/// Hue, saturation, value and alpha ranges of an HSV-built table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRanges {
    pub hue: ChannelRange,
    pub saturation: ChannelRange,
    pub value: ChannelRange,
    pub alpha: ChannelRange,
}

impl HsvRanges {
    /// Pure green, light to dark, never washed out
    #[must_use]
    pub const fn vegetation() -> Self {
        Self {
            hue: ChannelRange::constant(0.33),
            saturation: ChannelRange::new(0.6, 1.0),
            value: ChannelRange::new(1.0, 0.4),
            alpha: ChannelRange::constant(1.0),
        }
    }
}

/// Convert hue/saturation/value in `[0, 1]` to RGB
///
/// Hue is split into six sectors of width 1/6 starting at red.
#[must_use]
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    const ONE_SIXTH: f64 = 1.0 / 6.0;
    const ONE_THIRD: f64 = 1.0 / 3.0;
    const TWO_THIRDS: f64 = 2.0 / 3.0;
    const FIVE_SIXTHS: f64 = 5.0 / 6.0;

    let (r, g, b) = if h > ONE_SIXTH && h <= ONE_THIRD {
        ((ONE_THIRD - h) / ONE_SIXTH, 1.0, 0.0)
    } else if h > ONE_THIRD && h <= 0.5 {
        (0.0, 1.0, (h - ONE_THIRD) / ONE_SIXTH)
    } else if h > 0.5 && h <= TWO_THIRDS {
        (0.0, (TWO_THIRDS - h) / ONE_SIXTH, 1.0)
    } else if h > TWO_THIRDS && h <= FIVE_SIXTHS {
        ((h - TWO_THIRDS) / ONE_SIXTH, 0.0, 1.0)
    } else if h > FIVE_SIXTHS && h <= 1.0 {
        (1.0, 0.0, (1.0 - h) / ONE_SIXTH)
    } else {
        (1.0, h / ONE_SIXTH, 0.0)
    };

    // Blend toward white by (1 - s), then scale by value.
    Rgb::new(
        (s * r + 1.0 - s) * v,
        (s * g + 1.0 - s) * v,
        (s * b + 1.0 - s) * v,
    )
}

/// `N` RGBA entries over `[lo, hi]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupTable {
    range: (f64, f64),
    entries: Vec<Rgba>,
}

impl LookupTable {
    /// One opaque entry per color, e.g. a temperature legend with one slot
    /// per level
    ///
    /// # Errors
    /// Returns [`VizError::EmptyTable`] when `colors` is empty.
    pub fn from_colors(lo: f64, hi: f64, colors: &[Rgb]) -> Result<Self> {
        if colors.is_empty() {
            return Err(VizError::EmptyTable);
        }
        let mut table = Self {
            range: DEFAULT_RANGE,
            entries: colors.iter().map(|c| c.with_alpha(1.0)).collect(),
        };
        table.set_range_or_default(lo, hi);
        Ok(table)
    }

    /// `n` entries sampled from `ramp` over `[lo, hi]`
    ///
    /// # Errors
    /// Returns [`VizError::EmptyTable`] when `n` is zero.
    pub fn from_ramp(lo: f64, hi: f64, n: usize, ramp: &ColorRamp, alpha: AlphaRule) -> Result<Self> {
        if n == 0 {
            return Err(VizError::EmptyTable);
        }
        let mut table = Self {
            range: DEFAULT_RANGE,
            entries: Vec::new(),
        };
        table.set_range_or_default(lo, hi);
        let (lo, hi) = table.range;
        table.entries = ramp.sample(lo, hi, n, alpha);
        Ok(table)
    }

    /// `n` entries with every HSV channel varied linearly from start to end
    ///
    /// # Errors
    /// Returns [`VizError::EmptyTable`] when `n` is zero.
    pub fn from_hsv(lo: f64, hi: f64, n: usize, ranges: HsvRanges, mode: RampMode) -> Result<Self> {
        if n == 0 {
            return Err(VizError::EmptyTable);
        }
        let max_index = (n - 1) as f64;
        let step = |range: ChannelRange| {
            if n > 1 {
                (range.end - range.start) / max_index
            } else {
                0.0
            }
        };
        let (h_inc, s_inc, v_inc, a_inc) = (
            step(ranges.hue),
            step(ranges.saturation),
            step(ranges.value),
            step(ranges.alpha),
        );

        let entries = (0..n)
            .map(|i| {
                let i = i as f64;
                let rgb = hsv_to_rgb(
                    ranges.hue.start + i * h_inc,
                    ranges.saturation.start + i * s_inc,
                    ranges.value.start + i * v_inc,
                );
                Rgba {
                    r: mode.apply(rgb.r),
                    g: mode.apply(rgb.g),
                    b: mode.apply(rgb.b),
                    a: ranges.alpha.start + i * a_inc,
                }
            })
            .collect();

        let mut table = Self {
            range: DEFAULT_RANGE,
            entries,
        };
        table.set_range_or_default(lo, hi);
        Ok(table)
    }

    /// The 256-entry green vegetation table over the density range
    ///
    /// # Errors
    /// Never fails for the built-in size; the `Result` follows `from_hsv`.
    pub fn vegetation(lo: f64, hi: f64) -> Result<Self> {
        Self::from_hsv(
            lo,
            hi,
            VEGETATION_TABLE_SIZE,
            HsvRanges::vegetation(),
            RampMode::default(),
        )
    }

    /// Set the scalar range, falling back to [`DEFAULT_RANGE`] when `lo`
    /// and `hi` are not finite or `lo >= hi`
    ///
    /// Returns `true` when the requested range was applied.
    pub fn set_range_or_default(&mut self, lo: f64, hi: f64) -> bool {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            self.range = (lo, hi);
            true
        } else {
            warn!(
                "Unusable lookup table range [{}, {}], using [{}, {}]",
                lo, hi, DEFAULT_RANGE.0, DEFAULT_RANGE.1
            );
            self.range = DEFAULT_RANGE;
            false
        }
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry index for `value`, clamped to the table
    #[must_use]
    pub fn index_of(&self, value: f64) -> usize {
        let n = self.entries.len();
        if n == 0 || value.is_nan() {
            return 0;
        }
        let (lo, hi) = self.range;
        let scaled = (value - lo) * n as f64 / (hi - lo);
        if scaled <= 0.0 {
            0
        } else {
            (scaled.floor() as usize).min(n - 1)
        }
    }

    /// Entry color for `value`
    #[must_use]
    pub fn color_of(&self, value: f64) -> Rgba {
        self.entries[self.index_of(value)]
    }
}
