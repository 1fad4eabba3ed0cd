//! Piecewise-linear color ramps
//!
//! A ramp is a list of color stops keyed by scalar value. Between two stops
//! every channel (and opacity) is interpolated linearly; outside the stops
//! the nearest end color is used.
//!
//! # Example
//! ```
//! use fire_viz_core::palette::Rgb;
//! use fire_viz_core::ramp::{AlphaRule, ColorRamp, ColorStop};
//!
//! let ramp = ColorRamp::new(vec![
//!     ColorStop::opaque(0.0, Rgb::new(0.0, 0.0, 0.0)),
//!     ColorStop::opaque(10.0, Rgb::new(1.0, 1.0, 1.0)),
//! ])
//! .unwrap();
//! let table = ramp.sample(0.0, 10.0, 3, AlphaRule::Interpolate);
//! assert!((table[1].r - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::levels::{validate_increasing, LevelSet};
use crate::palette::{Rgb, Rgba};

/// Scalars this close to zero count as zero under [`AlphaRule::ZeroTransparent`]
pub const ZERO_EPSILON: f64 = 1e-6;

/// Temperatures (K) spanned by the blue-to-red flame ramp
pub const FLAME_RANGE: (f64, f64) = (400.0, 800.0);

/// One control point of a ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: Rgb,
    pub opacity: f64,
}

impl ColorStop {
    #[must_use]
    pub const fn new(value: f64, color: Rgb, opacity: f64) -> Self {
        Self {
            value,
            color,
            opacity,
        }
    }

    #[must_use]
    pub const fn opaque(value: f64, color: Rgb) -> Self {
        Self::new(value, color, 1.0)
    }
}

/// How table entries get their alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaRule {
    /// Interpolate the stops' opacities like the color channels
    #[default]
    Interpolate,
    /// Alpha 0 where the scalar is within [`ZERO_EPSILON`] of zero, 1 elsewhere
    ZeroTransparent,
}

/// Stops sorted by strictly increasing scalar value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// # Errors
    /// Fails on an empty stop list or when the stop values are not finite
    /// and strictly increasing.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self> {
        if stops.is_empty() {
            return Err(VizError::EmptyRamp);
        }
        let values: Vec<f64> = stops.iter().map(|s| s.value).collect();
        validate_increasing(&values)?;
        Ok(Self { stops })
    }

    /// Continuous temperature ramp anchored on ambient and four levels:
    /// near-black, light smoke, darker smoke, orange, yellow
    ///
    /// # Errors
    /// Fails unless `levels` has exactly four levels, all above `theta_min`.
    pub fn temperature(theta_min: f64, levels: &LevelSet) -> Result<Self> {
        const COLORS: [Rgb; 4] = [
            Rgb::new(0.6, 0.6, 0.6),
            Rgb::new(0.3, 0.3, 0.3),
            Rgb::new(1.0, 0.4, 0.0),
            Rgb::new(1.0, 1.0, 0.0),
        ];
        if levels.len() != COLORS.len() {
            return Err(VizError::PaletteMismatch {
                colors: COLORS.len(),
                levels: levels.len(),
            });
        }
        let mut stops = vec![ColorStop::opaque(theta_min, Rgb::new(0.1, 0.1, 0.1))];
        stops.extend(
            levels
                .values()
                .into_iter()
                .zip(COLORS)
                .map(|(value, color)| ColorStop::opaque(value, color)),
        );
        Self::new(stops)
    }

    /// Blue at `lo` to red at `hi`, for absolute flame temperatures
    ///
    /// # Errors
    /// Fails unless `lo < hi`, both finite.
    pub fn flame(lo: f64, hi: f64) -> Result<Self> {
        Self::new(vec![
            ColorStop::opaque(lo, Rgb::new(0.0, 0.0, 1.0)),
            ColorStop::opaque(hi, Rgb::new(1.0, 0.0, 0.0)),
        ])
    }

    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Lowest and highest stop values
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.stops[0].value, self.stops[self.stops.len() - 1].value)
    }

    /// Color and interpolated opacity at `value`
    #[must_use]
    pub fn evaluate(&self, value: f64) -> Rgba {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if value <= first.value || value.is_nan() {
            return first.color.with_alpha(first.opacity);
        }
        if value >= last.value {
            return last.color.with_alpha(last.opacity);
        }

        // First stop strictly above value; the one before it is at or below.
        let upper = self.stops.partition_point(|s| s.value <= value);
        let lo = &self.stops[upper - 1];
        let hi = &self.stops[upper];
        let t = (value - lo.value) / (hi.value - lo.value);
        let opacity = (1.0 - t) * lo.opacity + t * hi.opacity;
        lo.color.lerp(hi.color, t).with_alpha(opacity)
    }

    /// Sample `n` table entries evenly over `[lo, hi]`
    ///
    /// Entry `i` sits at `lo + i/(n-1)·(hi − lo)`; a single entry sits at `lo`.
    #[must_use]
    pub fn sample(&self, lo: f64, hi: f64, n: usize, alpha: AlphaRule) -> Vec<Rgba> {
        (0..n)
            .map(|i| {
                let t = if n > 1 {
                    i as f64 / (n - 1) as f64
                } else {
                    0.0
                };
                let value = lo + t * (hi - lo);
                let mut rgba = self.evaluate(value);
                if alpha == AlphaRule::ZeroTransparent {
                    rgba.a = if value.abs() <= ZERO_EPSILON { 0.0 } else { 1.0 };
                }
                rgba
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::WIDE_FIRE_OFFSETS;
    use approx::assert_relative_eq;

    fn gray_ramp() -> ColorRamp {
        ColorRamp::new(vec![
            ColorStop::new(-1.0, Rgb::new(0.0, 0.0, 0.0), 0.0),
            ColorStop::new(1.0, Rgb::new(1.0, 0.5, 0.25), 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_stop_values_reproduced_exactly() {
        let levels = LevelSet::from_offsets(300.0, &WIDE_FIRE_OFFSETS, &[]).unwrap();
        let ramp = ColorRamp::temperature(300.0, &levels).unwrap();
        for stop in ramp.stops() {
            assert_eq!(ramp.evaluate(stop.value).rgb(), stop.color);
        }
    }

    #[test]
    fn test_midpoint_interpolation() {
        let rgba = gray_ramp().evaluate(0.0);
        assert_relative_eq!(rgba.r, 0.5);
        assert_relative_eq!(rgba.g, 0.25);
        assert_relative_eq!(rgba.b, 0.125);
        assert_relative_eq!(rgba.a, 0.5);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let ramp = gray_ramp();
        assert_eq!(ramp.evaluate(-5.0).rgb(), Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(ramp.evaluate(5.0).rgb(), Rgb::new(1.0, 0.5, 0.25));
        assert_eq!(ramp.domain(), (-1.0, 1.0));
    }

    #[test]
    fn test_zero_transparent_rule() {
        let table = gray_ramp().sample(-1.0, 1.0, 5, AlphaRule::ZeroTransparent);
        let alphas: Vec<f64> = table.iter().map(|c| c.a).collect();
        assert_eq!(alphas, vec![1.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_single_entry_table_samples_lo() {
        let table = gray_ramp().sample(-1.0, 1.0, 1, AlphaRule::Interpolate);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].rgb(), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_flame_ramp_blue_to_red() {
        let (lo, hi) = FLAME_RANGE;
        let ramp = ColorRamp::flame(lo, hi).unwrap();
        assert_eq!(ramp.domain(), (400.0, 800.0));
        assert_eq!(ramp.evaluate(300.0).rgb(), Rgb::new(0.0, 0.0, 1.0));
        let mid = ramp.evaluate(600.0);
        assert_relative_eq!(mid.r, 0.5);
        assert_relative_eq!(mid.b, 0.5);
        assert_eq!(mid.g, 0.0);
        assert!(ColorRamp::flame(800.0, 400.0).is_err());
    }

    #[test]
    fn test_rejects_bad_stops() {
        assert!(matches!(ColorRamp::new(Vec::new()), Err(VizError::EmptyRamp)));
        let unsorted = vec![
            ColorStop::opaque(1.0, Rgb::WHITE),
            ColorStop::opaque(0.0, Rgb::WHITE),
        ];
        assert!(ColorRamp::new(unsorted).is_err());
    }
}
