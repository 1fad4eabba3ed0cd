//! Hand-tuned band colors
//!
//! Smoke is drawn gray and translucent so the fire core shows through it;
//! fire goes red → orange → yellow and gets more opaque as it gets hotter.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::levels::LevelSet;

/// Linear RGB with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Component-wise `(1 − t)·self + t·other`, exact at both ends
    #[must_use]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let s = 1.0 - t;
        Rgb {
            r: s * self.r + t * other.r,
            g: s * self.g + t * other.g,
            b: s * self.b + t * other.b,
        }
    }

    #[must_use]
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// RGB plus opacity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Surface lighting coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub specular: f64,
    pub diffuse: f64,
    pub ambient: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            specular: 0.2,
            diffuse: 0.8,
            ambient: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandKind {
    Smoke,
    Fire,
}

/// How one band is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandStyle {
    pub label: String,
    pub kind: BandKind,
    pub color: Rgb,
    pub opacity: f64,
    pub material: Material,
}

/// Static (kind, color, opacity) table, one entry per level
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<(BandKind, Rgb, f64)>,
}

/// Light gray, dark gray, red, orange, yellow
pub const FIRE_SMOKE_COLORS: [Rgb; 5] = [
    Rgb::new(0.7, 0.7, 0.7),
    Rgb::new(0.5, 0.5, 0.5),
    Rgb::new(1.0, 0.15, 0.0),
    Rgb::new(1.0, 0.57, 0.05),
    Rgb::new(1.0, 0.85, 0.0),
];

/// Opacities matching [`FIRE_SMOKE_COLORS`]
pub const FIRE_SMOKE_OPACITIES: [f64; 5] = [0.15, 0.30, 0.60, 0.70, 0.80];

impl Palette {
    /// Two smoke bands then three fire bands
    #[must_use]
    pub fn fire_smoke() -> Self {
        let kinds = [
            BandKind::Smoke,
            BandKind::Smoke,
            BandKind::Fire,
            BandKind::Fire,
            BandKind::Fire,
        ];
        let entries = kinds
            .into_iter()
            .zip(FIRE_SMOKE_COLORS)
            .zip(FIRE_SMOKE_OPACITIES)
            .map(|((kind, color), opacity)| (kind, color, opacity))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|(_, color, _)| *color).collect()
    }

    /// Pair every level with its palette entry
    ///
    /// # Errors
    /// Returns [`VizError::PaletteMismatch`] when the lengths differ.
    pub fn assign(&self, levels: &LevelSet) -> Result<Vec<BandStyle>> {
        if self.entries.len() != levels.len() {
            return Err(VizError::PaletteMismatch {
                colors: self.entries.len(),
                levels: levels.len(),
            });
        }
        Ok(levels
            .levels()
            .iter()
            .zip(&self.entries)
            .map(|(level, &(kind, color, opacity))| BandStyle {
                label: level.label.clone(),
                kind,
                color,
                opacity,
                material: Material::default(),
            })
            .collect())
    }
}
