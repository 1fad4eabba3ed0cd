//! Color legends
//!
//! Bars are vertical. Positions and sizes are fractions of the viewport.
//! The temperature bar sits on the left, the vegetation bar on the right.

use serde::Serialize;

use crate::lookup_table::LookupTable;
use crate::palette::Rgb;

/// Font settings shared by title and labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub family: String,
    pub size: u32,
    pub bold: bool,
    pub color: Rgb,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size: 24,
            bold: true,
            color: Rgb::WHITE,
        }
    }
}

/// Legend for one lookup table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarBar {
    pub title: String,
    pub label_count: usize,
    pub position: (f64, f64),
    pub size: (f64, f64),
    /// Digits after the decimal point; `None` prints values as-is
    pub label_precision: Option<usize>,
    pub title_style: TextStyle,
    pub label_style: TextStyle,
    pub table: LookupTable,
}

impl ScalarBar {
    /// Left-hand "Temperature" legend with one-decimal labels
    #[must_use]
    pub fn temperature(table: LookupTable) -> Self {
        Self {
            title: "Temperature".to_string(),
            label_count: 5,
            position: (0.12, 0.1),
            size: (0.08, 0.8),
            label_precision: Some(1),
            title_style: TextStyle::default(),
            label_style: TextStyle::default(),
            table,
        }
    }

    /// Right-hand "Vegetation density" legend
    #[must_use]
    pub fn vegetation(table: LookupTable) -> Self {
        Self {
            title: "Vegetation density".to_string(),
            label_count: 5,
            position: (0.88, 0.1),
            size: (0.08, 0.8),
            label_precision: None,
            title_style: TextStyle::default(),
            label_style: TextStyle::default(),
            table,
        }
    }

    /// Label values evenly spaced from the table's low to high end
    #[must_use]
    pub fn label_values(&self) -> Vec<f64> {
        let (lo, hi) = self.table.range();
        match self.label_count {
            0 => Vec::new(),
            1 => vec![lo],
            n => (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    (1.0 - t) * lo + t * hi
                })
                .collect(),
        }
    }

    /// Formatted label text
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.label_values()
            .into_iter()
            .map(|v| match self.label_precision {
                Some(precision) => format!("{v:.precision$}"),
                None => format!("{v}"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::FIRE_SMOKE_COLORS;

    #[test]
    fn test_temperature_labels() {
        let table = LookupTable::from_colors(300.0, 320.0, &FIRE_SMOKE_COLORS).unwrap();
        let mut bar = ScalarBar::temperature(table);
        assert_eq!(
            bar.labels(),
            vec!["300.0", "305.0", "310.0", "315.0", "320.0"]
        );
        bar.label_count = 4;
        assert_eq!(bar.labels()[1], "306.7");
        assert_eq!(bar.position, (0.12, 0.1));
    }

    #[test]
    fn test_vegetation_labels_unformatted() {
        let table = LookupTable::vegetation(0.0, 0.6).unwrap();
        let bar = ScalarBar::vegetation(table);
        let values = bar.label_values();
        assert_eq!(values.first(), Some(&0.0));
        assert_eq!(values.last(), Some(&0.6));
        assert_eq!(bar.title_style.family, "Arial");
        assert!(bar.label_style.bold);
    }
}
