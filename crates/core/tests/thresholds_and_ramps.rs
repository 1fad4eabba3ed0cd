//! Threshold and color-ramp properties
//!
//! Randomized checks use a fixed seed so failures reproduce.

use fire_viz_core::levels::{compute_levels, FIRE_OFFSETS};
use fire_viz_core::lookup_table::LookupTable;
use fire_viz_core::palette::Rgb;
use fire_viz_core::ramp::{AlphaRule, ColorRamp, ColorStop, ZERO_EPSILON};
use fire_viz_core::LevelSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TRIALS: usize = 200;

fn increasing(rng: &mut StdRng, n: usize, start: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(n);
    let mut v = start;
    for _ in 0..n {
        v += rng.random_range(0.01..10.0);
        values.push(v);
    }
    values
}

fn random_color(rng: &mut StdRng) -> Rgb {
    Rgb::new(rng.random(), rng.random(), rng.random())
}

#[test]
fn test_reference_fire_levels() {
    let levels = compute_levels(298.0, &FIRE_OFFSETS);
    assert_eq!(levels, vec![300.0, 302.0, 303.5, 305.0, 323.0]);
}

#[test]
fn test_levels_are_min_plus_offset_and_increasing() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..TRIALS {
        let min = rng.random_range(-500.0..1500.0);
        let n = rng.random_range(1..8);
        let first = rng.random_range(-5.0..5.0);
        let offsets = increasing(&mut rng, n, first);

        let levels = LevelSet::from_offsets(min, &offsets, &[]).unwrap();
        let values = levels.values();
        for (value, offset) in values.iter().zip(&offsets) {
            assert_eq!(*value, min + offset);
        }
        assert!(
            values.windows(2).all(|w| w[0] < w[1]),
            "levels not increasing for min={min} offsets={offsets:?}"
        );
    }
}

#[test]
fn test_ramp_matches_stop_colors_exactly() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..TRIALS {
        let n = rng.random_range(1..7);
        let start = rng.random_range(-100.0..100.0);
        let values = increasing(&mut rng, n, start);
        let stops: Vec<ColorStop> = values
            .iter()
            .map(|&v| ColorStop::opaque(v, random_color(&mut rng)))
            .collect();
        let ramp = ColorRamp::new(stops.clone()).unwrap();
        for stop in &stops {
            assert_eq!(ramp.evaluate(stop.value).rgb(), stop.color);
        }
    }
}

#[test]
fn test_ramp_stays_between_neighbouring_stops() {
    let ramp = ColorRamp::new(vec![
        ColorStop::opaque(0.0, Rgb::new(0.0, 1.0, 0.2)),
        ColorStop::opaque(4.0, Rgb::new(1.0, 0.0, 0.6)),
    ])
    .unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..TRIALS {
        let c = ramp.evaluate(rng.random_range(0.0..4.0));
        assert!((0.0..=1.0).contains(&c.r));
        assert!((0.0..=1.0).contains(&c.g));
        assert!(c.b > 0.2 - 1e-12 && c.b < 0.6 + 1e-12);
        assert!((c.r + c.g - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_zero_transparent_tables() {
    let ramp = ColorRamp::new(vec![
        ColorStop::opaque(-2.0, Rgb::new(0.0, 0.0, 1.0)),
        ColorStop::opaque(0.0, Rgb::WHITE),
        ColorStop::opaque(2.0, Rgb::new(1.0, 0.0, 0.0)),
    ])
    .unwrap();

    for n in [2, 3, 5, 9, 101, 256] {
        let table = LookupTable::from_ramp(-2.0, 2.0, n, &ramp, AlphaRule::ZeroTransparent).unwrap();
        for (i, entry) in table.entries().iter().enumerate() {
            let t = i as f64 / (n - 1) as f64;
            let s = -2.0 + t * 4.0;
            let expected = if s.abs() <= ZERO_EPSILON { 0.0 } else { 1.0 };
            assert_eq!(entry.a, expected, "entry {i} of {n} at scalar {s}");
        }
        // An odd table has its middle entry exactly on zero
        if n % 2 == 1 {
            assert_eq!(table.entries()[n / 2].a, 0.0);
        }
    }
}
