//! End-to-end scene planning over synthetic snapshots
//!
//! Grids are registered with the in-memory backend under snapshot paths,
//! read back, planned and rendered, the same way a viewer would drive a
//! graphics toolkit.

use std::path::Path;

use approx::assert_relative_eq;
use fire_viz_core::animation::{snapshot_name, FrameCycler, KeyAction, SnapshotRange};
use fire_viz_core::backend::CellSurface;
use fire_viz_core::field::{RHOF_1, THETA};
use fire_viz_core::scene::{LayerStyle, RenderSettings, TemperatureStyle};
use fire_viz_core::synthetic::{plume_snapshot, PlumeParams};
use fire_viz_core::{
    BandKind, Camera, MemoryBackend, PointData, SceneMode, SceneOptions, ScenePlan,
    VisualizationBackend, VizConfig,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn register_frames(backend: &mut MemoryBackend, dir: &Path, range: &SnapshotRange) {
    let params = PlumeParams::default();
    for (n, step) in range.steps().unwrap().into_iter().enumerate() {
        let grid = plume_snapshot(&params.advanced(10.0 * n as f64)).unwrap();
        backend.insert_grid(dir.join(snapshot_name(step)), grid);
    }
}

#[test]
fn test_single_snapshot_combined_scene() {
    let mut backend = MemoryBackend::new();
    let path = Path::new("mountain_backcurve40/output.70000.vts");
    backend.insert_grid(path, plume_snapshot(&PlumeParams::default()).unwrap());

    let grid = backend.read_structured_grid(path).unwrap();
    let theta_min = grid.point_array(THETA).unwrap().min();
    let plan = ScenePlan::build(
        &grid,
        &SceneOptions::default(),
        Camera::default(),
        RenderSettings::default(),
    )
    .unwrap();
    plan.realize(&mut backend, &grid).unwrap();

    let levels = plan.fire_levels.as_ref().unwrap().values();
    let expected: Vec<f64> = [2.0, 4.0, 5.5, 7.0, 25.0]
        .iter()
        .map(|o| theta_min + o)
        .collect();
    assert_eq!(levels, expected);

    let frame = &backend.frames()[0];
    let fire_cells: Vec<usize> = frame.layers[..5].iter().map(|l| l.cells).collect();
    assert!(
        fire_cells.iter().all(|&c| c > 0),
        "every temperature shell should cut the plume: {fire_cells:?}"
    );
    for layer in &frame.layers[..5] {
        match &layer.style {
            LayerStyle::Solid(style) => {
                let expected_kind = if layer.layer.starts_with("smoke") {
                    BandKind::Smoke
                } else {
                    BandKind::Fire
                };
                assert_eq!(style.kind, expected_kind);
            }
            other => panic!("fire layer drawn with {other:?}"),
        }
    }

    let vegetation: Vec<_> = frame
        .layers
        .iter()
        .filter(|l| l.layer == "vegetation")
        .collect();
    assert_eq!(vegetation.len(), 6);
    assert_eq!(vegetation[0].level, Some(0.1));
}

#[test]
fn test_animation_reuses_plan_across_frames() {
    let dir = Path::new("mountain_backcurve40");
    let range = SnapshotRange {
        start: 10_000,
        end: 13_000,
        step: 1_000,
    };
    let mut backend = MemoryBackend::new();
    register_frames(&mut backend, dir, &range);

    // Frame 12000 was never written
    let frames = range
        .frame_paths(dir, |p| backend.contains(p) && !p.ends_with("output.12000.vts"))
        .unwrap();
    assert_eq!(frames.len(), 3);

    let first = backend.read_structured_grid(&frames[0]).unwrap();
    let options = SceneOptions {
        mode: SceneMode::Vegetation,
        ..SceneOptions::default()
    };
    let plan = ScenePlan::build(&first, &options, Camera::default(), RenderSettings::default())
        .unwrap();

    let mut cycler = FrameCycler::new(frames);
    for _ in 0..5 {
        let path = cycler.tick().unwrap().to_path_buf();
        let grid = backend.read_structured_grid(&path).unwrap();
        plan.realize(&mut backend, &grid).unwrap();
    }
    assert_eq!(backend.frames().len(), 5);

    assert_eq!(cycler.handle_key("space"), KeyAction::TogglePause);
    assert!(cycler.tick().is_none());
    assert_eq!(cycler.handle_key("p"), KeyAction::PrintCamera);
    assert_eq!(cycler.handle_key("q"), KeyAction::Quit);
    assert!(cycler.quit_requested());
}

#[test]
fn test_ramp_style_from_config() {
    let config = VizConfig::from_toml_str(
        r#"
        [scene]
        mode = "fire"
        temperature_style = "ramp"
        outline = false
        "#,
    )
    .unwrap();
    let grid = plume_snapshot(&PlumeParams::default()).unwrap();
    let plan = ScenePlan::build(&grid, &config.scene, config.camera, config.render).unwrap();

    assert_eq!(plan.layers.len(), 1);
    let theta_min = grid.point_array(THETA).unwrap().min();
    let table = &plan.legends[0].table;
    assert_eq!(table.range(), (theta_min, theta_min + 80.0));
    // Coolest entry is near-black, hottest is yellow
    let cold = table.entries()[0];
    let hot = table.entries()[table.len() - 1];
    assert_eq!((cold.r, cold.g, cold.b), (0.1, 0.1, 0.1));
    assert_relative_eq!(hot.r, 1.0, epsilon = 1e-9);
    assert_relative_eq!(hot.g, 1.0, epsilon = 1e-9);
    assert_relative_eq!(hot.b, 0.0, epsilon = 1e-9);

    let mut backend = MemoryBackend::new();
    plan.realize(&mut backend, &grid).unwrap();
    assert_eq!(backend.frames()[0].layers.len(), 4);
}

#[test]
fn test_outline_and_missing_vegetation() {
    let grid = plume_snapshot(&PlumeParams::default()).unwrap();
    let mut backend = MemoryBackend::new();
    let outline = backend.build_outline(&grid).unwrap();
    match outline {
        CellSurface::Outline { bounds } => {
            assert_eq!(bounds.max.x, 230.0);
            assert_eq!(bounds.max.z, 150.0);
        }
        CellSurface::Contour { .. } => panic!("expected outline"),
    }

    let options = SceneOptions {
        vegetation_field: "rhof_2".to_string(),
        temperature_style: TemperatureStyle::Bands,
        ..SceneOptions::default()
    };
    let err = ScenePlan::build(&grid, &options, Camera::default(), RenderSettings::default())
        .unwrap_err();
    assert!(err.to_string().contains("rhof_2"));
    assert!(grid.point_array(RHOF_1).is_ok());
    let _ = backend.read_structured_grid(Path::new("unused.vts")).unwrap_err();
}
