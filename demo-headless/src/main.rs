use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use fire_viz_core::animation::{snapshot_name, FrameCycler, KeyAction};
use fire_viz_core::backend::RenderedFrame;
use fire_viz_core::scene::{LayerStyle, TemperatureStyle};
use fire_viz_core::config::CameraPreset;
use fire_viz_core::synthetic::plume_snapshot;
use fire_viz_core::{
    MemoryBackend, PointData, Rgb, SceneMode, ScenePlan, VisualizationBackend, VizConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Fire,
    Vegetation,
    Combined,
}

impl From<ModeArg> for SceneMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Fire => SceneMode::Fire,
            ModeArg::Vegetation => SceneMode::Vegetation,
            ModeArg::Combined => SceneMode::Combined,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Bands,
    Ramp,
    FlameRange,
}

impl From<StyleArg> for TemperatureStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Bands => TemperatureStyle::Bands,
            StyleArg::Ramp => TemperatureStyle::Ramp,
            StyleArg::FlameRange => TemperatureStyle::FlameRange,
        }
    }
}

/// Plan wildfire isosurface scenes over synthetic snapshots
#[derive(Parser, Debug)]
#[command(name = "fire-viz-demo")]
#[command(about = "Headless wildfire isosurface scene planner", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fields to draw (overrides the configuration)
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Temperature coloring (overrides the configuration)
    #[arg(short, long, value_enum)]
    style: Option<StyleArg>,

    /// Synthetic grid points along x, y, z, e.g. "24,24,16"
    #[arg(long, value_delimiter = ',')]
    dims: Option<Vec<usize>>,

    /// Ambient potential temperature of the synthetic grid (K)
    #[arg(long)]
    ambient: Option<f64>,

    /// Fit the camera to the grid and orbit instead of the saved pose
    #[arg(long)]
    orbit: bool,

    /// Animation ticks to run over synthetic snapshots (0 = single frame)
    #[arg(short, long, default_value_t = 0)]
    frames: usize,

    /// Downwind plume drift between snapshots (m)
    #[arg(long, default_value_t = 10.0)]
    drift: f64,

    /// Key presses replayed one per animation tick, e.g. "p,space,space,q"
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Print the camera report
    #[arg(long)]
    print_camera: bool,

    /// Print the scene plan as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => VizConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => VizConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.scene.mode = mode.into();
    }
    if let Some(style) = args.style {
        config.scene.temperature_style = style.into();
    }

    if args.orbit {
        config.camera_preset = CameraPreset::Orbit;
    }

    let mut params = config.plume;
    if let Some(ambient) = args.ambient {
        params.ambient = ambient;
    }
    if let Some(dims) = &args.dims {
        match dims.as_slice() {
            [nx, ny, nz] => params.dimensions = [*nx, *ny, *nz],
            _ => bail!("--dims takes exactly three values, got {}", dims.len()),
        }
    }

    // Register one synthetic snapshot per configured step
    let mut backend = MemoryBackend::new();
    let dir = config.animation.directory.clone();
    let steps = config.animation.range.steps()?;
    for (n, step) in steps.iter().enumerate() {
        let grid = plume_snapshot(&params.advanced(args.drift * n as f64))?;
        backend.insert_grid(dir.join(snapshot_name(*step)), grid);
    }
    let frames = config
        .animation
        .range
        .frame_paths(&dir, |p| backend.contains(p))?;
    let Some(first) = frames.first() else {
        bail!("no snapshots registered under {}", dir.display());
    };

    let grid = backend.read_structured_grid(first)?;
    let camera = config.camera_for(&grid);
    let plan = ScenePlan::build(&grid, &config.scene, camera, config.render.clone())?;
    info!("Planned scene from {}", first.display());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_grid(&grid);
        print_plan(&plan);
    }
    if args.print_camera {
        println!("\n{}", plan.camera.report());
    }

    if args.frames == 0 {
        plan.realize(&mut backend, &grid)?;
        if !args.json {
            if let Some(frame) = backend.frames().last() {
                print_frame(0, first, frame);
            }
        }
        return Ok(());
    }

    if !args.json {
        println!(
            "\nAnimating {} ticks over {} snapshots ({} ms per frame)",
            args.frames,
            frames.len(),
            config.animation.interval_ms
        );
    }
    let mut cycler = FrameCycler::new(frames);
    let mut keys = args.keys.iter();
    for tick in 0..args.frames {
        if let Some(key) = keys.next() {
            match cycler.handle_key(key) {
                KeyAction::PrintCamera => println!("\n{}", plan.camera.report()),
                KeyAction::Quit => {
                    println!("Quit requested at tick {tick}");
                    break;
                }
                KeyAction::TogglePause | KeyAction::Ignored => {}
            }
        }

        let Some(path) = cycler.tick().map(Path::to_path_buf) else {
            if !args.json {
                println!("tick {tick:3} | paused");
            }
            continue;
        };
        let grid = backend.read_structured_grid(&path)?;
        plan.realize(&mut backend, &grid)?;
        if !args.json {
            if let Some(frame) = backend.frames().last() {
                print_frame(tick, &path, frame);
            }
        }
    }

    Ok(())
}

fn fmt_rgb(c: Rgb) -> String {
    format!("({:.2}, {:.2}, {:.2})", c.r, c.g, c.b)
}

fn print_grid<G: PointData>(grid: &G) {
    let [nx, ny, nz] = grid.dimensions();
    let bounds = grid.bounds();
    println!("=== Fire Visualization Demo ===\n");
    println!(
        "Grid {}x{}x{} points, bounds ({:.0}, {:.0}, {:.0}) to ({:.0}, {:.0}, {:.0})",
        nx, ny, nz, bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );
}

fn print_plan(plan: &ScenePlan) {
    println!("Mode: {:?}\n", plan.mode);

    if let Some(levels) = &plan.fire_levels {
        println!("Temperature levels:");
        if plan.fire_styles.is_empty() {
            for value in levels.values() {
                println!("  {value:9.3} K");
            }
        } else {
            println!("  Label            | Level (K) | Color              | Opacity");
            println!("  -----------------|-----------|--------------------|--------");
            for (level, style) in levels.levels().iter().zip(&plan.fire_styles) {
                println!(
                    "  {:16} | {:9.3} | {:18} | {:.2}",
                    level.label,
                    level.value,
                    fmt_rgb(style.color),
                    style.opacity
                );
            }
        }
        println!();
    }

    if let Some(levels) = &plan.vegetation_levels {
        let values: Vec<String> = levels.values().iter().map(|v| format!("{v:.1}")).collect();
        println!("Vegetation isovalues: {}\n", values.join(", "));
    }

    println!("Layers:");
    for layer in &plan.layers {
        let style = match &layer.style {
            LayerStyle::Solid(band) => format!("solid {:?} {}", band.kind, fmt_rgb(band.color)),
            LayerStyle::Mapped { field, table } => {
                let (lo, hi) = table.range();
                format!("mapped by {field}, {} entries over [{lo:.3}, {hi:.3}]", table.len())
            }
            LayerStyle::Outline { color, line_width } => {
                format!("outline {} width {line_width}", fmt_rgb(*color))
            }
        };
        println!("  {:16} {:2} isovalues  {}", layer.name, layer.isovalues.len(), style);
    }

    println!("\nLegends:");
    for bar in &plan.legends {
        println!(
            "  {:11} at ({:.2}, {:.2}): {}",
            bar.title,
            bar.position.0,
            bar.position.1,
            bar.labels().join(" | ")
        );
    }

    let (w, h) = plan.settings.window_size;
    println!(
        "\nWindow {}x{}, background {}, depth peeling {} (max {} peels)",
        w,
        h,
        fmt_rgb(plan.settings.background),
        plan.settings.depth_peeling,
        plan.settings.max_peels
    );
}

fn print_frame(tick: usize, path: &Path, frame: &RenderedFrame) {
    let cells: Vec<String> = frame
        .layers
        .iter()
        .filter(|l| l.level.is_some())
        .map(|l| l.cells.to_string())
        .collect();
    println!(
        "tick {:3} | {} | {} surfaces | cells {}",
        tick,
        path.display(),
        frame.layers.len(),
        cells.join(" ")
    );
}
