use std::path::PathBuf;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hyperspeed_core::{
    Collaborators, RandomSource, SeededRandom, StarFieldConfig, StarFieldSimulator,
};
use hyperspeed_headless::{ManualScheduler, PixelSurface, SharedViewport, SurfaceRegistry};
use hyperspeed_platform::{Result, ViewportSize};

const SURFACE_ID: &str = "hyperspeed";

/// Render the hyperspeed star field headlessly and save the last frame.
#[derive(Debug, Parser)]
#[command(name = "hyperspeed", version)]
struct Args {
    /// TOML or JSON star field configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport size, e.g. 800x600.
    #[arg(long, default_value = "800x600", value_parser = parse_size)]
    size: ViewportSize,

    /// Number of frames to render.
    #[arg(short, long, default_value_t = 120)]
    frames: u32,

    /// Overrides the configured speed.
    #[arg(long)]
    speed: Option<f32>,

    /// Seed for reproducible output; OS entropy otherwise.
    #[arg(long)]
    seed: Option<u64>,

    /// Resize the viewport to this size halfway through the run.
    #[arg(long, value_parser = parse_size)]
    resize: Option<ViewportSize>,

    /// Where to write the final frame as PNG.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_size(value: &str) -> std::result::Result<ViewportSize, String> {
    let (width, height) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width: u32 = width.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: u32 = height.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(ViewportSize::new(width as f32, height as f32))
}

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Hyperspeed starting");
    if let Err(e) = run(Args::parse()) {
        tracing::error!("Hyperspeed failed: {e}");
        eprintln!("Hyperspeed error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => StarFieldConfig::load(path)?,
        None => StarFieldConfig::default(),
    };
    let random: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::from_seed(seed)),
        None => Box::new(SeededRandom::from_os_rng()),
    };

    let mut registry = SurfaceRegistry::new();
    registry.insert(SURFACE_ID, PixelSurface::new(1, 1));
    let scheduler = ManualScheduler::new();
    let viewport = SharedViewport::new(args.size);

    let mut sim = StarFieldSimulator::new(
        SURFACE_ID,
        &mut registry,
        Collaborators {
            scheduler: Box::new(scheduler.clone()),
            viewport: Box::new(viewport.clone()),
            random,
        },
        config,
    )?;
    if let Some(speed) = args.speed {
        sim.set_speed(speed);
    }
    sim.start()?;

    let resize_at = args.frames / 2;
    for frame in 0..args.frames {
        if frame == resize_at {
            if let Some(size) = args.resize {
                info!("Viewport resize => {}x{}", size.width, size.height);
                viewport.set_size(size);
            }
        }
        let Some(token) = scheduler.fire() else {
            break;
        };
        sim.on_frame(token);
    }
    info!(
        "Rendered {} frames with {} particles",
        sim.frame_count(),
        sim.particles().len()
    );

    if let Some(path) = &args.output {
        sim.surface().save_png(path)?;
    }
    sim.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("800x600"), Ok(ViewportSize::new(800.0, 600.0)));
        assert_eq!(parse_size("1280X720"), Ok(ViewportSize::new(1280.0, 720.0)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn headless_run_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("frame.png");
        let args = Args::parse_from([
            "hyperspeed",
            "--size",
            "64x48",
            "--frames",
            "10",
            "--seed",
            "1",
            "--resize",
            "32x32",
            "--output",
            output.to_str().unwrap(),
        ]);
        run(args).unwrap();
        assert!(output.exists());
    }
}
