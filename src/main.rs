use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use boxtrack_rs::config::{Overrides, RunConfig};
use boxtrack_rs::driver::FrameDriver;
use boxtrack_rs::{io, vis};

/// Companion file holding `[tracker]` defaults; command-line values win.
const DEFAULTS_INI: &str = "defaults.ini";

#[derive(Debug, Parser)]
#[command(name = "boxtrack", about = "Persistent ids for rectangular detections")]
struct Cli {
    /// Input frame stream (JSON array of {timestamp, detections})
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output path for the labeled frames (JSON)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Directory for per-frame PNG renderings
    #[arg(long, value_name = "PATH")]
    vis_dir: Option<PathBuf>,

    /// Maximum center distance for an association
    #[arg(long, value_name = "FLOAT")]
    max_dist: Option<f64>,

    /// Frames a track may coast before retirement
    #[arg(long, value_name = "INT")]
    max_age: Option<u32>,

    /// Weight of overlap against center distance, in [0, 1]
    #[arg(long, value_name = "FLOAT")]
    alpha: Option<f64>,
}

impl Cli {
    fn into_overrides(self) -> Overrides {
        Overrides {
            input: self.input,
            output: self.output,
            vis_dir: self.vis_dir,
            max_dist: self.max_dist,
            max_age: self.max_age,
            alpha: self.alpha,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = RunConfig::resolve(cli.into_overrides(), Path::new(DEFAULTS_INI))
        .context("failed to resolve configuration")?;
    run(&config)
}

fn run(config: &RunConfig) -> Result<()> {
    let frames = io::load_frames(&config.input)
        .with_context(|| format!("failed to load {}", config.input.display()))?;
    info!("loaded {} frames from {}", frames.len(), config.input.display());

    fs::create_dir_all(&config.vis_dir)
        .with_context(|| format!("failed to create {}", config.vis_dir.display()))?;

    let mut driver = FrameDriver::new(config.tracker.clone());
    let mut outputs = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        let labeled = driver.process(frame);
        debug!(
            "frame {index}: {} detections, {} live tracks",
            frame.detections.len(),
            driver.tracker().tracks().len()
        );
        vis::render_frame(&config.vis_dir, index, driver.tracker().tracks())
            .with_context(|| format!("failed to render frame {index}"))?;
        outputs.push(labeled);
    }

    io::save_labels(&config.output, &outputs)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    info!("tracking complete, frames: {}", frames.len());
    Ok(())
}
