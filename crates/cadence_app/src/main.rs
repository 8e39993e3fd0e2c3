//! cadence-demo
//!
//! Runs a single tween on a headless frame clock and logs the value it writes
//! on every frame.
//!
//! Run with: cargo run -p cadence_app -- --to 100 --duration 250 --easing ease-out-cubic

use anyhow::{Context, Result};
use cadence_animation::{tween, Easing};
use cadence_app::{logging, HeadlessRunConfig, HeadlessRuntime};
use clap::Parser;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(name = "cadence-demo", version, about = "Run a tween on a headless frame clock")]
struct Cli {
    /// Run configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start value
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Target value
    #[arg(long, default_value_t = 100.0)]
    to: f64,

    /// Tween duration in milliseconds
    #[arg(long, default_value_t = 300.0)]
    duration: f64,

    /// Easing name (linear, ease, ease-in-out, ease-out-cubic, ...)
    #[arg(long, default_value = "linear")]
    easing: String,

    /// Override the configured frame interval
    #[arg(long)]
    frame_ms: Option<f64>,

    /// Override the configured frame budget
    #[arg(long)]
    max_frames: Option<u32>,

    /// Stop the tween once the clock reaches this many milliseconds
    #[arg(long)]
    stop_after: Option<f64>,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => HeadlessRunConfig::load(path)?,
        None => HeadlessRunConfig::default(),
    };
    if let Some(frame_ms) = cli.frame_ms {
        config.frame_ms = frame_ms;
    }
    if let Some(max_frames) = cli.max_frames {
        config.max_frames = max_frames;
    }

    let easing = Easing::from_name(&cli.easing)
        .with_context(|| format!("unknown easing '{}'", cli.easing))?;

    let runtime = HeadlessRuntime::new(config)?;
    let value = Rc::new(Cell::new(cli.from));
    let handle = tween(runtime.scheduler(), value.clone(), cli.to, cli.duration, easing);

    let summary = runtime.run(|ctx| {
        tracing::info!(
            frame = ctx.frame_index,
            now_ms = ctx.now_ms,
            value = value.get(),
            "frame"
        );
        if cli.stop_after.is_some_and(|limit| ctx.now_ms >= limit) && !handle.is_finished() {
            tracing::info!(now_ms = ctx.now_ms, "stopping tween early");
            handle.stop();
        }
    })?;

    tracing::info!(
        frames = summary.frames,
        elapsed_ms = summary.elapsed_ms,
        finished = handle.is_finished(),
        value = value.get(),
        "done"
    );
    Ok(())
}
