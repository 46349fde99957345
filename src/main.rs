use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use quartier_core::{Engine, SimConfig};

mod recorder;

use recorder::SnapshotRecorder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the configured step count
    #[arg(long)]
    steps: Option<u64>,

    /// Override the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Record per-step snapshots as JSONL to this path
    #[arg(long)]
    record: Option<PathBuf>,
}

fn main() -> Result<()> {
    quartier_core::init_logging();
    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        let content = std::fs::read_to_string(&args.config)?;
        SimConfig::from_toml(&content)?
    } else {
        SimConfig::default()
    };
    if let Some(steps) = args.steps {
        config.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.grid.seed = Some(seed);
    }

    tracing::info!(
        fingerprint = %config.fingerprint(),
        rows = config.grid.rows,
        cols = config.grid.cols,
        steps = config.steps,
        "Starting run"
    );

    let mut engine = Engine::new(config)?;
    let mut recorder = args
        .record
        .as_deref()
        .map(SnapshotRecorder::create)
        .transpose()?;

    let mut shock_steps = 0u64;
    while !engine.is_finished() {
        let report = engine.step()?;
        if report.shocked {
            shock_steps += 1;
        }
        if let Some(rec) = recorder.as_mut() {
            rec.record(&engine.snapshot())?;
        }
    }

    tracing::info!(
        steps = engine.tick(),
        shock_steps = shock_steps,
        final_happiness = engine.happiness().latest().unwrap_or(100.0),
        "Run finished"
    );

    Ok(())
}
