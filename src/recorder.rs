//! JSONL recording of per-step snapshots.
//!
//! One line per completed step, append-only, so external plotting and GIF
//! tooling can stream the run without touching engine state.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use quartier_core::StepSnapshot;
use serde::Serialize;

#[derive(Serialize)]
struct SnapshotRecord<'a> {
    timestamp: String,
    #[serde(flatten)]
    snapshot: &'a StepSnapshot,
}

pub struct SnapshotRecorder {
    writer: BufWriter<File>,
}

impl SnapshotRecorder {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn record(&mut self, snapshot: &StepSnapshot) -> anyhow::Result<()> {
        let record = SnapshotRecord {
            timestamp: chrono::Utc::now().to_rfc3339(),
            snapshot,
        };
        let json = serde_json::to_string(&record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
