use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::Utc;
use playterm_types::Geometry;
use serde_json::json;

use super::widget::{ElementRef, InputHandler, TerminalWidget};

/// Widget that records instance output and geometry changes as JSONL
pub struct TranscriptWidget {
    label: String,
    path: PathBuf,
    log_file: File,
    geometry: Geometry,
    bytes_logged: u64,
}

impl TranscriptWidget {
    /// Create a transcript file `<label>.jsonl` inside `log_dir`
    pub fn create(log_dir: &Path, label: &str, geometry: Geometry) -> Result<Self> {
        // Ensure log directory exists
        std::fs::create_dir_all(log_dir)
            .context("Failed to create transcript directory")?;

        let path = log_dir.join(format!("{}.jsonl", label));

        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to create transcript file")?;

        Ok(Self {
            label: label.to_string(),
            path,
            log_file,
            geometry,
            bytes_logged: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_logged(&self) -> u64 {
        self.bytes_logged
    }

    fn log_entry(&mut self, entry: serde_json::Value) -> Result<()> {
        writeln!(self.log_file, "{}", entry)
            .context("Failed to write to transcript file")?;
        self.log_file.flush()?;
        Ok(())
    }

    fn record(&mut self, entry: serde_json::Value) {
        if let Err(e) = self.log_entry(entry) {
            log::warn!("Transcript {} dropped an entry: {:#}", self.label, e);
        }
    }
}

impl TerminalWidget for TranscriptWidget {
    fn open(&mut self, element: &ElementRef) {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "transcript": self.label,
            "event": "open",
            "element": element.id(),
        });
        self.record(entry);
    }

    fn write(&mut self, data: &str) {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "transcript": self.label,
            "direction": "out",
            "data": data,
        });
        self.record(entry);
        self.bytes_logged += data.len() as u64;
    }

    fn resize(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "transcript": self.label,
            "event": "resize",
            "cols": geometry.cols,
            "rows": geometry.rows,
        });
        self.record(entry);
    }

    fn proposed_geometry(&self) -> Geometry {
        self.geometry
    }

    // A transcript never produces input
    fn on_input(&mut self, _handler: InputHandler) {}

    fn dispose(&mut self) {
        let entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "transcript": self.label,
            "event": "close",
            "bytes": self.bytes_logged,
        });
        self.record(entry);
    }

    fn widget_name(&self) -> &str {
        "transcript"
    }
}
