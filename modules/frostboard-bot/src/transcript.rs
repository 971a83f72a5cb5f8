//! Append-only debug transcript of every OCR line per run.
//!
//! Write-only diagnostics: when the extractor misses a player, this file
//! shows what the OCR engine actually saw. Never read back by the bot.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;

pub struct Transcript {
    path: PathBuf,
}

impl Transcript {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Append one run's lines under a timestamped, caller-attributed
    /// header.
    pub fn append(&self, caller: &str, lines: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        writeln!(file, "\n===== {} / {caller} =====", Utc::now())?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        Ok(())
    }
}
