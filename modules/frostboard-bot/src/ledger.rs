//! Content-hash ledger of already-processed screenshots.
//!
//! Re-uploading the same image (same bytes) must not double-count a run,
//! so every processed image's sha256 is persisted at
//! `{DATA_DIR}/processed-images.json` and checked before OCR.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

pub struct ImageLedger {
    path: PathBuf,
    seen: BTreeSet<String>,
}

impl ImageLedger {
    /// Load the ledger; a missing file starts empty.
    pub fn load(path: &Path) -> Result<Self> {
        let seen = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeSet::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            seen,
        })
    }

    pub fn is_processed(&self, image: &[u8]) -> bool {
        self.seen.contains(&content_key(image))
    }

    /// Record an image as processed and persist the ledger.
    pub fn mark_processed(&mut self, image: &[u8]) -> Result<()> {
        if self.seen.insert(content_key(image)) {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.seen)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

fn content_key(image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_and_detects_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed-images.json");

        let mut ledger = ImageLedger::load(&path).unwrap();
        assert!(!ledger.is_processed(b"screenshot-1"));

        ledger.mark_processed(b"screenshot-1").unwrap();
        assert!(ledger.is_processed(b"screenshot-1"));
        assert!(!ledger.is_processed(b"screenshot-2"));
    }

    #[test]
    fn ledger_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed-images.json");

        let mut ledger = ImageLedger::load(&path).unwrap();
        ledger.mark_processed(b"screenshot-1").unwrap();
        drop(ledger);

        let reloaded = ImageLedger::load(&path).unwrap();
        assert!(reloaded.is_processed(b"screenshot-1"));
    }
}
