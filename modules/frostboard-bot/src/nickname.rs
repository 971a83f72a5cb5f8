//! Canonical display names for OCR-recognized player names.
//!
//! A flat JSON map at `{DATA_DIR}/nicknames.json`, `garbled form ->
//! canonical form`, keyed case-insensitively. Lookup is total: unmapped
//! names pass through unchanged.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

pub struct NicknameResolver {
    map: HashMap<String, String>,
}

impl NicknameResolver {
    /// Load the mapping file. A missing file is an empty map, not an
    /// error: most deployments start with no corrections.
    pub fn load(path: &Path) -> Result<Self> {
        let map = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let raw: HashMap<String, String> =
                serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;
            raw.into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect()
        } else {
            HashMap::new()
        };
        Ok(Self { map })
    }

    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Canonical display name for a raw recognized name.
    pub fn canonical(&self, raw: &str) -> String {
        self.map
            .get(&raw.trim().to_lowercase())
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_names_pass_through() {
        let resolver = NicknameResolver::empty();
        assert_eq!(resolver.canonical("FrostWolf"), "FrostWolf");
    }

    #[test]
    fn lookup_is_case_insensitive_and_total() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nicknames.json");
        std::fs::write(&path, r#"{"Fr0stW0lf": "FrostWolf"}"#).unwrap();

        let resolver = NicknameResolver::load(&path).unwrap();
        assert_eq!(resolver.canonical("fr0stw0lf"), "FrostWolf");
        assert_eq!(resolver.canonical("SomeoneElse"), "SomeoneElse");
    }

    #[test]
    fn missing_file_is_an_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = NicknameResolver::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(resolver.canonical("X"), "X");
    }
}
