//! Keeping one pinned summary message per event in sync.
//!
//! The message id for each event lives in a small persisted JSON map.
//! Each run edits the referenced message when it still exists, and
//! otherwise posts, pins, and records a replacement. Failures here are
//! reported, never fatal: the sheet writes are already committed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use discord_client::Embed;
use tracing::{info, warn};

use crate::traits::{ChannelError, SummaryChannel};

// ---------------------------------------------------------------------------
// PinStore
// ---------------------------------------------------------------------------

/// Persisted `event key -> pinned message id` map,
/// `{DATA_DIR}/pinned-messages.json`. Loaded at run start, saved on any
/// change.
pub struct PinStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl PinStore {
    pub fn load(path: &Path) -> Result<Self> {
        let map = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn get(&self, event_key: &str) -> Option<&str> {
        self.map.get(event_key).map(String::as_str)
    }

    /// Record a new message id for an event and persist immediately.
    pub fn set(&mut self, event_key: &str, message_id: &str) -> Result<()> {
        self.map
            .insert(event_key.to_string(), message_id.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.map)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// How the pinned summary ended up after a run. `Failed` is a reported
/// condition, not an error: the caller relays "pin not updated".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinSync {
    /// Existing reference edited in place.
    Edited { message_id: String },
    /// No reference existed; a fresh summary was posted and pinned.
    Created { message_id: String },
    /// The stored reference was stale; a replacement was posted.
    Replaced { message_id: String },
    /// Edit or create failed in transit; the sheet state is unaffected.
    Failed { reason: String },
}

impl PinSync {
    pub fn updated(&self) -> bool {
        !matches!(self, PinSync::Failed { .. })
    }
}

impl std::fmt::Display for PinSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinSync::Edited { .. } => write!(f, "updated"),
            PinSync::Created { .. } => write!(f, "created"),
            PinSync::Replaced { .. } => write!(f, "recreated (stale reference)"),
            PinSync::Failed { reason } => write!(f, "not updated: {reason}"),
        }
    }
}

/// Bring the event's pinned summary in line with `embed`.
pub async fn sync_pin(
    channel: &dyn SummaryChannel,
    store: &mut PinStore,
    event_key: &str,
    embed: &Embed,
) -> PinSync {
    let existing = store.get(event_key).map(String::from);

    let stale = match existing {
        Some(id) => match channel.edit_summary(&id, embed).await {
            Ok(()) => return PinSync::Edited { message_id: id },
            Err(ChannelError::NotFound) => {
                warn!(event_key, message_id = id.as_str(), "Pinned summary vanished, recreating");
                true
            }
            Err(ChannelError::Transport(reason)) => {
                warn!(event_key, reason = reason.as_str(), "Pinned summary edit failed");
                return PinSync::Failed { reason };
            }
        },
        None => false,
    };

    match channel.create_pinned_summary(embed).await {
        Ok(id) => {
            if let Err(err) = store.set(event_key, &id) {
                // The message exists but its id is not durable; next run
                // will post another. Report rather than abort.
                warn!(event_key, error = %err, "Failed to persist pinned message id");
                return PinSync::Failed {
                    reason: format!("pin id not persisted: {err}"),
                };
            }
            info!(event_key, message_id = id.as_str(), "Pinned summary posted");
            if stale {
                PinSync::Replaced { message_id: id }
            } else {
                PinSync::Created { message_id: id }
            }
        }
        Err(err) => {
            warn!(event_key, error = %err, "Pinned summary create failed");
            PinSync::Failed {
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_pinned_message, MemoryChannel};

    fn store(dir: &tempfile::TempDir) -> PinStore {
        PinStore::load(&dir.path().join("pinned-messages.json")).unwrap()
    }

    fn embed(title: &str) -> Embed {
        Embed::new(title)
    }

    #[tokio::test]
    async fn no_reference_creates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut pins = store(&dir);
        let channel = MemoryChannel::new();

        let outcome = sync_pin(&channel, &mut pins, "svs", &embed("v1")).await;

        let PinSync::Created { message_id } = outcome else {
            panic!("expected Created, got {outcome:?}");
        };
        assert_eq!(pins.get("svs"), Some(message_id.as_str()));
        assert_eq!(channel.pinned_ids(), vec![message_id.clone()]);

        // Stored id survives reload.
        let reloaded = store(&dir);
        assert_eq!(reloaded.get("svs"), Some(message_id.as_str()));
    }

    #[tokio::test]
    async fn valid_reference_is_edited_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut pins = store(&dir);
        let channel = MemoryChannel::new();

        let id = seed_pinned_message(&channel, &embed("v1")).await;
        pins.set("svs", &id).unwrap();

        let outcome = sync_pin(&channel, &mut pins, "svs", &embed("v2")).await;

        assert_eq!(outcome, PinSync::Edited { message_id: id.clone() });
        assert_eq!(channel.message(&id).unwrap().title.as_deref(), Some("v2"));
        // No second message was posted.
        assert_eq!(channel.pinned_ids().len(), 1);
    }

    #[tokio::test]
    async fn stale_reference_is_replaced_and_reference_updated() {
        let dir = tempfile::tempdir().unwrap();
        let mut pins = store(&dir);
        let channel = MemoryChannel::new();

        let old_id = seed_pinned_message(&channel, &embed("v1")).await;
        pins.set("svs", &old_id).unwrap();
        channel.vanish(&old_id);

        let outcome = sync_pin(&channel, &mut pins, "svs", &embed("v2")).await;

        let PinSync::Replaced { message_id } = outcome else {
            panic!("expected Replaced, got {outcome:?}");
        };
        assert_ne!(message_id, old_id);
        assert_eq!(pins.get("svs"), Some(message_id.as_str()));
        assert_eq!(channel.message(&message_id).unwrap().title.as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn transport_failure_is_reported_not_thrown() {
        let dir = tempfile::tempdir().unwrap();
        let mut pins = store(&dir);
        let channel = MemoryChannel::new();

        let id = seed_pinned_message(&channel, &embed("v1")).await;
        pins.set("svs", &id).unwrap();
        channel.break_transport("rate limited");

        let outcome = sync_pin(&channel, &mut pins, "svs", &embed("v2")).await;

        assert_eq!(outcome, PinSync::Failed { reason: "rate limited".to_string() });
        assert!(!outcome.updated());
        // Reference is left alone for the next run.
        assert_eq!(pins.get("svs"), Some(id.as_str()));
    }
}
