//! Upload intake implementations: local files for operator runs, and a
//! polling wait on the Discord channel for the original "upload your
//! screenshots now" flow.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, warn};

use discord_client::{DiscordClient, Message};

use crate::traits::{UploadIntake, UploadWait};

// ---------------------------------------------------------------------------
// FileIntake
// ---------------------------------------------------------------------------

/// Reads screenshots straight from disk. Never times out.
pub struct FileIntake {
    paths: Vec<PathBuf>,
}

impl FileIntake {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl UploadIntake for FileIntake {
    async fn await_upload(&self, _deadline: Duration) -> Result<UploadWait> {
        let mut images = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            images.push(bytes);
        }
        Ok(UploadWait::Received(images))
    }
}

// ---------------------------------------------------------------------------
// DiscordIntake
// ---------------------------------------------------------------------------

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polls the leaderboard channel for the first message with attachments
/// posted after the wait begins, optionally restricted to one uploader.
/// The upload message is deleted once its attachments are downloaded,
/// keeping the channel clean (and the screenshots out of sight).
pub struct DiscordIntake {
    client: DiscordClient,
    channel_id: String,
    uploader_id: Option<String>,
}

impl DiscordIntake {
    pub fn new(
        client: DiscordClient,
        channel_id: impl Into<String>,
        uploader_id: Option<String>,
    ) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
            uploader_id,
        }
    }
}

/// Pick the upload message out of one poll batch: the oldest message
/// carrying attachments, restricted to `uploader_id` when set. Messages
/// with no author (webhooks) never match a filter.
fn first_upload<'a>(messages: &'a [Message], uploader_id: Option<&str>) -> Option<&'a Message> {
    messages.iter().find(|msg| {
        if msg.attachments.is_empty() {
            return false;
        }
        match uploader_id {
            Some(id) => msg.author.as_ref().is_some_and(|a| a.id == id),
            None => true,
        }
    })
}

#[async_trait]
impl UploadIntake for DiscordIntake {
    async fn await_upload(&self, deadline: Duration) -> Result<UploadWait> {
        let deadline_at = Instant::now() + deadline;

        // Anchor on the newest existing message so only uploads posted
        // after the prompt are considered.
        let mut after = self
            .client
            .latest_message(&self.channel_id)
            .await?
            .map(|m| m.id)
            .unwrap_or_else(|| "0".to_string());

        loop {
            if Instant::now() >= deadline_at {
                return Ok(UploadWait::TimedOut);
            }

            let messages = self.client.messages_after(&self.channel_id, &after, 50).await?;
            if let Some(last) = messages.last() {
                after = last.id.clone();
            }
            if let Some(msg) = first_upload(&messages, self.uploader_id.as_deref()) {
                info!(count = msg.attachments.len(), "Downloading uploaded screenshots");
                let mut images = Vec::with_capacity(msg.attachments.len());
                for attachment in &msg.attachments {
                    images.push(self.client.download(&attachment.url).await?);
                }
                if let Err(err) = self.client.delete_message(&self.channel_id, &msg.id).await {
                    warn!(error = %err, "Could not delete upload message");
                }
                return Ok(UploadWait::Received(images));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discord_client::{Attachment, User};

    fn message(id: &str, author_id: Option<&str>, attachments: usize) -> Message {
        Message {
            id: id.to_string(),
            channel_id: "999".to_string(),
            content: String::new(),
            author: author_id.map(|a| User {
                id: a.to_string(),
                username: "warden".to_string(),
            }),
            attachments: (0..attachments)
                .map(|i| Attachment {
                    id: i.to_string(),
                    filename: format!("board-{i}.png"),
                    url: format!("https://cdn.example/board-{i}.png"),
                })
                .collect(),
        }
    }

    #[test]
    fn oldest_message_with_attachments_wins() {
        let batch = vec![
            message("1", Some("42"), 0),
            message("2", Some("42"), 2),
            message("3", Some("42"), 1),
        ];
        assert_eq!(first_upload(&batch, None).map(|m| m.id.as_str()), Some("2"));
    }

    #[test]
    fn chatter_without_attachments_never_matches() {
        let batch = vec![message("1", Some("42"), 0), message("2", None, 0)];
        assert!(first_upload(&batch, None).is_none());
    }

    #[test]
    fn uploader_filter_skips_other_authors() {
        let batch = vec![
            message("1", Some("7"), 1),
            message("2", None, 1),
            message("3", Some("42"), 1),
        ];
        assert_eq!(
            first_upload(&batch, Some("42")).map(|m| m.id.as_str()),
            Some("3")
        );
        assert!(first_upload(&batch, Some("8")).is_none());
    }

    #[test]
    fn any_author_matches_without_a_filter() {
        let batch = vec![message("1", None, 1)];
        assert_eq!(first_upload(&batch, None).map(|m| m.id.as_str()), Some("1"));
    }
}
