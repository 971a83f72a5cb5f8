pub mod error;
pub mod types;

pub use error::{DiscordError, Result};
pub use types::{Attachment, Embed, EmbedField, Message, User};

const BASE_URL: &str = "https://discord.com/api/v10";

/// Minimal Discord REST client: enough of the channel/message surface
/// for attachment intake and pinned-summary maintenance. No gateway.
#[derive(Clone)]
pub struct DiscordClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscordClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Post a message with an optional embed, returning the created
    /// message (the id is what gets persisted for pin tracking).
    pub async fn create_message(
        &self,
        channel_id: &str,
        content: &str,
        embed: Option<&Embed>,
    ) -> Result<Message> {
        let url = format!("{}/channels/{}/messages", self.base_url, channel_id);
        let body = message_body(content, embed);
        let resp = self.authed(self.client.post(&url)).json(&body).send().await?;
        let msg: Message = check(resp).await?.json().await?;
        tracing::debug!(channel_id, message_id = msg.id.as_str(), "Posted message");
        Ok(msg)
    }

    /// Edit an existing message. `DiscordError::NotFound` means the
    /// message has been deleted since we stored its id.
    pub async fn edit_message(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
        embed: Option<&Embed>,
    ) -> Result<Message> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        );
        let body = message_body(content, embed);
        let resp = self.authed(self.client.patch(&url)).json(&body).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    pub async fn pin_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let url = format!("{}/channels/{}/pins/{}", self.base_url, channel_id, message_id);
        let resp = self.authed(self.client.put(&url)).send().await?;
        check(resp).await?;
        tracing::info!(channel_id, message_id, "Pinned message");
        Ok(())
    }

    pub async fn delete_message(&self, channel_id: &str, message_id: &str) -> Result<()> {
        let url = format!(
            "{}/channels/{}/messages/{}",
            self.base_url, channel_id, message_id
        );
        let resp = self.authed(self.client.delete(&url)).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// Messages newer than `after` (a snowflake id), oldest-first.
    pub async fn messages_after(
        &self,
        channel_id: &str,
        after: &str,
        limit: u8,
    ) -> Result<Vec<Message>> {
        let url = format!(
            "{}/channels/{}/messages?after={}&limit={}",
            self.base_url, channel_id, after, limit
        );
        let resp = self.authed(self.client.get(&url)).send().await?;
        let mut messages: Vec<Message> = check(resp).await?.json().await?;
        // The API returns newest-first.
        messages.reverse();
        Ok(messages)
    }

    /// Latest message in a channel, if any. Used to anchor intake polling.
    pub async fn latest_message(&self, channel_id: &str) -> Result<Option<Message>> {
        let url = format!("{}/channels/{}/messages?limit=1", self.base_url, channel_id);
        let resp = self.authed(self.client.get(&url)).send().await?;
        let messages: Vec<Message> = check(resp).await?.json().await?;
        Ok(messages.into_iter().next())
    }

    /// Download attachment bytes from the CDN url (no auth required).
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        let resp = check(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("Bot {}", self.token))
    }
}

fn message_body(content: &str, embed: Option<&Embed>) -> serde_json::Value {
    match embed {
        Some(embed) => serde_json::json!({ "content": content, "embeds": [embed] }),
        None => serde_json::json!({ "content": content, "embeds": [] }),
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.as_u16() == 404 {
        return Err(DiscordError::NotFound);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Discord API request failed");
        return Err(DiscordError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_clears_embeds_when_none_given() {
        let body = message_body("", None);
        assert_eq!(body["embeds"].as_array().unwrap().len(), 0);

        let embed = Embed::new("t").field("a", "b");
        let body = message_body("hi", Some(&embed));
        assert_eq!(body["embeds"][0]["title"], "t");
        assert_eq!(body["content"], "hi");
    }
}
