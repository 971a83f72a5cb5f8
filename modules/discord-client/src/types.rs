use serde::{Deserialize, Serialize};

/// A rich embed as accepted by the Discord message endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl Embed {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            color: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }
}

/// Subset of a Discord message object: ids are snowflake strings on the
/// wire and stay strings throughout.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<User>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_serializes_without_empty_fields() {
        let embed = Embed::new("Leaderboard").color(0x3498db);
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["title"], "Leaderboard");
        assert!(json.get("fields").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn message_parses_attachments_and_author() {
        let json = r#"{
            "id": "111222333444555666",
            "channel_id": "999",
            "author": {"id": "42", "username": "warden"},
            "attachments": [
                {"id": "1", "filename": "board.png", "url": "https://cdn.example/board.png"}
            ]
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "111222333444555666");
        assert_eq!(msg.author.unwrap().id, "42");
        assert_eq!(msg.attachments[0].filename, "board.png");
    }
}
