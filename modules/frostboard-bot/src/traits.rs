// Trait abstractions for the upload pipeline's external collaborators.
//
// TextRecognizer — OCR engine (image bytes in, text lines out).
// EventSheet / SheetProvider — the per-event worksheet grid.
// SummaryChannel — the pinned-summary message surface.
// UploadIntake — deadline-bounded wait for screenshot uploads.
//
// These enable deterministic testing with the in-memory fakes in
// `testing`: no network, no credentials. `cargo test` in seconds.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use discord_client::{DiscordClient, DiscordError, Embed};
use sheets_client::{SheetsClient, Worksheet};

// ---------------------------------------------------------------------------
// TextRecognizer
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognized text lines for one image, top-to-bottom.
    async fn recognize(&self, image: &[u8]) -> Result<Vec<String>>;
}

#[async_trait]
impl TextRecognizer for frostboard_ocr::OcrClient {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<String>> {
        Ok(self.recognize(image).await?)
    }
}

// ---------------------------------------------------------------------------
// EventSheet / SheetProvider
// ---------------------------------------------------------------------------

/// One event's worksheet. Rows and columns are 1-based; row 1 is the
/// header, data rows start at row 2.
#[async_trait]
pub trait EventSheet: Send + Sync {
    async fn header_row(&self) -> Result<Vec<String>>;
    async fn all_values(&self) -> Result<Vec<Vec<String>>>;
    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()>;
    async fn append_row(&self, values: &[String]) -> Result<()>;
}

#[async_trait]
impl EventSheet for Worksheet {
    async fn header_row(&self) -> Result<Vec<String>> {
        Ok(self.row_values(1).await?)
    }

    async fn all_values(&self) -> Result<Vec<Vec<String>>> {
        Ok(Worksheet::all_values(self).await?)
    }

    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        Ok(Worksheet::update_cell(self, row, col, value).await?)
    }

    async fn append_row(&self, values: &[String]) -> Result<()> {
        Ok(Worksheet::append_row(self, values).await?)
    }
}

/// Hands out the worksheet for an event, creating it when absent.
#[async_trait]
pub trait SheetProvider: Send + Sync {
    async fn event_sheet(&self, title: &str) -> Result<Arc<dyn EventSheet>>;
}

pub struct GoogleSheetProvider {
    client: SheetsClient,
    spreadsheet_id: String,
}

impl GoogleSheetProvider {
    pub fn new(client: SheetsClient, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }
}

#[async_trait]
impl SheetProvider for GoogleSheetProvider {
    async fn event_sheet(&self, title: &str) -> Result<Arc<dyn EventSheet>> {
        let ws = self.client.worksheet(&self.spreadsheet_id, title).await?;
        Ok(Arc::new(ws))
    }
}

// ---------------------------------------------------------------------------
// SummaryChannel
// ---------------------------------------------------------------------------

/// Failure modes the pin synchronizer branches on. `NotFound` means the
/// referenced summary message no longer exists; everything else is a
/// transport problem.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("message not found")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait SummaryChannel: Send + Sync {
    /// Replace the content of an existing summary message.
    async fn edit_summary(
        &self,
        message_id: &str,
        embed: &Embed,
    ) -> std::result::Result<(), ChannelError>;

    /// Post a fresh summary message, pin it, and return its id.
    async fn create_pinned_summary(
        &self,
        embed: &Embed,
    ) -> std::result::Result<String, ChannelError>;
}

pub struct DiscordSummaryChannel {
    client: DiscordClient,
    channel_id: String,
}

impl DiscordSummaryChannel {
    pub fn new(client: DiscordClient, channel_id: impl Into<String>) -> Self {
        Self {
            client,
            channel_id: channel_id.into(),
        }
    }
}

fn to_channel_error(err: DiscordError) -> ChannelError {
    match err {
        DiscordError::NotFound => ChannelError::NotFound,
        other => ChannelError::Transport(other.to_string()),
    }
}

#[async_trait]
impl SummaryChannel for DiscordSummaryChannel {
    async fn edit_summary(
        &self,
        message_id: &str,
        embed: &Embed,
    ) -> std::result::Result<(), ChannelError> {
        self.client
            .edit_message(&self.channel_id, message_id, "", Some(embed))
            .await
            .map_err(to_channel_error)?;
        Ok(())
    }

    async fn create_pinned_summary(
        &self,
        embed: &Embed,
    ) -> std::result::Result<String, ChannelError> {
        let msg = self
            .client
            .create_message(&self.channel_id, "", Some(embed))
            .await
            .map_err(to_channel_error)?;
        self.client
            .pin_message(&self.channel_id, &msg.id)
            .await
            .map_err(to_channel_error)?;
        Ok(msg.id)
    }
}

// ---------------------------------------------------------------------------
// UploadIntake
// ---------------------------------------------------------------------------

/// Outcome of waiting for the caller's screenshot upload. Timing out is
/// an expected result, not an error: nothing has been mutated yet and
/// the run simply ends.
#[derive(Debug)]
pub enum UploadWait {
    Received(Vec<Vec<u8>>),
    TimedOut,
}

#[async_trait]
pub trait UploadIntake: Send + Sync {
    /// Wait up to `deadline` for the caller to supply image bytes.
    async fn await_upload(&self, deadline: Duration) -> Result<UploadWait>;
}
