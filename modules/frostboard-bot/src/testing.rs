//! In-memory fakes for the pipeline's collaborator traits.
//!
//! Deterministic, no network, no credentials. Shared by unit tests and
//! the integration tests (via the `test-support` feature).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use discord_client::Embed;

use crate::traits::{
    ChannelError, EventSheet, SheetProvider, SummaryChannel, TextRecognizer, UploadIntake,
    UploadWait,
};

// ---------------------------------------------------------------------------
// MemorySheet
// ---------------------------------------------------------------------------

/// Grid-backed worksheet fake. Mimics the values API: reads omit
/// trailing blanks, writes extend the grid as needed.
pub struct MemorySheet {
    grid: Mutex<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn empty() -> Self {
        Self {
            grid: Mutex::new(Vec::new()),
        }
    }

    pub fn with_grid<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        let grid = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self {
            grid: Mutex::new(grid),
        }
    }

    /// Snapshot of the grid with every row padded to the widest row,
    /// for direct equality assertions.
    pub fn grid(&self) -> Vec<Vec<String>> {
        let grid = self.grid.lock().unwrap();
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        grid.iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

fn strip_trailing_blanks(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

#[async_trait]
impl EventSheet for MemorySheet {
    async fn header_row(&self) -> Result<Vec<String>> {
        let grid = self.grid.lock().unwrap();
        Ok(strip_trailing_blanks(
            grid.first().cloned().unwrap_or_default(),
        ))
    }

    async fn all_values(&self) -> Result<Vec<Vec<String>>> {
        let grid = self.grid.lock().unwrap();
        Ok(grid.iter().cloned().map(strip_trailing_blanks).collect())
    }

    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        let mut grid = self.grid.lock().unwrap();
        let (row, col) = (row as usize - 1, col as usize - 1);
        if grid.len() <= row {
            grid.resize(row + 1, Vec::new());
        }
        if grid[row].len() <= col {
            grid[row].resize(col + 1, String::new());
        }
        grid[row][col] = value.to_string();
        Ok(())
    }

    async fn append_row(&self, values: &[String]) -> Result<()> {
        self.grid.lock().unwrap().push(values.to_vec());
        Ok(())
    }
}

/// Provider handing out named `MemorySheet`s, created on first use.
#[derive(Default)]
pub struct MemorySheetProvider {
    sheets: Mutex<HashMap<String, Arc<MemorySheet>>>,
}

impl MemorySheetProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, title: &str) -> Arc<MemorySheet> {
        self.sheets
            .lock()
            .unwrap()
            .entry(title.to_string())
            .or_insert_with(|| Arc::new(MemorySheet::empty()))
            .clone()
    }
}

#[async_trait]
impl SheetProvider for MemorySheetProvider {
    async fn event_sheet(&self, title: &str) -> Result<Arc<dyn EventSheet>> {
        Ok(self.sheet(title))
    }
}

// ---------------------------------------------------------------------------
// MemoryChannel
// ---------------------------------------------------------------------------

/// Summary-channel fake. Messages live in a map; tests can make ids
/// vanish (stale pin) or force transport failures.
#[derive(Default)]
pub struct MemoryChannel {
    next_id: Mutex<u64>,
    messages: Mutex<HashMap<String, Embed>>,
    pinned: Mutex<Vec<String>>,
    broken: Mutex<Option<String>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1000),
            ..Self::default()
        }
    }

    /// Simulate a summary message being deleted out from under us.
    pub fn vanish(&self, message_id: &str) {
        self.messages.lock().unwrap().remove(message_id);
    }

    /// All subsequent calls fail with a transport error.
    pub fn break_transport(&self, reason: &str) {
        *self.broken.lock().unwrap() = Some(reason.to_string());
    }

    pub fn message(&self, message_id: &str) -> Option<Embed> {
        self.messages.lock().unwrap().get(message_id).cloned()
    }

    pub fn pinned_ids(&self) -> Vec<String> {
        self.pinned.lock().unwrap().clone()
    }

    fn check_transport(&self) -> std::result::Result<(), ChannelError> {
        match self.broken.lock().unwrap().as_ref() {
            Some(reason) => Err(ChannelError::Transport(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SummaryChannel for MemoryChannel {
    async fn edit_summary(
        &self,
        message_id: &str,
        embed: &Embed,
    ) -> std::result::Result<(), ChannelError> {
        self.check_transport()?;
        let mut messages = self.messages.lock().unwrap();
        match messages.get_mut(message_id) {
            Some(existing) => {
                *existing = embed.clone();
                Ok(())
            }
            None => Err(ChannelError::NotFound),
        }
    }

    async fn create_pinned_summary(
        &self,
        embed: &Embed,
    ) -> std::result::Result<String, ChannelError> {
        self.check_transport()?;
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let id = next_id.to_string();
        self.messages.lock().unwrap().insert(id.clone(), embed.clone());
        self.pinned.lock().unwrap().push(id.clone());
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// ScriptedRecognizer
// ---------------------------------------------------------------------------

/// OCR fake keyed by exact image bytes.
#[derive(Default)]
pub struct ScriptedRecognizer {
    pages: HashMap<Vec<u8>, Vec<String>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, image: &[u8], lines: &[&str]) -> Self {
        self.pages
            .insert(image.to_vec(), lines.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<Vec<String>> {
        Ok(self.pages.get(image).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// StaticIntake
// ---------------------------------------------------------------------------

/// Intake fake: hands over a fixed set of images, or times out.
pub struct StaticIntake {
    images: Option<Vec<Vec<u8>>>,
}

impl StaticIntake {
    pub fn received(images: &[&[u8]]) -> Self {
        Self {
            images: Some(images.iter().map(|i| i.to_vec()).collect()),
        }
    }

    pub fn timed_out() -> Self {
        Self { images: None }
    }
}

#[async_trait]
impl UploadIntake for StaticIntake {
    async fn await_upload(&self, _deadline: Duration) -> Result<UploadWait> {
        Ok(match &self.images {
            Some(images) => UploadWait::Received(images.clone()),
            None => UploadWait::TimedOut,
        })
    }
}

// ---------------------------------------------------------------------------
// Tracked ids for stale-pin tests
// ---------------------------------------------------------------------------

/// Precreate a pinned summary so tests can reference its id.
pub async fn seed_pinned_message(channel: &MemoryChannel, embed: &Embed) -> String {
    channel
        .create_pinned_summary(embed)
        .await
        .expect("seeding pinned message")
}
