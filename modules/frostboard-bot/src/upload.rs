//! One upload run, end to end: OCR lines in, reconciled sheet and
//! refreshed pinned summary out.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use frostboard_common::{column_label, EventType, ScoreEntry};

use crate::extract::{consolidate, extract_entries};
use crate::ledger::ImageLedger;
use crate::nickname::NicknameResolver;
use crate::pin::{sync_pin, PinStore, PinSync};
use crate::reconcile::reconcile;
use crate::render::{render_summary, scoreboard_rows};
use crate::traits::{SheetProvider, SummaryChannel, TextRecognizer, UploadWait};
use crate::transcript::Transcript;

/// Terminal conditions for one run. The first four end the run before
/// any sheet mutation; `Transport` aborts mid-run and leaves already
/// written cells in place (no rollback). A pin-sync failure is NOT an
/// error — it rides along in [`UploadReport`].
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload wait timed out")]
    TimedOut,

    #[error("no new images to process (empty upload, or all seen before)")]
    NoImages,

    #[error("OCR produced no usable lines")]
    NoLines,

    #[error("no name/score pairs found in the OCR lines")]
    NoEntries,

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// What one successful run did, for the caller-facing status reply.
#[derive(Debug)]
pub struct UploadReport {
    pub event: EventType,
    pub players: usize,
    pub updated: usize,
    pub appended: usize,
    pub column_label: String,
    pub pin: PinSync,
}

impl std::fmt::Display for UploadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} players processed ({} updated, {} new)", self.players, self.updated, self.appended)?;
        writeln!(f, "Column: {}", self.column_label)?;
        write!(f, "Pinned summary: {}", self.pin)
    }
}

/// The assembled pipeline. Collaborators come in behind traits so tests
/// run against in-memory fakes; durable state (ledger, transcript, pin
/// map) is owned here for the lifetime of the process.
pub struct UploadPipeline {
    recognizer: Arc<dyn TextRecognizer>,
    sheets: Arc<dyn SheetProvider>,
    channel: Arc<dyn SummaryChannel>,
    resolver: NicknameResolver,
    ledger: ImageLedger,
    transcript: Transcript,
    pins: PinStore,
    clan_tag: Option<String>,
}

impl UploadPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        sheets: Arc<dyn SheetProvider>,
        channel: Arc<dyn SummaryChannel>,
        resolver: NicknameResolver,
        ledger: ImageLedger,
        transcript: Transcript,
        pins: PinStore,
        clan_tag: Option<String>,
    ) -> Self {
        Self {
            recognizer,
            sheets,
            channel,
            resolver,
            ledger,
            transcript,
            pins,
            clan_tag,
        }
    }

    /// Process one upload for `event`. `caller` is recorded in the OCR
    /// transcript for attribution.
    pub async fn run(
        &mut self,
        event: EventType,
        caller: &str,
        wait: UploadWait,
    ) -> Result<UploadReport, UploadError> {
        let images = match wait {
            UploadWait::Received(images) => images,
            UploadWait::TimedOut => return Err(UploadError::TimedOut),
        };
        if images.is_empty() {
            return Err(UploadError::NoImages);
        }

        // OCR every image not seen before, concatenating lines in
        // upload order. Line order is load-bearing downstream.
        let mut lines: Vec<String> = Vec::new();
        let mut fresh = 0usize;
        for image in &images {
            if self.ledger.is_processed(image) {
                info!("Skipping previously processed image");
                continue;
            }
            self.ledger.mark_processed(image)?;
            fresh += 1;
            lines.extend(self.recognizer.recognize(image).await?);
        }
        if fresh == 0 {
            return Err(UploadError::NoImages);
        }
        if lines.is_empty() {
            return Err(UploadError::NoLines);
        }

        self.transcript.append(caller, &lines)?;

        let raw = extract_entries(&lines, self.clan_tag.as_deref());
        if raw.is_empty() {
            return Err(UploadError::NoEntries);
        }
        let final_entries: Vec<ScoreEntry> = consolidate(raw)
            .into_iter()
            .map(|entry| ScoreEntry {
                name: self.resolver.canonical(&entry.name),
                ..entry
            })
            .collect();

        let sheet = self.sheets.event_sheet(event.label()).await?;
        let label = column_label(Utc::now());
        let outcome = reconcile(sheet.as_ref(), &final_entries, &label).await?;

        // Render from what the sheet now holds, not the entry list, so
        // the summary reflects exactly what was persisted.
        let values = sheet.all_values().await?;
        let rows = scoreboard_rows(&values, outcome.target_col);
        let embed = render_summary(event, &label, &rows);
        let pin = sync_pin(self.channel.as_ref(), &mut self.pins, &event.key(), &embed).await;

        info!(
            event = event.label(),
            players = final_entries.len(),
            updated = outcome.updated,
            appended = outcome.appended,
            pin = %pin,
            "Upload run complete"
        );

        Ok(UploadReport {
            event,
            players: final_entries.len(),
            updated: outcome.updated,
            appended: outcome.appended,
            column_label: label,
            pin,
        })
    }
}
