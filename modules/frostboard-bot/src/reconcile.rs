//! Merging one upload's consolidated entries into the event worksheet.
//!
//! Every upload appends a fresh timestamped score column and upserts
//! rows by normalized player name. Rows and columns only ever grow; a
//! player absent from this upload keeps a blank cell in the new column.

use std::collections::HashMap;

use anyhow::Result;
use frostboard_common::{normalize_name, ScoreEntry};
use tracing::info;

use crate::traits::EventSheet;

/// What one reconciliation run did to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub updated: usize,
    pub appended: usize,
    /// 1-based index of the score column this run wrote.
    pub target_col: u32,
}

/// Append a new column headed `label` and upsert `entries` into it.
///
/// Existing rows are matched by normalized name; their Name and Tag
/// cells are rewritten with this upload's canonical values even when
/// unchanged. New players get a fresh row, blank in every earlier
/// column. Appended rows register in the lookup immediately, so a name
/// appearing twice in `entries` lands in one row.
pub async fn reconcile(
    sheet: &dyn EventSheet,
    entries: &[ScoreEntry],
    label: &str,
) -> Result<ReconcileOutcome> {
    let mut header = sheet.header_row().await?;
    if header.is_empty() {
        // Fresh worksheet: seed the identity columns.
        sheet.update_cell(1, 1, "Name").await?;
        sheet.update_cell(1, 2, "Tag").await?;
        header = vec!["Name".to_string(), "Tag".to_string()];
    }
    let target_col = header.len().max(2) as u32 + 1;
    sheet.update_cell(1, target_col, label).await?;

    let rows = sheet.all_values().await?;
    // Sheet row index for the next append: one past the last populated
    // row, counting blank-name rows too.
    let mut next_row = rows.len().max(1) as u32 + 1;
    let mut lookup: HashMap<String, u32> = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(idx, row)| {
            let name = row.first().map(String::as_str).unwrap_or("").trim();
            (!name.is_empty()).then(|| (normalize_name(name), idx as u32 + 1))
        })
        .collect();

    let mut updated = 0;
    let mut appended = 0;

    for entry in entries {
        let key = normalize_name(&entry.name);
        let score = entry.score.to_string();
        match lookup.get(&key) {
            Some(&row) => {
                sheet.update_cell(row, 1, &entry.name).await?;
                sheet.update_cell(row, 2, &entry.tag).await?;
                sheet.update_cell(row, target_col, &score).await?;
                updated += 1;
            }
            None => {
                let mut row = vec![String::new(); target_col as usize];
                row[0] = entry.name.clone();
                row[1] = entry.tag.clone();
                row[target_col as usize - 1] = score;
                sheet.append_row(&row).await?;
                lookup.insert(key, next_row);
                next_row += 1;
                appended += 1;
            }
        }
    }

    info!(updated, appended, target_col, label, "Reconciled upload into sheet");
    Ok(ReconcileOutcome {
        updated,
        appended,
        target_col,
    })
}
