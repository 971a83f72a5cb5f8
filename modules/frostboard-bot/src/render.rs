//! Rendering the reconciled sheet into the pinned summary embed.

use discord_client::Embed;
use frostboard_common::EventType;

use crate::parse::parse_score;

/// Entries per embed field.
pub const PAGE_SIZE: usize = 10;

const EMBED_BLUE: u32 = 0x3498db;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow {
    pub name: String,
    pub tag: String,
    pub score: u64,
}

/// Pull the rows that participated in this upload's column out of the
/// full sheet snapshot. Blank or malformed score cells mean "did not
/// participate", never zero. Rows come back sorted by score descending;
/// equal scores keep their sheet order (stable sort).
pub fn scoreboard_rows(values: &[Vec<String>], target_col: u32) -> Vec<RankedRow> {
    let col = target_col as usize - 1;
    let mut rows: Vec<RankedRow> = values
        .iter()
        .skip(1)
        .filter(|row| row.first().is_some_and(|name| !name.trim().is_empty()))
        .filter_map(|row| {
            let score = parse_score(row.get(col)?)?;
            Some(RankedRow {
                name: row[0].clone(),
                tag: row.get(1).cloned().unwrap_or_default(),
                score,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows
}

/// Build the summary embed: rank-ordered lines in chunks of
/// [`PAGE_SIZE`], one embed field per chunk.
pub fn render_summary(event: EventType, label: &str, rows: &[RankedRow]) -> Embed {
    let mut embed =
        Embed::new(format!("{} Leaderboard ({label})", event.label())).color(EMBED_BLUE);

    for (chunk_idx, chunk) in rows.chunks(PAGE_SIZE).enumerate() {
        let start = chunk_idx * PAGE_SIZE;
        let text = chunk
            .iter()
            .enumerate()
            .map(|(j, row)| {
                format!(
                    "**{}.** {} (**{}**) – *{}*",
                    start + j + 1,
                    row.name,
                    row.tag,
                    row.score
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let name = if start == 0 {
            "Leaderboard".to_string()
        } else {
            format!("Leaderboard ({}-{})", start + 1, start + chunk.len())
        };
        embed = embed.field(name, text);
    }

    embed
}
