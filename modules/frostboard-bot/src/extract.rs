//! Turning a flat OCR line sequence into per-player score entries.
//!
//! The screenshot layout is column-like but noisy: a player's score can
//! land a couple of lines before their name or several lines after it,
//! and rank numerals drift into the neighborhood. Each name line is
//! paired with the best score in a fixed window around it.

use std::collections::HashMap;

use frostboard_common::{normalize_name, ScoreEntry};

use crate::parse::{parse_score, parse_tag_and_name};

/// Lines scanned before a name line for its score.
pub const WINDOW_BEFORE: usize = 2;
/// Lines scanned after a name line for its score.
pub const WINDOW_AFTER: usize = 7;

/// Walk the OCR line sequence and emit one raw entry per name line that
/// has at least one parseable score within `[i-2, i+7]` (clamped). The
/// window maximum wins, which discards stray rank numerals. Name lines
/// with no score nearby are dropped: a name without a score is not
/// actionable.
///
/// `tag_filter` restricts extraction to lines containing the alliance's
/// own tag, mirroring the in-client board we care about.
pub fn extract_entries(lines: &[String], tag_filter: Option<&str>) -> Vec<ScoreEntry> {
    let mut entries = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        if let Some(tag) = tag_filter {
            if !line.contains(tag) {
                continue;
            }
        }
        let Some((tag, name)) = parse_tag_and_name(line) else {
            continue;
        };

        let start = i.saturating_sub(WINDOW_BEFORE);
        let end = (i + WINDOW_AFTER).min(lines.len() - 1);
        let best = (start..=end).filter_map(|j| parse_score(&lines[j])).max();

        match best {
            Some(score) => entries.push(ScoreEntry::new(name, tag, score)),
            None => {
                tracing::debug!(line = line.as_str(), "Name line with no score in window, dropped")
            }
        }
    }

    entries
}

/// Collapse raw entries to one per normalized name, keeping the entry
/// with the highest score. Iterates in input order; a later entry only
/// replaces an earlier one when its score is strictly greater, so ties
/// keep the first-seen name/tag spelling and output order is the
/// first-seen order.
pub fn consolidate(entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    let mut kept: Vec<ScoreEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let key = normalize_name(&entry.name);
        match index.get(&key) {
            Some(&i) if entry.score > kept[i].score => kept[i] = entry,
            Some(_) => {}
            None => {
                index.insert(key, kept.len());
                kept.push(entry);
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pairs_each_name_with_max_score_in_window() {
        let ocr = lines(&[
            "#1 [PnK] Foo",
            "Score 12,345",
            "#2 [PnK] Bar",
            "999",
        ]);
        let entries = extract_entries(&ocr, None);
        // Foo's window covers all four lines; the max keeps 12345 over
        // the rank numerals and Bar's 999.
        assert_eq!(
            entries,
            vec![
                ScoreEntry::new("Foo", "[PnK]", 12345),
                ScoreEntry::new("Bar", "[PnK]", 12345),
            ]
        );
    }

    #[test]
    fn name_without_nearby_score_is_dropped() {
        let ocr = lines(&[
            "[PnK] Ghost",
            "damage dealt",
            "no digits here",
        ]);
        assert!(extract_entries(&ocr, None).is_empty());
    }

    #[test]
    fn window_is_clamped_at_sequence_bounds() {
        let ocr = lines(&["[PnK] First"]);
        assert!(extract_entries(&ocr, None).is_empty());

        let ocr = lines(&["777", "x", "[PnK] First"]);
        assert_eq!(
            extract_entries(&ocr, None),
            vec![ScoreEntry::new("First", "[PnK]", 777)]
        );
    }

    #[test]
    fn score_beyond_window_is_not_associated() {
        // Score sits 8 lines after the name: outside [i-2, i+7].
        let mut raw = vec!["[PnK] Far"];
        raw.extend(["x"; 7]);
        raw.push("123");
        assert!(extract_entries(&lines(&raw), None).is_empty());
    }

    #[test]
    fn tag_filter_skips_other_alliances() {
        let ocr = lines(&["[WSV] Rival", "500", "[PnK] Ours", "700"]);
        let entries = extract_entries(&ocr, Some("[PnK]"));
        assert_eq!(entries, vec![ScoreEntry::new("Ours", "[PnK]", 700)]);
    }

    #[test]
    fn consolidation_keeps_maximum_score_per_name() {
        let entries = vec![
            ScoreEntry::new("Foo", "[PnK]", 500),
            ScoreEntry::new("foo ", "[PnK]", 700),
            ScoreEntry::new("Bar", "[PnK]", 100),
        ];
        assert_eq!(
            consolidate(entries),
            vec![
                ScoreEntry::new("foo ", "[PnK]", 700),
                ScoreEntry::new("Bar", "[PnK]", 100),
            ]
        );
    }

    #[test]
    fn consolidation_ties_keep_first_seen_entry() {
        let entries = vec![
            ScoreEntry::new("Foo", "[PnK]", 500),
            ScoreEntry::new("FOO", "[AltTag]", 500),
        ];
        assert_eq!(
            consolidate(entries),
            vec![ScoreEntry::new("Foo", "[PnK]", 500)]
        );
    }

    #[test]
    fn consolidation_preserves_first_seen_order() {
        let entries = vec![
            ScoreEntry::new("C", "[PnK]", 1),
            ScoreEntry::new("A", "[PnK]", 2),
            ScoreEntry::new("c", "[PnK]", 9),
            ScoreEntry::new("B", "[PnK]", 3),
        ];
        let consolidated = consolidate(entries);
        let names: Vec<&str> = consolidated.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "A", "B"]);
    }
}
