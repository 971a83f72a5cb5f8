use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Event categories ---

/// The closed set of in-client competitions we track. Each gets its own
/// worksheet and its own pinned summary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    BearTrap1,
    BearTrap2,
    CrazyJoe,
    Koi,
    Svs,
    Foundry,
    CanyonClash,
    CastleBattle,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::BearTrap1,
        EventType::BearTrap2,
        EventType::CrazyJoe,
        EventType::Koi,
        EventType::Svs,
        EventType::Foundry,
        EventType::CanyonClash,
        EventType::CastleBattle,
        EventType::Other,
    ];

    /// Human-facing label, also the worksheet title.
    pub fn label(&self) -> &'static str {
        match self {
            EventType::BearTrap1 => "Bear Trap 1",
            EventType::BearTrap2 => "Bear Trap 2",
            EventType::CrazyJoe => "Crazy Joe",
            EventType::Koi => "KOI",
            EventType::Svs => "SVS",
            EventType::Foundry => "Foundry",
            EventType::CanyonClash => "Canyon Clash",
            EventType::CastleBattle => "Castle Battle",
            EventType::Other => "Other",
        }
    }

    /// Lowercased label, the key for the persisted pin-reference map.
    pub fn key(&self) -> String {
        self.label().to_lowercase()
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    /// Accepts the display label (case-insensitive) or a dashed slug
    /// like `bear-trap-1`, as typed on the CLI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .iter()
            .find(|e| e.label().to_lowercase() == slug)
            .copied()
            .ok_or_else(|| format!("unknown event type: {s}"))
    }
}

// --- Score entries ---

/// One (name, tag, score) record. The same shape flows through every
/// pipeline stage: raw off the OCR lines, consolidated per player, and
/// final after nickname canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub tag: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, score: u64) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            score,
        }
    }
}

/// Normalize a player name for identity comparison: trim and lowercase.
/// Row identity in the event sheet and dedup identity in consolidation
/// both use this form.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Header label for a new score column, e.g. `2026-08-30 14:05 UTC`.
pub fn column_label(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_type_parses_labels_and_slugs() {
        assert_eq!("Bear Trap 1".parse::<EventType>(), Ok(EventType::BearTrap1));
        assert_eq!("bear-trap-2".parse::<EventType>(), Ok(EventType::BearTrap2));
        assert_eq!("svs".parse::<EventType>(), Ok(EventType::Svs));
        assert!("bear trap 9".parse::<EventType>().is_err());
    }

    #[test]
    fn event_key_is_lowercased_label() {
        assert_eq!(EventType::CanyonClash.key(), "canyon clash");
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_name("  FrostWolf "), "frostwolf");
    }

    #[test]
    fn column_label_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 30, 14, 5, 59).unwrap();
        assert_eq!(column_label(at), "2026-08-30 14:05 UTC");
    }
}
