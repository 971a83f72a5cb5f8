use serde::Deserialize;

/// Response body of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    // Absent entirely when the range is empty.
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Collapse cell values to display strings. The API returns strings
    /// for formatted values, but numbers can appear with some value
    /// render options; stringify those rather than failing.
    pub fn into_strings(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| match cell {
                        serde_json::Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Minimal `spreadsheets.get` response: just the worksheet titles.
#[derive(Debug, Deserialize)]
pub struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
pub struct SheetProperties {
    pub title: String,
}

impl SpreadsheetMeta {
    pub fn has_worksheet(&self, title: &str) -> bool {
        self.sheets.iter().any(|s| s.properties.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_stringifies_mixed_cells() {
        let json = r#"{"range": "A1:B2", "values": [["Foo", 12345], ["Bar", "999"]]}"#;
        let range: ValueRange = serde_json::from_str(json).unwrap();
        assert_eq!(
            range.into_strings(),
            vec![
                vec!["Foo".to_string(), "12345".to_string()],
                vec!["Bar".to_string(), "999".to_string()],
            ]
        );
    }

    #[test]
    fn empty_range_has_no_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range": "A1"}"#).unwrap();
        assert!(range.into_strings().is_empty());
    }

    #[test]
    fn meta_lookup_by_title() {
        let json = r#"{"sheets": [{"properties": {"title": "Bear Trap 1"}}]}"#;
        let meta: SpreadsheetMeta = serde_json::from_str(json).unwrap();
        assert!(meta.has_worksheet("Bear Trap 1"));
        assert!(!meta.has_worksheet("Foundry"));
    }
}
