use serde::Deserialize;

use crate::error::{OcrError, Result};

/// Top-level OCR.space response envelope.
#[derive(Debug, Deserialize)]
pub struct OcrResponse {
    #[serde(rename = "ParsedResults", default)]
    pub parsed_results: Vec<ParsedResult>,
    #[serde(rename = "IsErroredOnProcessing", default)]
    pub is_errored: bool,
    // String or array of strings depending on the failure.
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    pub parsed_text: String,
}

impl OcrResponse {
    /// Flatten all parsed regions into trimmed, non-empty lines in
    /// reading order.
    pub fn into_lines(self) -> Result<Vec<String>> {
        if self.is_errored {
            let msg = match self.error_message {
                Some(serde_json::Value::String(s)) => s,
                Some(serde_json::Value::Array(parts)) => parts
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                _ => "unspecified OCR failure".to_string(),
            };
            return Err(OcrError::Engine(msg));
        }

        Ok(self
            .parsed_results
            .iter()
            .flat_map(|r| r.parsed_text.lines())
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_parsed_text_into_clean_lines() {
        let json = r#"{
            "ParsedResults": [{"ParsedText": "Rank 1\r\n[PnK] Foo\r\nScore 12,345\r\n\r\n"}],
            "IsErroredOnProcessing": false
        }"#;
        let resp: OcrResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            resp.into_lines().unwrap(),
            vec!["Rank 1", "[PnK] Foo", "Score 12,345"]
        );
    }

    #[test]
    fn engine_failure_surfaces_message_string_or_array() {
        let json = r#"{"IsErroredOnProcessing": true, "ErrorMessage": ["bad image", "timeout"]}"#;
        let resp: OcrResponse = serde_json::from_str(json).unwrap();
        match resp.into_lines() {
            Err(OcrError::Engine(msg)) => assert_eq!(msg, "bad image; timeout"),
            other => panic!("expected engine error, got {other:?}"),
        }
    }

    #[test]
    fn empty_results_yield_no_lines() {
        let json = r#"{"ParsedResults": [], "IsErroredOnProcessing": false}"#;
        let resp: OcrResponse = serde_json::from_str(json).unwrap();
        assert!(resp.into_lines().unwrap().is_empty());
    }
}
