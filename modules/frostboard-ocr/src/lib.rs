pub mod error;
pub mod types;

pub use error::{OcrError, Result};
pub use types::OcrResponse;

use base64::Engine;

const DEFAULT_BASE_URL: &str = "https://api.ocr.space/parse/image";

/// Client for an OCR.space-compatible OCR endpoint. Takes raw image
/// bytes, returns the recognized text split into trimmed lines.
pub struct OcrClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OcrClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point at a self-hosted endpoint instead of the public API.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Recognize text in one image. Lines come back in top-to-bottom
    /// reading order; empty lines are dropped.
    pub async fn recognize(&self, image: &[u8]) -> Result<Vec<String>> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let image_field = format!("data:image/png;base64,{encoded}");
        let form = [
            ("apikey", self.api_key.as_str()),
            ("base64Image", image_field.as_str()),
            ("OCREngine", "2"),
            ("scale", "true"),
        ];

        let resp = self
            .client
            .post(&self.base_url)
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OcrError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: OcrResponse = resp.json().await?;
        let lines = parsed.into_lines()?;
        tracing::debug!(count = lines.len(), "OCR produced text lines");
        Ok(lines)
    }
}
