use thiserror::Error;

pub type Result<T> = std::result::Result<T, OcrError>;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("OCR engine error: {0}")]
    Engine(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for OcrError {
    fn from(err: serde_json::Error) -> Self {
        OcrError::Parse(err.to_string())
    }
}
