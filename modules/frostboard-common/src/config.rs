use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub leaderboard_channel_id: String,

    // Google Sheets
    pub sheets_token: String,
    pub spreadsheet_id: String,

    // OCR
    pub ocr_api_key: String,
    pub ocr_api_url: Option<String>,

    // Pipeline
    pub clan_tag: String,
    pub upload_timeout_secs: u64,
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            discord_token: required_env("DISCORD_TOKEN"),
            leaderboard_channel_id: required_env("LEADERBOARD_CHANNEL_ID"),
            sheets_token: required_env("SHEETS_TOKEN"),
            spreadsheet_id: required_env("SPREADSHEET_ID"),
            ocr_api_key: required_env("OCR_API_KEY"),
            ocr_api_url: env::var("OCR_API_URL").ok(),
            clan_tag: env::var("CLAN_TAG").unwrap_or_else(|_| "[PnK]".to_string()),
            upload_timeout_secs: env::var("UPLOAD_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("UPLOAD_TIMEOUT_SECS must be a number"),
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string())),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
