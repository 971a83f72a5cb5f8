pub mod error;
pub mod types;

pub use error::{Result, SheetsError};
pub use types::{SpreadsheetMeta, ValueRange};

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Grid size for newly created event worksheets: enough columns for a
/// long run of score uploads without resizing.
const NEW_SHEET_ROWS: u32 = 200;
const NEW_SHEET_COLS: u32 = 40;

/// Client for the Google Sheets v4 values API, scoped to what the
/// leaderboard pipeline needs: per-worksheet header/row reads, single
/// cell writes, and row appends.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SheetsClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Open a worksheet by title, creating it when absent.
    pub async fn worksheet(&self, spreadsheet_id: &str, title: &str) -> Result<Worksheet> {
        let url = format!(
            "{}/spreadsheets/{}?fields=sheets.properties.title",
            self.base_url, spreadsheet_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let meta: SpreadsheetMeta = check(resp).await?.json().await?;

        if !meta.has_worksheet(title) {
            tracing::info!(title, "Worksheet missing, creating");
            self.add_worksheet(spreadsheet_id, title).await?;
        }

        Ok(Worksheet {
            client: self.clone(),
            spreadsheet_id: spreadsheet_id.to_string(),
            title: title.to_string(),
        })
    }

    async fn add_worksheet(&self, spreadsheet_id: &str, title: &str) -> Result<()> {
        let url = format!("{}/spreadsheets/{}:batchUpdate", self.base_url, spreadsheet_id);
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": NEW_SHEET_ROWS,
                            "columnCount": NEW_SHEET_COLS,
                        }
                    }
                }
            }]
        });
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

/// Handle to one worksheet. Rows and columns are 1-based; row 1 is the
/// header row, data rows start at row 2.
pub struct Worksheet {
    client: SheetsClient,
    spreadsheet_id: String,
    title: String,
}

impl Worksheet {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// All values in one row, left to right, trailing blanks omitted.
    pub async fn row_values(&self, row: u32) -> Result<Vec<String>> {
        let range = self.range(&format!("{row}:{row}"));
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.client.base_url, self.spreadsheet_id, range
        );
        let resp = self
            .client
            .client
            .get(&url)
            .bearer_auth(&self.client.token)
            .send()
            .await?;
        let values: ValueRange = check(resp).await?.json().await?;
        Ok(values.into_strings().into_iter().next().unwrap_or_default())
    }

    /// Every populated row in the worksheet, header included.
    pub async fn all_values(&self) -> Result<Vec<Vec<String>>> {
        let range = encode(&format!("'{}'", self.title));
        let url = format!(
            "{}/spreadsheets/{}/values/{}",
            self.client.base_url, self.spreadsheet_id, range
        );
        let resp = self
            .client
            .client
            .get(&url)
            .bearer_auth(&self.client.token)
            .send()
            .await?;
        let values: ValueRange = check(resp).await?.json().await?;
        Ok(values.into_strings())
    }

    /// Write a single cell at (row, col), both 1-based.
    pub async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        let range = self.range(&cell_ref(row, col));
        let url = format!(
            "{}/spreadsheets/{}/values/{}?valueInputOption=RAW",
            self.client.base_url, self.spreadsheet_id, range
        );
        let body = serde_json::json!({ "values": [[value]] });
        let resp = self
            .client
            .client
            .put(&url)
            .bearer_auth(&self.client.token)
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    /// Append one row after the last populated row.
    pub async fn append_row(&self, values: &[String]) -> Result<()> {
        let range = self.range("A1");
        let url = format!(
            "{}/spreadsheets/{}/values/{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.client.base_url, self.spreadsheet_id, range
        );
        let body = serde_json::json!({ "values": [values] });
        let resp = self
            .client
            .client
            .post(&url)
            .bearer_auth(&self.client.token)
            .json(&body)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    fn range(&self, cells: &str) -> String {
        encode(&format!("'{}'!{}", self.title, cells))
    }
}

/// Surface non-2xx responses as `SheetsError::Api` with the body text.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// Percent-encode the characters that actually occur in our ranges
/// (worksheet titles are event labels: letters, digits, spaces).
fn encode(range: &str) -> String {
    range.replace(' ', "%20").replace('\'', "%27")
}

/// A1 reference for a 1-based (row, col) pair, e.g. (2, 28) -> "AB2".
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", col_letters(col))
}

/// Column letters for a 1-based column index: 1 -> A, 26 -> Z, 27 -> AA.
pub fn col_letters(mut col: u32) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_cover_single_and_double_width() {
        assert_eq!(col_letters(1), "A");
        assert_eq!(col_letters(26), "Z");
        assert_eq!(col_letters(27), "AA");
        assert_eq!(col_letters(52), "AZ");
        assert_eq!(col_letters(703), "AAA");
    }

    #[test]
    fn cell_refs_are_a1_notation() {
        assert_eq!(cell_ref(1, 3), "C1");
        assert_eq!(cell_ref(14, 28), "AB14");
    }

    #[test]
    fn ranges_encode_spaces_in_titles() {
        assert_eq!(encode("'Bear Trap 1'!C1"), "%27Bear%20Trap%201%27!C1");
    }
}
