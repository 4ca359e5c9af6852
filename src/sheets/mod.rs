//! Google Sheets spreadsheet sink
//!
//! One operation: overwrite a rectangular range with a 2-D grid of values,
//! `valueInputOption=USER_ENTERED` so numbers land as numbers.

use serde_json::{json, Value};
use std::time::Duration;

use crate::config::SheetsConfig;

const SHEETS_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin REST client for the Sheets values endpoint
pub struct SpreadsheetSink {
    access_token: String,
    http: reqwest::Client,
}

impl SpreadsheetSink {
    pub fn new(config: SheetsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SHEETS_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            access_token: config.access_token,
            http,
        }
    }

    /// Write a grid of values to a range in the given spreadsheet
    pub async fn update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> Result<(), String> {
        let url = format!(
            "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
            spreadsheet_id, range
        );

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(|e| format!("Failed to update spreadsheet: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("Sheets API error ({}): {}", status, text));
        }

        Ok(())
    }
}
