//! Gemini file API: upload and readiness polling
//!
//! Uploaded media (video in particular) is processed asynchronously on the
//! remote side; `wait_until_active` polls at a fixed interval until the
//! file leaves the PROCESSING state.

use serde_json::Value;
use std::path::Path;
use std::time::Duration;

use super::{CompletionError, GeminiClient, API_BASE};

/// Fixed poll interval while the remote file is PROCESSING
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Remote file handle returned by the Gemini file API
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
    pub state: String,
}

impl UploadedFile {
    pub fn is_processing(&self) -> bool {
        self.state == "PROCESSING"
    }
}

impl GeminiClient {
    /// Upload a local file via the raw upload protocol
    pub async fn upload_file(&self, path: &Path) -> Result<UploadedFile, CompletionError> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CompletionError::Upload(format!("Failed to read {}: {}", path.display(), e)))?;

        let url = format!("{}/upload/v1beta/files", API_BASE);
        let response = self
            .http()
            .post(&url)
            .query(&[("key", self.api_key())])
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", mime.essence_str())
            .body(bytes)
            .send()
            .await
            .map_err(|e| CompletionError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Upload(format!(
                "File API error ({}): {}",
                status, text
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Upload(format!("Failed to parse response: {}", e)))?;

        parse_file(&data["file"])
            .ok_or_else(|| CompletionError::Upload("File API returned no file handle".to_string()))
    }

    /// Fetch the current state of an uploaded file
    pub async fn get_file(&self, name: &str) -> Result<UploadedFile, CompletionError> {
        let url = format!("{}/v1beta/{}", API_BASE, name);
        let response = self
            .http()
            .get(&url)
            .query(&[("key", self.api_key())])
            .send()
            .await
            .map_err(|e| CompletionError::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Upload(format!(
                "File API error ({}): {}",
                status, text
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Upload(format!("Failed to parse response: {}", e)))?;

        parse_file(&data)
            .ok_or_else(|| CompletionError::Upload("File API returned no file handle".to_string()))
    }

    /// Block until the remote file is done processing
    pub async fn wait_until_active(
        &self,
        mut file: UploadedFile,
    ) -> Result<UploadedFile, CompletionError> {
        while file.is_processing() {
            tokio::time::sleep(POLL_INTERVAL).await;
            file = self.get_file(&file.name).await?;
        }
        Ok(file)
    }
}

fn parse_file(data: &Value) -> Option<UploadedFile> {
    let name = data["name"].as_str()?;
    let uri = data["uri"].as_str()?;
    Some(UploadedFile {
        name: name.to_string(),
        uri: uri.to_string(),
        mime_type: data["mimeType"].as_str().unwrap_or("application/octet-stream").to_string(),
        state: data["state"].as_str().unwrap_or("ACTIVE").to_string(),
    })
}
