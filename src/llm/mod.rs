//! Gemini text-completion client
//!
//! Thin REST client over the `generativelanguage.googleapis.com`
//! `generateContent` endpoint. The `TextCompletion` trait is the seam the
//! orchestrators (retry, debate, market research) are generic over, so
//! tests can substitute scripted backends.

mod files;
mod retry;

pub use files::UploadedFile;
pub use retry::{generate_with_retry, is_rate_limited, with_retry, RetryPolicy};

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Per-request transport timeout for completion calls
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

const API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(String),

    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Completion response contained no text")]
    EmptyResponse,

    #[error("API quota exceeded after {attempts} attempts. Please wait a few minutes and try again.")]
    QuotaExceeded { attempts: u32 },

    #[error("File upload failed: {0}")]
    Upload(String),
}

/// Black-box text-completion capability
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// REST client for the Gemini API
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            api_key,
            model,
            http,
        }
    }

    /// Issue a generateContent call with the given parts
    async fn generate(&self, parts: Vec<Value>) -> Result<String, CompletionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            API_BASE, self.model
        );

        let body = json!({
            "contents": [{ "parts": parts }]
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(format!("Failed to parse response: {}", e)))?;

        extract_text(&data).ok_or(CompletionError::EmptyResponse)
    }

    /// Completion with uploaded files embedded before the text part
    pub async fn complete_with_files(
        &self,
        prompt: &str,
        files: &[UploadedFile],
    ) -> Result<String, CompletionError> {
        let mut parts: Vec<Value> = files
            .iter()
            .map(|f| {
                json!({
                    "file_data": {
                        "mime_type": f.mime_type,
                        "file_uri": f.uri,
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));
        self.generate(parts).await
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl TextCompletion for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.generate(vec![json!({ "text": prompt })]).await
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(data: &Value) -> Option<String> {
    let parts = data["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text() {
        let data = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Hello " },
                        { "text": "world" }
                    ]
                }
            }]
        });
        assert_eq!(extract_text(&data), Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let data = json!({ "candidates": [] });
        assert_eq!(extract_text(&data), None);
    }

    #[test]
    fn test_extract_text_no_text_parts() {
        let data = json!({
            "candidates": [{
                "content": { "parts": [{ "inline_data": {} }] }
            }]
        });
        assert_eq!(extract_text(&data), None);
    }
}
