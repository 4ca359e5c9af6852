//! Uploaded-file handling for the multipart generate endpoint
//!
//! Files are size-capped, extension-checked, and written under the temp
//! uploads dir with a sanitized, uuid-prefixed name before being pushed
//! to the completion service's file API.

use std::path::{Path, PathBuf};

use crate::config::UploadConfig;
use crate::error::ApiError;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "pdf", "txt", "doc", "docx", "mp4", "webm", "avi", "mov", "mkv",
    "flv",
];

/// Keep only filesystem-safe characters; never allow path traversal
pub fn sanitize_filename(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Whether the filename carries an accepted extension
pub fn is_allowed(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Persist an uploaded file under the configured temp dir
pub async fn save_upload(
    config: &UploadConfig,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, ApiError> {
    if bytes.len() > config.max_bytes {
        return Err(ApiError::Internal(format!(
            "Uploaded file '{}' exceeds the {} byte limit",
            filename, config.max_bytes
        )));
    }

    let safe = sanitize_filename(filename);
    if safe.is_empty() || !is_allowed(&safe) {
        return Err(ApiError::Internal(format!(
            "Uploaded file '{}' has an unsupported type",
            filename
        )));
    }

    tokio::fs::create_dir_all(&config.dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {}", e)))?;

    let path = config.dir.join(format!("{}-{}", uuid::Uuid::new_v4(), safe));
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save upload: {}", e)))?;

    Ok(path)
}

/// Best-effort removal of a processed temp file
pub async fn cleanup(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::warn!("Failed to remove temp upload {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/evil.sh"), "evil.sh");
        assert_eq!(sanitize_filename("report final.pdf"), "report_final.pdf");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_extension_allowlist() {
        assert!(is_allowed("demo.mp4"));
        assert!(is_allowed("PITCH.PDF"));
        assert!(!is_allowed("payload.exe"));
        assert!(!is_allowed("noextension"));
    }

    #[tokio::test]
    async fn test_save_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            dir: dir.path().to_path_buf(),
            max_bytes: 1024,
        };

        let path = save_upload(&config, "notes.txt", b"hello").await.unwrap();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("notes.txt"));

        cleanup(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            dir: dir.path().to_path_buf(),
            max_bytes: 4,
        };
        let result = save_upload(&config, "notes.txt", b"too large").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_save_rejects_bad_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = UploadConfig {
            dir: dir.path().to_path_buf(),
            max_bytes: 1024,
        };
        let result = save_upload(&config, "tool.exe", b"bytes").await;
        assert!(result.is_err());
    }
}
