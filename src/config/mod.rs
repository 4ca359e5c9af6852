//! Application configuration
//!
//! Configuration is an explicitly constructed value: `main` builds one
//! `AppConfig` from an optional TOML file merged with environment
//! variables, then hands it to each component at construction. Components
//! never read the environment themselves.
//!
//! Priority order: environment -> config file -> defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub bind: String,
    /// Restrict CORS to these origins; empty means permissive
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            bind: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Gemini completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

/// Google Custom Search settings (keyed primary search source)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
}

/// Firestore document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
}

/// Google Sheets settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    pub access_token: String,
}

/// Upload handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("temp_uploads"),
            max_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Complete application configuration
///
/// Optional sections disable their feature when absent: no `search` means
/// the keyed search tier is skipped, no `firestore`/`sheets` disables
/// persistence to that sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// Partial file-level configuration; every field optional so a config file
/// can override only what it needs
#[derive(Debug, Clone, Deserialize, Default)]
struct PartialConfig {
    #[serde(default)]
    server: Option<ServerConfig>,
    #[serde(default)]
    gemini: Option<GeminiConfig>,
    #[serde(default)]
    search: Option<SearchConfig>,
    #[serde(default)]
    firestore: Option<FirestoreConfig>,
    #[serde(default)]
    sheets: Option<SheetsConfig>,
    #[serde(default)]
    uploads: Option<UploadConfig>,
}

impl AppConfig {
    /// Load configuration from an optional TOML file plus environment
    /// overrides. A missing Gemini API key is a startup error; missing
    /// search/store/sheets credentials only disable those features.
    pub fn load(config_path: Option<&Path>) -> Result<Self, String> {
        let file = match config_path {
            Some(path) => Self::read_file(path)?,
            None => Self::default_config_path()
                .filter(|p| p.exists())
                .map(|p| Self::read_file(&p))
                .transpose()?
                .unwrap_or_default(),
        };

        let gemini_key = env_or("GEMINI_API_KEY", file.gemini.as_ref().map(|g| g.api_key.clone()))
            .ok_or_else(|| "GEMINI_API_KEY not set and not present in config file".to_string())?;
        let gemini_model = env_or("GEMINI_MODEL", file.gemini.as_ref().map(|g| g.model.clone()))
            .unwrap_or_else(|| "gemini-3-pro-preview".to_string());

        let search = match (
            env_or(
                "GOOGLE_CUSTOM_SEARCH_API_KEY",
                file.search.as_ref().map(|s| s.api_key.clone()),
            ),
            env_or(
                "GOOGLE_CUSTOM_SEARCH_ENGINE_ID",
                file.search.as_ref().map(|s| s.engine_id.clone()),
            ),
        ) {
            (Some(api_key), Some(engine_id)) => Some(SearchConfig { api_key, engine_id }),
            _ => None,
        };

        let firestore = match (
            env_or(
                "FIRESTORE_PROJECT_ID",
                file.firestore.as_ref().map(|f| f.project_id.clone()),
            ),
            env_or(
                "FIRESTORE_API_KEY",
                file.firestore.as_ref().map(|f| f.api_key.clone()),
            ),
        ) {
            (Some(project_id), Some(api_key)) => Some(FirestoreConfig {
                project_id,
                api_key,
            }),
            _ => None,
        };

        let sheets = env_or(
            "SHEETS_ACCESS_TOKEN",
            file.sheets.as_ref().map(|s| s.access_token.clone()),
        )
        .map(|access_token| SheetsConfig { access_token });

        Ok(Self {
            server: file.server.unwrap_or_default(),
            gemini: GeminiConfig {
                api_key: gemini_key,
                model: gemini_model,
            },
            search,
            firestore,
            sheets,
            uploads: file.uploads.unwrap_or_default(),
        })
    }

    fn read_file(path: &Path) -> Result<PartialConfig, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Default config location: ~/.config/genesis/genesis.toml
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("genesis").join("genesis.toml"))
    }
}

fn env_or(key: &str, fallback: Option<String>) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .or(fallback)
}
