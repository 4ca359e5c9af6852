//! Server application state shared across handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::{GeminiClient, RetryPolicy};
use crate::prompts::PromptEngine;
use crate::research::MarketResearcher;
use crate::search::HttpSearchBackend;
use crate::sheets::SpreadsheetSink;
use crate::store::DocumentStore;

/// Shared state for the server: configuration plus every external-service
/// client. Each client is a self-contained `Arc`'d value safe to use from
/// concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub llm: Arc<GeminiClient>,
    pub retry: RetryPolicy,
    pub search: Arc<HttpSearchBackend>,
    pub prompts: Arc<PromptEngine>,
    pub store: Option<Arc<DocumentStore>>,
    pub sheets: Option<Arc<SpreadsheetSink>>,
}

impl AppState {
    /// Build all clients from configuration; optional sections become
    /// disabled features with a logged notice.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let llm = Arc::new(GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
        ));

        if config.search.is_none() {
            log::warn!(
                "Google Custom Search credentials not configured; \
                 keyed search tier disabled, using public feeds and AI research"
            );
        }
        let search = Arc::new(HttpSearchBackend::new(config.search.clone()));

        let store = match config.firestore.clone() {
            Some(fs) => {
                log::info!("Firestore persistence enabled for project {}", fs.project_id);
                Some(Arc::new(DocumentStore::new(fs)))
            }
            None => {
                log::warn!("Firestore credentials not configured; persistence disabled");
                None
            }
        };

        let sheets = match config.sheets.clone() {
            Some(sc) => Some(Arc::new(SpreadsheetSink::new(sc))),
            None => {
                log::warn!("Sheets access token not configured; spreadsheet export disabled");
                None
            }
        };

        let prompts = Arc::new(PromptEngine::new()?);

        Ok(Self {
            config: Arc::new(config),
            llm,
            retry: RetryPolicy::default(),
            search,
            prompts,
            store,
            sheets,
        })
    }

    /// Market-context aggregator borrowing this state's clients
    pub fn researcher(&self) -> MarketResearcher<'_, HttpSearchBackend, GeminiClient> {
        MarketResearcher::new(self.search.as_ref(), self.llm.as_ref(), self.prompts.as_ref())
    }

    pub fn store_ref(&self) -> Option<&DocumentStore> {
        self.store.as_deref()
    }
}
