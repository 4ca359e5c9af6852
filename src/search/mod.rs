//! Search adapter over the external market-data sources
//!
//! Every source is normalized to the same title/snippet/link shape behind
//! the `SearchBackend` capability trait. The contract is deliberately
//! lossy: a transport, auth, or quota failure on any source yields an
//! empty result set and a warning, never an error, so one broken source
//! cannot take down a workflow.

mod rss;

pub use rss::parse_feed_items;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::SearchConfig;

/// Per-call transport timeout; exceeding it counts as an empty result
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "GenesisAI/1.0";

/// Which external source a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PrimarySearch,
    NewsFeed,
    HackerNews,
    Reddit,
}

impl SourceKind {
    /// Human-readable label used in formatted context blocks
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::PrimarySearch => "Google Search",
            SourceKind::NewsFeed => "Google News",
            SourceKind::HackerNews => "Hacker News",
            SourceKind::Reddit => "Reddit",
        }
    }
}

/// One normalized search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    pub source: SourceKind,
}

/// Capability interface for market-data sources
///
/// Implementations never error; failures are logged and produce an empty
/// vec.
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, max_results: usize, kind: SourceKind)
        -> Vec<SearchResult>;

    /// Whether the keyed primary source is configured at all
    fn has_primary(&self) -> bool;
}

/// HTTP-backed implementation covering all four source kinds
pub struct HttpSearchBackend {
    primary: Option<SearchConfig>,
    http: reqwest::Client,
}

impl HttpSearchBackend {
    pub fn new(primary: Option<SearchConfig>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { primary, http }
    }

    /// Google Custom Search JSON API
    async fn search_primary(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let Some(config) = &self.primary else {
            return Vec::new();
        };

        let url = "https://www.googleapis.com/customsearch/v1";
        let num = max_results.to_string();
        let response = self
            .http
            .get(url)
            .query(&[
                ("q", query),
                ("key", config.api_key.as_str()),
                ("cx", config.engine_id.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await;

        let data: Value = match response {
            Ok(r) if r.status().is_success() => match r.json().await {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Primary search returned unparseable JSON: {}", e);
                    return Vec::new();
                }
            },
            Ok(r) => {
                // 403 here usually means the daily quota is gone
                log::warn!("Primary search API error ({}), treating as empty", r.status());
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Primary search unavailable: {}", e);
                return Vec::new();
            }
        };

        let Some(items) = data["items"].as_array() else {
            return Vec::new();
        };

        items
            .iter()
            .take(max_results)
            .map(|item| SearchResult {
                title: item["title"].as_str().unwrap_or("").to_string(),
                snippet: item["snippet"].as_str().unwrap_or("").to_string(),
                link: item["link"].as_str().unwrap_or("").to_string(),
                source: SourceKind::PrimarySearch,
            })
            .collect()
    }

    /// Google News RSS search feed
    async fn search_news(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let url = "https://news.google.com/rss/search";
        match self.fetch_text(url, &[("q", query)]).await {
            Some(xml) => parse_feed_items(&xml, max_results, SourceKind::NewsFeed),
            None => Vec::new(),
        }
    }

    /// Hacker News via the Algolia search API (no auth needed)
    async fn search_hn(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let url = "https://hn.algolia.com/api/v1/search";
        let hits_per_page = max_results.to_string();
        let response = self
            .http
            .get(url)
            .query(&[("query", query), ("hitsPerPage", hits_per_page.as_str())])
            .send()
            .await;

        let data: Value = match response {
            Ok(r) if r.status().is_success() => match r.json().await {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Hacker News search returned unparseable JSON: {}", e);
                    return Vec::new();
                }
            },
            Ok(r) => {
                log::warn!("Hacker News search error ({}), treating as empty", r.status());
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Hacker News search unavailable: {}", e);
                return Vec::new();
            }
        };

        let Some(hits) = data["hits"].as_array() else {
            return Vec::new();
        };

        hits.iter()
            .take(max_results)
            .map(|hit| {
                let title = hit["title"]
                    .as_str()
                    .or_else(|| hit["story_title"].as_str())
                    .unwrap_or("");
                let link = hit["url"].as_str().map(|s| s.to_string()).unwrap_or_else(|| {
                    format!(
                        "https://news.ycombinator.com/item?id={}",
                        hit["objectID"].as_str().unwrap_or("")
                    )
                });
                let snippet = hit["story_text"]
                    .as_str()
                    .or_else(|| hit["comment_text"].as_str())
                    .unwrap_or("");
                SearchResult {
                    title: title.to_string(),
                    snippet: snippet.to_string(),
                    link,
                    source: SourceKind::HackerNews,
                }
            })
            .collect()
    }

    /// Reddit search via its public Atom feed
    async fn search_reddit(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        let url = "https://www.reddit.com/search.rss";
        let limit = max_results.to_string();
        match self
            .fetch_text(url, &[("q", query), ("limit", limit.as_str())])
            .await
        {
            Some(xml) => parse_feed_items(&xml, max_results, SourceKind::Reddit),
            None => Vec::new(),
        }
    }

    async fn fetch_text(&self, url: &str, params: &[(&str, &str)]) -> Option<String> {
        match self.http.get(url).query(params).send().await {
            Ok(r) if r.status().is_success() => match r.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    log::warn!("Feed fetch from {} failed mid-body: {}", url, e);
                    None
                }
            },
            Ok(r) => {
                log::warn!("Feed fetch from {} returned {}", url, r.status());
                None
            }
            Err(e) => {
                log::warn!("Feed fetch from {} unavailable: {}", url, e);
                None
            }
        }
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        kind: SourceKind,
    ) -> Vec<SearchResult> {
        let results = match kind {
            SourceKind::PrimarySearch => self.search_primary(query, max_results).await,
            SourceKind::NewsFeed => self.search_news(query, max_results).await,
            SourceKind::HackerNews => self.search_hn(query, max_results).await,
            SourceKind::Reddit => self.search_reddit(query, max_results).await,
        };
        log::debug!("{}: {} results for '{}'", kind.label(), results.len(), query);
        results
    }

    fn has_primary(&self) -> bool {
        self.primary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(SourceKind::PrimarySearch.label(), "Google Search");
        assert_eq!(SourceKind::NewsFeed.label(), "Google News");
        assert_eq!(SourceKind::HackerNews.label(), "Hacker News");
        assert_eq!(SourceKind::Reddit.label(), "Reddit");
    }

    #[test]
    fn test_has_primary_reflects_config() {
        let without = HttpSearchBackend::new(None);
        assert!(!without.has_primary());

        let with = HttpSearchBackend::new(Some(SearchConfig {
            api_key: "k".to_string(),
            engine_id: "cx".to_string(),
        }));
        assert!(with.has_primary());
    }

    #[tokio::test]
    async fn test_primary_search_without_config_is_empty() {
        let backend = HttpSearchBackend::new(None);
        let results = backend
            .search("anything", 3, SourceKind::PrimarySearch)
            .await;
        assert!(results.is_empty());
    }
}
