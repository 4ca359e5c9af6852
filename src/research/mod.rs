//! Tiered market-context aggregation
//!
//! Three source tiers tried in strict precedence order: the keyed primary
//! search API, the public feeds (news, Hacker News, Reddit), and finally
//! the completion service's own knowledge. Exactly one tier's output is
//! used per call; tiers are never merged. Every path returns a non-empty
//! string, with per-tier sentinel text when a tier is reached but yields
//! nothing.

use chrono::Datelike;

use crate::llm::TextCompletion;
use crate::prompts::{self, PromptEngine};
use crate::search::{SearchBackend, SearchResult, SourceKind};

/// Results requested per reformulated query and per fallback source
const RESULTS_PER_QUERY: usize = 3;

/// Minimum chunk size when splitting AI-fallback prose
const MIN_CHUNK_CHARS: usize = 400;

/// Default number of context blocks per call
pub const DEFAULT_CONTEXT_BLOCKS: usize = 5;

/// Fixed query reformulations issued against the primary source
fn reformulations(topic: &str) -> [String; 5] {
    let year = chrono::Utc::now().year();
    [
        format!("{} startup competitors", topic),
        format!("{} market size industry", topic),
        format!("{} venture funding", topic),
        format!("companies in {} space", topic),
        format!("{} market trends {}", topic, year),
    ]
}

/// Market-context aggregator over a search backend and a completion service
pub struct MarketResearcher<'a, S, C> {
    search: &'a S,
    llm: &'a C,
    prompts: &'a PromptEngine,
}

impl<'a, S: SearchBackend, C: TextCompletion> MarketResearcher<'a, S, C> {
    pub fn new(search: &'a S, llm: &'a C, prompts: &'a PromptEngine) -> Self {
        Self {
            search,
            llm,
            prompts,
        }
    }

    /// Build a single market-context text blob for a topic
    pub async fn context(&self, topic: &str, k: usize) -> String {
        self.blocks(topic, k).await.join("\n\n")
    }

    /// Individual formatted context blocks (the RAG query path)
    pub async fn blocks(&self, topic: &str, k: usize) -> Vec<String> {
        // Tier 1: keyed primary search across the fixed reformulations
        if self.search.has_primary() {
            let mut all_results: Vec<SearchResult> = Vec::new();
            for query in reformulations(topic) {
                let hits = self
                    .search
                    .search(&query, RESULTS_PER_QUERY, SourceKind::PrimarySearch)
                    .await;
                all_results.extend(hits);
            }

            if !all_results.is_empty() {
                let formatted = format_results(&all_results, k);
                return if formatted.is_empty() {
                    vec!["No specific market data found from search.".to_string()]
                } else {
                    formatted
                };
            }

            // Tier 2: alternative public sources
            log::info!(
                "Primary search returned nothing for '{}'; trying public feeds",
                topic
            );
            let mut alt_results: Vec<SearchResult> = Vec::new();
            for kind in [SourceKind::NewsFeed, SourceKind::HackerNews, SourceKind::Reddit] {
                let hits = self.search.search(topic, RESULTS_PER_QUERY, kind).await;
                alt_results.extend(hits);
            }

            if !alt_results.is_empty() {
                let formatted = format_results(&alt_results, k);
                return if formatted.is_empty() {
                    vec!["Market data unavailable from public sources.".to_string()]
                } else {
                    formatted
                };
            }
        }

        // Tier 3: the completion service's own market knowledge
        self.knowledge_fallback(topic, k).await
    }

    async fn knowledge_fallback(&self, topic: &str, k: usize) -> Vec<String> {
        let prompt = match self.prompts.render_query(prompts::MARKET_RESEARCH_FALLBACK, topic) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Failed to render fallback research prompt: {}", e);
                return vec!["No market data available.".to_string()];
            }
        };

        match self.llm.complete(&prompt).await {
            Ok(text) => {
                let chunks = chunk_prose(&text, k);
                if chunks.is_empty() {
                    vec!["No market data available.".to_string()]
                } else {
                    chunks
                }
            }
            Err(e) => {
                log::warn!("Fallback market research failed: {}", e);
                vec![format!("Unable to fetch market data: {}", e)]
            }
        }
    }
}

/// Format the first `k` hits as Title/Snippet/Source blocks
pub fn format_results(results: &[SearchResult], k: usize) -> Vec<String> {
    results
        .iter()
        .take(k)
        .map(|r| {
            format!(
                "Title: {}\nSnippet: {}\nSource: {}",
                r.title, r.snippet, r.link
            )
        })
        .collect()
}

/// Split prose into chunks by accumulating non-blank lines until a chunk
/// exceeds the minimum size; the remainder becomes a final chunk
pub fn chunk_prose(text: &str, k: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        current.push_str(line);
        current.push_str("\n");
        if current.len() > MIN_CHUNK_CHARS {
            chunks.push(current.trim().to_string());
            current = String::new();
        }
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks.truncate(k);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;
    use std::sync::Mutex;

    struct MockSearch {
        primary: Vec<SearchResult>,
        feeds: Vec<SearchResult>,
        has_primary: bool,
        queries: Mutex<Vec<(String, SourceKind)>>,
    }

    impl MockSearch {
        fn new(primary: Vec<SearchResult>, feeds: Vec<SearchResult>, has_primary: bool) -> Self {
            Self {
                primary,
                feeds,
                has_primary,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl SearchBackend for MockSearch {
        async fn search(
            &self,
            query: &str,
            _max_results: usize,
            kind: SourceKind,
        ) -> Vec<SearchResult> {
            self.queries
                .lock()
                .unwrap()
                .push((query.to_string(), kind));
            match kind {
                SourceKind::PrimarySearch => self.primary.clone(),
                _ => self.feeds.clone(),
            }
        }

        fn has_primary(&self) -> bool {
            self.has_primary
        }
    }

    struct FixedCompletion(Result<String, ()>);

    impl TextCompletion for FixedCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(CompletionError::Transport("connection refused".to_string())),
            }
        }
    }

    fn hit(title: &str, source: SourceKind) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            snippet: format!("snippet for {}", title),
            link: format!("https://example.com/{}", title),
            source,
        }
    }

    fn engine() -> PromptEngine {
        PromptEngine::new().unwrap()
    }

    #[tokio::test]
    async fn test_primary_tier_used_exclusively() {
        let search = MockSearch::new(
            vec![hit("primary-hit", SourceKind::PrimarySearch)],
            vec![hit("feed-hit", SourceKind::NewsFeed)],
            true,
        );
        let llm = FixedCompletion(Ok("should not be called".to_string()));
        let prompts = engine();
        let researcher = MarketResearcher::new(&search, &llm, &prompts);

        let context = researcher.context("fitness", 5).await;
        assert!(context.contains("primary-hit"));
        assert!(!context.contains("feed-hit"));

        // All five reformulations went to the primary source, nothing else
        let queries = search.queries.lock().unwrap();
        assert_eq!(queries.len(), 5);
        assert!(queries.iter().all(|(_, k)| *k == SourceKind::PrimarySearch));
    }

    #[tokio::test]
    async fn test_feed_tier_when_primary_empty() {
        let search = MockSearch::new(
            Vec::new(),
            vec![hit("feed-hit", SourceKind::NewsFeed)],
            true,
        );
        let llm = FixedCompletion(Ok("should not be called".to_string()));
        let prompts = engine();
        let researcher = MarketResearcher::new(&search, &llm, &prompts);

        let context = researcher.context("fitness", 5).await;
        assert!(context.contains("feed-hit"));
        assert!(!context.contains("should not be called"));
    }

    #[tokio::test]
    async fn test_knowledge_tier_when_search_unconfigured() {
        let search = MockSearch::new(Vec::new(), Vec::new(), false);
        let llm = FixedCompletion(Ok("Acme Corp builds AI coaching tools.".to_string()));
        let prompts = engine();
        let researcher = MarketResearcher::new(&search, &llm, &prompts);

        let context = researcher.context("fitness", 5).await;
        assert!(context.contains("Acme Corp"));
        // The search backend was never consulted
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_context_non_empty_when_everything_fails() {
        let search = MockSearch::new(Vec::new(), Vec::new(), true);
        let llm = FixedCompletion(Err(()));
        let prompts = engine();
        let researcher = MarketResearcher::new(&search, &llm, &prompts);

        let context = researcher.context("fitness", 5).await;
        assert!(!context.is_empty());
        assert!(context.contains("Unable to fetch market data"));
    }

    #[tokio::test]
    async fn test_blocks_capped_at_k() {
        let hits: Vec<SearchResult> = (0..10)
            .map(|i| hit(&format!("hit-{}", i), SourceKind::PrimarySearch))
            .collect();
        let search = MockSearch::new(hits, Vec::new(), true);
        let llm = FixedCompletion(Ok(String::new()));
        let prompts = engine();
        let researcher = MarketResearcher::new(&search, &llm, &prompts);

        // Each of the 5 reformulations returns 10 hits; only k survive
        let blocks = researcher.blocks("fitness", 4).await;
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn test_format_results() {
        let results = vec![hit("alpha", SourceKind::PrimarySearch)];
        let formatted = format_results(&results, 5);
        assert_eq!(formatted.len(), 1);
        assert_eq!(
            formatted[0],
            "Title: alpha\nSnippet: snippet for alpha\nSource: https://example.com/alpha"
        );
    }

    #[test]
    fn test_chunk_prose_accumulates_past_minimum() {
        let line = "a".repeat(150);
        let text = format!("{}\n{}\n{}\n\n{}\n", line, line, line, line);
        let chunks = chunk_prose(&text, 10);
        // Three 150-char lines exceed 400, fourth becomes the remainder
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].len() > MIN_CHUNK_CHARS);
        assert_eq!(chunks[1].len(), 150);
    }

    #[test]
    fn test_chunk_prose_skips_blank_lines_and_caps() {
        let text = "short\n\n\nlines\n";
        let chunks = chunk_prose(text, 1);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "short\nlines");
    }

    #[test]
    fn test_chunk_prose_empty_input() {
        assert!(chunk_prose("", 5).is_empty());
        assert!(chunk_prose("\n\n", 5).is_empty());
    }

    #[test]
    fn test_reformulations_shape() {
        let queries = reformulations("urban farming");
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[0], "urban farming startup competitors");
        assert_eq!(queries[3], "companies in urban farming space");
        assert!(queries[4].starts_with("urban farming market trends 2"));
    }
}
