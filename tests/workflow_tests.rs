// Integration tests for the generation workflows
// These exercise the library pipelines end to end with scripted backends,
// without touching any external API.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use genesis_server_lib::debate;
use genesis_server_lib::financials;
use genesis_server_lib::llm::{CompletionError, RetryPolicy, TextCompletion};
use genesis_server_lib::prompts::PromptEngine;
use genesis_server_lib::research::MarketResearcher;
use genesis_server_lib::search::{SearchBackend, SearchResult, SourceKind};

/// Completion backend that replies from a fixed script, in order
struct ScriptedCompletion {
    calls: AtomicU32,
    responses: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn new(responses: Vec<&str>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
        }
    }
}

impl TextCompletion for ScriptedCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        self.responses
            .lock()
            .unwrap()
            .get(idx)
            .cloned()
            .ok_or(CompletionError::EmptyResponse)
    }
}

struct FixedSearch {
    results: Vec<SearchResult>,
}

impl SearchBackend for FixedSearch {
    async fn search(&self, _query: &str, max: usize, _kind: SourceKind) -> Vec<SearchResult> {
        self.results.iter().take(max).cloned().collect()
    }

    fn has_primary(&self) -> bool {
        !self.results.is_empty()
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        wait: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_research_then_debate_pipeline() {
    let prompts = PromptEngine::new().unwrap();
    let search = FixedSearch {
        results: vec![SearchResult {
            title: "Competitor Alpha raises $10M".to_string(),
            snippet: "Alpha dominates the vertical".to_string(),
            link: "https://example.com/alpha".to_string(),
            source: SourceKind::PrimarySearch,
        }],
    };
    let llm = ScriptedCompletion::new(vec![
        "Critique: the market is crowded.",
        "Defense: crowded markets prove demand.",
        "Verdict: proceed with a narrow wedge.",
    ]);

    let researcher = MarketResearcher::new(&search, &llm, &prompts);
    let market_context = researcher.context("ai fitness coach", 5).await;
    assert!(market_context.contains("Competitor Alpha"));

    let artifact = debate::run_debate(&llm, &fast_policy(), &prompts, "ai fitness coach", &market_context)
        .await
        .unwrap();

    assert_eq!(artifact.critique, "Critique: the market is crowded.");
    assert_eq!(artifact.defense, "Defense: crowded markets prove demand.");
    assert_eq!(artifact.verdict, "Verdict: proceed with a narrow wedge.");
    assert!(artifact.composite.contains("### The Realist's Critique"));
    assert!(artifact.composite.contains("### The Visionary's Defense"));
    assert!(artifact.composite.contains("### Final Analyst Summary"));
}

#[tokio::test]
async fn test_financial_workflow_from_model_output() {
    let prompts = PromptEngine::new().unwrap();
    let llm = ScriptedCompletion::new(vec![
        r#"{
            "pricing_per_customer_per_year": 240,
            "target_customers_year_1": 500,
            "annual_growth_rate": 0.4,
            "churn_rate": 0.1,
            "confidence_level": "medium"
        }"#,
    ]);

    let assumptions = financials::extract_assumptions(&llm, &prompts, "saas idea", "evidence")
        .await
        .unwrap();
    assert_eq!(assumptions.target_customers_year_1, 500);

    let projection = financials::project(&assumptions);
    // 500 * 1.4 * 0.9 = 630, then 630 * 1.26 = 793 (floored)
    assert_eq!(projection.year2.customers, 630);
    assert_eq!(projection.year3.customers, 793);
    assert_eq!(projection.year1.revenue, 120_000.0);

    let grid = financials::revenue_grid(&projection);
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[0][0], "Metric");
    assert_eq!(grid[1][1], 500);
}

#[tokio::test]
async fn test_financial_workflow_rejects_malformed_output() {
    let prompts = PromptEngine::new().unwrap();
    let llm = ScriptedCompletion::new(vec!["Here are your assumptions: {\"pricing\": 10}"]);

    let result = financials::extract_assumptions(&llm, &prompts, "saas idea", "evidence").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_research_falls_back_to_model_knowledge() {
    let prompts = PromptEngine::new().unwrap();
    let search = FixedSearch { results: Vec::new() };
    let llm = ScriptedCompletion::new(vec![
        "The market has three incumbents and steady double-digit growth.",
    ]);

    let researcher = MarketResearcher::new(&search, &llm, &prompts);
    let context = researcher.context("niche topic", 5).await;
    assert!(context.contains("three incumbents"));
}
