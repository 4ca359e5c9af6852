//! Research endpoints: /rag/query, /ingest

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tera::Context;

use super::require_field;
use crate::error::ApiError;
use crate::llm::generate_with_retry;
use crate::prompts;
use crate::server::state::AppState;

/// Context blocks fetched for a RAG answer
const RAG_CONTEXT_BLOCKS: usize = 4;

#[derive(Debug, Deserialize)]
pub struct RagQueryRequest {
    pub question: Option<String>,
}

/// POST /rag/query — answer a question from live market search context
pub async fn rag_query(
    State(state): State<AppState>,
    Json(body): Json<RagQueryRequest>,
) -> Result<Json<Value>, ApiError> {
    let question = require_field(body.question.as_deref(), "question")?;

    let sources = state
        .researcher()
        .blocks(question, RAG_CONTEXT_BLOCKS)
        .await;
    let context_text = sources.join("\n\n");

    let mut context = Context::new();
    context.insert("question", question);
    context.insert("context", &context_text);
    let prompt = state.prompts.render(prompts::RAG_ANSWER, &context)?;
    let answer = generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?;

    Ok(Json(json!({
        "status": "success",
        "answer": answer,
        "sources": sources,
    })))
}

/// POST /ingest — informational only; live search replaced local ingestion
pub async fn ingest() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "Google Search API is active. Real-time market data is fetched on each validation.",
        "method": "Google Custom Search API",
    }))
}
