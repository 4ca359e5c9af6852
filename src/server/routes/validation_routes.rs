//! Validation endpoints: /validate, /deepvalidate, /unicorn_predict

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::require_field;
use crate::debate;
use crate::error::ApiError;
use crate::llm::generate_with_retry;
use crate::prompts;
use crate::research::DEFAULT_CONTEXT_BLOCKS;
use crate::server::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    pub idea: Option<String>,
}

/// POST /validate — single-pass market validation against real data
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<IdeaRequest>,
) -> Result<Json<Value>, ApiError> {
    let idea = require_field(body.idea.as_deref(), "idea")?;

    let market_context = state
        .researcher()
        .context(idea, DEFAULT_CONTEXT_BLOCKS)
        .await;

    let prompt = state
        .prompts
        .render_idea(prompts::IDEA_VALIDATION, idea, &market_context)?;
    let validation = generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?;

    let mut fields = Map::new();
    fields.insert("idea".to_string(), json!(idea));
    fields.insert("validation".to_string(), json!(validation));
    fields.insert("market_context".to_string(), json!(market_context));
    store::persist(state.store_ref(), "validations", fields).await;

    Ok(Json(json!({ "status": "success", "validation": validation })))
}

/// POST /deepvalidate — three-stage boardroom debate
pub async fn deepvalidate(
    State(state): State<AppState>,
    Json(body): Json<IdeaRequest>,
) -> Result<Json<Value>, ApiError> {
    let idea = require_field(body.idea.as_deref(), "idea")?;

    log::info!("Deep validation: fetching market context");
    let market_context = state
        .researcher()
        .context(idea, DEFAULT_CONTEXT_BLOCKS)
        .await;

    let artifact = debate::run_debate(
        state.llm.as_ref(),
        &state.retry,
        state.prompts.as_ref(),
        idea,
        &market_context,
    )
    .await?;

    let mut fields = Map::new();
    fields.insert("idea".to_string(), json!(idea));
    fields.insert("realist_critique".to_string(), json!(artifact.critique));
    fields.insert("visionary_defense".to_string(), json!(artifact.defense));
    fields.insert("analyst_verdict".to_string(), json!(artifact.verdict));
    fields.insert("full_analysis".to_string(), json!(artifact.composite));
    fields.insert("market_context".to_string(), json!(market_context));
    store::persist(state.store_ref(), "deep_analyses", fields).await;

    Ok(Json(json!({ "status": "success", "analysis": artifact.composite })))
}

/// POST /unicorn_predict — billion-dollar trajectory assessment
pub async fn unicorn_predict(
    State(state): State<AppState>,
    Json(body): Json<IdeaRequest>,
) -> Result<Json<Value>, ApiError> {
    let idea = require_field(body.idea.as_deref(), "idea")?;

    let market_context = state
        .researcher()
        .context(idea, DEFAULT_CONTEXT_BLOCKS)
        .await;

    let prompt = state
        .prompts
        .render_idea(prompts::UNICORN_PREDICTION, idea, &market_context)?;
    let prediction = generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?;

    let mut fields = Map::new();
    fields.insert("idea".to_string(), json!(idea));
    fields.insert("prediction".to_string(), json!(prediction));
    fields.insert("market_context".to_string(), json!(market_context));
    store::persist(state.store_ref(), "predictions", fields).await;

    Ok(Json(json!({ "status": "success", "prediction": prediction })))
}
