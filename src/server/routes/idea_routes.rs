//! Idea generation endpoints: /generate, /regenerate, /generate-prototype

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tera::Context;

use super::require_field;
use crate::error::ApiError;
use crate::llm::{generate_with_retry, with_retry, UploadedFile};
use crate::prompts;
use crate::research::DEFAULT_CONTEXT_BLOCKS;
use crate::server::state::AppState;
use crate::server::uploads;
use crate::store;

/// POST /generate — multipart form with a topic and optional files
pub async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut topic: Option<String> = None;
    let mut saved: Vec<PathBuf> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("topic") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Internal(format!("Invalid topic field: {}", e)))?;
                topic = Some(text);
            }
            Some("files") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                if filename.is_empty() {
                    continue;
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Internal(format!("Failed to read upload: {}", e)))?;
                let path = uploads::save_upload(&state.config.uploads, &filename, &bytes).await?;
                saved.push(path);
            }
            _ => {}
        }
    }

    let result = generate_idea(&state, topic.as_deref(), &saved).await;

    // Temp files are removed on success and on every error path
    for path in &saved {
        uploads::cleanup(path).await;
    }

    result
}

async fn generate_idea(
    state: &AppState,
    topic: Option<&str>,
    saved: &[PathBuf],
) -> Result<Json<Value>, ApiError> {
    // Field validation happens before any search or generation call
    let topic = require_field(topic, "topic")?;

    let market_context = state
        .researcher()
        .context(topic, DEFAULT_CONTEXT_BLOCKS)
        .await;

    // Push uploads through the file API and wait for remote processing
    let mut files: Vec<UploadedFile> = Vec::with_capacity(saved.len());
    for path in saved {
        let uploaded = state.llm.upload_file(path).await.map_err(ApiError::Completion)?;
        let active = state
            .llm
            .wait_until_active(uploaded)
            .await
            .map_err(ApiError::Completion)?;
        files.push(active);
    }

    let mut context = Context::new();
    context.insert("topic", topic);
    context.insert("context", &market_context);
    let prompt = state.prompts.render(prompts::IDEA_GENERATION, &context)?;

    let idea = if files.is_empty() {
        generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?
    } else {
        with_retry(&state.retry, || {
            state.llm.complete_with_files(&prompt, &files)
        })
        .await?
    };

    let mut fields = Map::new();
    fields.insert("type".to_string(), json!("generated"));
    fields.insert("topic".to_string(), json!(topic));
    fields.insert("idea".to_string(), json!(idea));
    fields.insert("market_context".to_string(), json!(market_context));
    fields.insert("has_files".to_string(), json!(!files.is_empty()));
    store::persist(state.store_ref(), "ideas", fields).await;

    Ok(Json(json!({ "status": "success", "idea": idea })))
}

#[derive(Debug, Deserialize)]
pub struct RegenerateRequest {
    pub topic: Option<String>,
}

/// POST /regenerate — fresh disruptive idea, no market context by design
pub async fn regenerate(
    State(state): State<AppState>,
    Json(body): Json<RegenerateRequest>,
) -> Result<Json<Value>, ApiError> {
    let topic = require_field(body.topic.as_deref(), "topic")?;

    let mut context = Context::new();
    context.insert("topic", topic);
    let prompt = state.prompts.render(prompts::IDEA_REGENERATION, &context)?;
    let idea = generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?;

    Ok(Json(json!({ "status": "success", "idea": idea })))
}

#[derive(Debug, Deserialize)]
pub struct PrototypeRequest {
    pub idea: Option<String>,
}

/// POST /generate-prototype — single-screen Flutter mockup for an idea
pub async fn generate_prototype(
    State(state): State<AppState>,
    Json(body): Json<PrototypeRequest>,
) -> Result<Json<Value>, ApiError> {
    let idea = require_field(body.idea.as_deref(), "idea")?;

    let mut context = Context::new();
    context.insert("idea", idea);
    let prompt = state.prompts.render(prompts::PROTOTYPE_UI, &context)?;
    let flutter_code = generate_with_retry(state.llm.as_ref(), &state.retry, &prompt).await?;

    let mut fields = Map::new();
    fields.insert("idea".to_string(), json!(idea));
    fields.insert("flutter_code".to_string(), json!(flutter_code));
    store::persist(state.store_ref(), "prototypes", fields).await;

    Ok(Json(json!({ "status": "success", "flutter_code": flutter_code })))
}
