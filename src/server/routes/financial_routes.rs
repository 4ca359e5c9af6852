//! Financial modeling endpoint: /financials

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::require_field;
use crate::error::ApiError;
use crate::financials;
use crate::research::DEFAULT_CONTEXT_BLOCKS;
use crate::server::state::AppState;
use crate::store;

/// Target range for the 4x3 revenue grid
const REVENUE_RANGE: &str = "A1:D4";

#[derive(Debug, Deserialize)]
pub struct FinancialsRequest {
    pub idea: Option<String>,
    pub spreadsheet_id: Option<String>,
}

/// POST /financials — extract assumptions, project revenue, export to a
/// spreadsheet
pub async fn financials(
    State(state): State<AppState>,
    Json(body): Json<FinancialsRequest>,
) -> Result<Json<Value>, ApiError> {
    let idea = require_field(body.idea.as_deref(), "idea")?;
    let spreadsheet_id = require_field(body.spreadsheet_id.as_deref(), "spreadsheet_id")?;

    let market_context = state
        .researcher()
        .context(idea, DEFAULT_CONTEXT_BLOCKS)
        .await;

    let assumptions = financials::extract_assumptions(
        state.llm.as_ref(),
        state.prompts.as_ref(),
        idea,
        &market_context,
    )
    .await?;
    let projection = financials::project(&assumptions);

    // Persistence failures never block the primary response
    match &state.sheets {
        Some(sheets) => {
            let grid = financials::revenue_grid(&projection);
            match sheets.update(spreadsheet_id, REVENUE_RANGE, grid).await {
                Ok(()) => log::info!("Wrote revenue model to spreadsheet {}", spreadsheet_id),
                Err(e) => log::error!("Spreadsheet write failed: {}", e),
            }
        }
        None => log::warn!("Sheets export not configured; skipping spreadsheet write"),
    }

    let mut fields = Map::new();
    fields.insert("idea".to_string(), json!(idea));
    fields.insert(
        "assumptions".to_string(),
        serde_json::to_value(&assumptions).unwrap_or(Value::Null),
    );
    fields.insert(
        "revenue_model".to_string(),
        serde_json::to_value(&projection).unwrap_or(Value::Null),
    );
    fields.insert("spreadsheet_id".to_string(), json!(spreadsheet_id));
    store::persist(state.store_ref(), "financial_models", fields).await;

    Ok(Json(json!({
        "status": "success",
        "assumptions": assumptions,
        "revenue_model": projection,
        "spreadsheet_id": spreadsheet_id,
    })))
}
