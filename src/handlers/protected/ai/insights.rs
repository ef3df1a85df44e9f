// handlers/protected/ai/insights.rs - POST /ai/insights handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ai::prompts::{insights_request, InsightNote, INSIGHTS_FALLBACK};
use crate::api::JsonBody;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub notes: Option<Vec<InsightNote>>,
}

/// POST /ai/insights - Summarize themes across the submitted notes
pub async fn insights_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<InsightsRequest>,
) -> ApiResult<Value> {
    let notes = body.notes.unwrap_or_default();
    if notes.is_empty() {
        return Err(ApiError::missing_fields("No notes provided", &["notes"]));
    }

    let insights = state
        .ai
        .generate(insights_request(&notes))
        .await
        .map_err(|e| ApiError::from_ai(e, "Failed to generate AI insights"))?
        .unwrap_or_else(|| INSIGHTS_FALLBACK.to_string());

    Ok(ApiResponse::success(json!({ "insights": insights })))
}
