// handlers/protected/ai/chat.rs - POST /ai/chat handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ai::prompts::{chat_request, CHAT_FALLBACK};
use crate::api::JsonBody;
use crate::error::ApiError;
use crate::handlers::protected::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

/// POST /ai/chat - Ask the backend assistant a question
///
/// An empty message is rejected before anything is sent upstream.
pub async fn chat_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ChatRequest>,
) -> ApiResult<Value> {
    let message = required(body.message)
        .ok_or_else(|| ApiError::missing_fields("Message is required", &["message"]))?;

    let response = state
        .ai
        .generate(chat_request(&message))
        .await
        .map_err(|e| ApiError::from_ai(e, "Failed to get AI response"))?
        .unwrap_or_else(|| CHAT_FALLBACK.to_string());

    Ok(ApiResponse::success(json!({ "response": response })))
}
