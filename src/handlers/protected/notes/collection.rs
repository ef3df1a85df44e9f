// handlers/protected/notes/collection.rs - GET/POST /notes

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use super::NoteRequest;
use crate::api::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /notes - All notes owned by the caller, newest first
pub async fn list_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> ApiResult<Value> {
    let notes = state.notes.find_many_by_owner(principal.user_id).await?;
    Ok(ApiResponse::success(json!({ "notes": notes })))
}

/// POST /notes - Create a note owned by the caller
pub async fn create_post(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    JsonBody(body): JsonBody<NoteRequest>,
) -> ApiResult<Value> {
    let draft = body.into_draft()?;
    let note = state.notes.create(principal.user_id, draft).await?;

    tracing::debug!("User {} created note {}", principal.user_id, note.id);
    Ok(ApiResponse::created(json!({
        "message": "Note created successfully",
        "note": note,
    })))
}
