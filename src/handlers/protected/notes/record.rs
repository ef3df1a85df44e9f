// handlers/protected/notes/record.rs - GET/PUT/DELETE /notes/:id

use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use super::NoteRequest;
use crate::api::JsonBody;
use crate::database::models::Note;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ownership::{authorize_ownership, not_found, parse_resource_id};
use crate::state::AppState;

/// GET /notes/:id
pub async fn record_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let note = authorize_ownership::<Note>(principal, &id, state.notes.as_ref()).await?;
    Ok(ApiResponse::success(json!({ "note": note })))
}

/// PUT /notes/:id - Replace title and content
pub async fn record_put(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<NoteRequest>,
) -> ApiResult<Value> {
    let id = parse_resource_id::<Note>(&id)?;
    let draft = body.into_draft()?;

    let note = state
        .notes
        .update_if_owned(id, principal.user_id, draft)
        .await?
        .ok_or_else(not_found::<Note>)?;

    Ok(ApiResponse::success(json!({
        "message": "Note updated successfully",
        "note": note,
    })))
}

/// DELETE /notes/:id
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_resource_id::<Note>(&id)?;

    if !state.notes.delete_if_owned(id, principal.user_id).await? {
        return Err(not_found::<Note>());
    }

    Ok(ApiResponse::success(json!({ "message": "Note deleted successfully" })))
}
