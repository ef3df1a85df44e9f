// handlers/protected/projects/record.rs - GET/PUT/DELETE /projects/:id

use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use super::UpdateProjectRequest;
use crate::api::JsonBody;
use crate::database::models::Project;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ownership::{authorize_ownership, not_found, parse_resource_id};
use crate::state::AppState;

/// GET /projects/:id
pub async fn record_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let project = authorize_ownership::<Project>(principal, &id, state.projects.as_ref()).await?;
    Ok(ApiResponse::success(json!({ "project": project })))
}

/// PUT /projects/:id - Partial update
pub async fn record_put(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateProjectRequest>,
) -> ApiResult<Value> {
    let id = parse_resource_id::<Project>(&id)?;
    let patch = body.into_patch()?;

    let project = state
        .projects
        .update_if_owned(id, principal.user_id, patch)
        .await?
        .ok_or_else(not_found::<Project>)?;

    Ok(ApiResponse::success(json!({
        "message": "Project updated successfully",
        "project": project,
    })))
}

/// DELETE /projects/:id
pub async fn record_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_resource_id::<Project>(&id)?;

    if !state.projects.delete_if_owned(id, principal.user_id).await? {
        return Err(not_found::<Project>());
    }

    Ok(ApiResponse::success(json!({ "message": "Project deleted successfully" })))
}
