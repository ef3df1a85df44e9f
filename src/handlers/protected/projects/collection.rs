// handlers/protected/projects/collection.rs - GET/POST /projects

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use super::CreateProjectRequest;
use crate::api::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /projects - All projects owned by the caller, newest first
pub async fn list_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> ApiResult<Value> {
    let projects = state.projects.find_many_by_owner(principal.user_id).await?;
    Ok(ApiResponse::success(json!({ "projects": projects })))
}

/// POST /projects - Create a project; status starts as "active"
pub async fn create_post(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
    JsonBody(body): JsonBody<CreateProjectRequest>,
) -> ApiResult<Value> {
    let draft = body.into_draft()?;
    let project = state.projects.create(principal.user_id, draft).await?;

    Ok(ApiResponse::created(json!({
        "message": "Project created successfully",
        "project": project,
    })))
}
