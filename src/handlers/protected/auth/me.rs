// handlers/protected/auth/me.rs - GET /auth/me handler

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AuthService;
use crate::state::AppState;

/// GET /auth/me - Public info for the authenticated user
pub async fn me_get(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthUser>,
) -> ApiResult<Value> {
    let user = AuthService::new(state.users.as_ref(), &state.tokens)
        .current_user(principal.user_id)
        .await?;

    Ok(ApiResponse::success(json!({ "user": user })))
}
