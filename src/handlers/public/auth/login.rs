// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - Authenticate and receive a JWT
///
/// Output: `{ "message", "token", "user", "expiresIn" }`.
/// Unknown email, wrong password and missing fields all produce the same 401.
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Value> {
    let outcome = AuthService::new(state.users.as_ref(), &state.tokens)
        .login(body.email, body.password)
        .await?;

    Ok(ApiResponse::success(json!({
        "message": "Login successful",
        "token": outcome.token,
        "user": outcome.user,
        "expiresIn": outcome.expires_in,
    })))
}
