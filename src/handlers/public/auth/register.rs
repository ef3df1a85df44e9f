// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, RegisterInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/register - Create a new account
///
/// Input: `{ "name", "email", "password" }`, all required.
/// Output: 201 `{ "message", "user" }`; the password hash is never returned.
/// 400 when a field is missing or blank, 409 when the email is taken.
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> ApiResult<Value> {
    let user = AuthService::new(state.users.as_ref(), &state.tokens)
        .register(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
        })
        .await?;

    Ok(ApiResponse::created(json!({
        "message": "User created successfully",
        "user": user,
    })))
}
