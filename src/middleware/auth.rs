use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{Claims, TokenService};
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal, derived from a verified token on every request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(request.headers(), &state.tokens)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Resolve the principal from the `Authorization: Bearer <token>` header.
///
/// Every failure (missing header, wrong scheme, bad signature, expired) yields the
/// same client response; the reason is only logged.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthUser, ApiError> {
    let token = extract_jwt_from_headers(headers).map_err(|reason| {
        tracing::debug!("Rejected request: {}", reason);
        ApiError::unauthorized("Unauthorized")
    })?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Unauthorized")
    })?;

    Ok(AuthUser::from(claims))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty JWT token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_jwt_from_headers(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
        assert!(extract_jwt_from_headers(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_jwt_from_headers(&headers("Bearer   ")).is_err());
        assert!(extract_jwt_from_headers(&headers("bearer abc")).is_err());
    }

    #[test]
    fn authenticate_returns_principal() {
        let tokens = TokenService::new("middleware-secret", 1).unwrap();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();

        let principal = authenticate(&headers(&format!("Bearer {token}")), &tokens).unwrap();
        assert_eq!(principal.user_id, user_id);
    }

    #[test]
    fn all_failures_look_the_same() {
        let tokens = TokenService::new("middleware-secret", 1).unwrap();
        let missing = authenticate(&HeaderMap::new(), &tokens).unwrap_err();
        let forged = authenticate(&headers("Bearer forged.token.value"), &tokens).unwrap_err();

        assert_eq!(missing.to_json(), forged.to_json());
        assert_eq!(missing.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
