// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route in here sits behind jwt_auth_middleware, which rejects the request
// before any body is parsed. Record-level handlers go through ownership checks
// so another user's record is reported exactly like a missing one.

pub mod ai;
pub mod auth;
pub mod notes;
pub mod projects;

/// Required request field; blank strings count as absent
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
