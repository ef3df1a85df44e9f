// handlers/mod.rs - HTTP handlers grouped by security level
//
// public/     no authentication (registration, login)
// protected/  bearer token required; the principal arrives as Extension<AuthUser>

pub mod protected;
pub mod public;
