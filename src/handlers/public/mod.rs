// handlers/public/mod.rs - Endpoints that do not require authentication

pub mod auth;
