pub mod auth_service;
pub mod ownership;

pub use auth_service::{AuthService, LoginOutcome, RegisterInput};
pub use ownership::{authorize_ownership, parse_resource_id};
