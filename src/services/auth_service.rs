use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password, PasswordError};
use crate::auth::TokenService;
use crate::database::models::{NewUser, UserInfo};
use crate::database::UserStore;
use crate::error::ApiError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Raw registration fields; all three must be present and non-blank
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserInfo,
    pub expires_in: i64,
}

/// Account registration, credential checks and token issuance
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(users: &'a dyn UserStore, tokens: &'a TokenService) -> Self {
        Self { users, tokens }
    }

    /// Create an account. The stored password is an Argon2 hash; the hash never leaves this layer.
    pub async fn register(&self, input: RegisterInput) -> Result<UserInfo, ApiError> {
        let name = non_blank(input.name);
        let email = non_blank(input.email).map(|e| normalize_email(&e));
        let password = input.password.filter(|p| !p.is_empty());

        let (name, email, password) = match (name, email, password) {
            (Some(name), Some(email), Some(password)) => (name, email, password),
            (name, email, password) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if email.is_none() {
                    missing.push("email");
                }
                if password.is_none() {
                    missing.push("password");
                }
                return Err(ApiError::missing_fields(
                    "Name, email, and password are required",
                    &missing,
                ));
            }
        };

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("User already exists"));
        }

        let password_hash = blocking(move || hash_password(&password)).await?;

        // The store enforces uniqueness too, covering concurrent registrations
        let user = self
            .users
            .create(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        info!("Registered user {}", user.id);
        Ok(UserInfo::from(user))
    }

    /// Verify credentials and issue a token. Every failure is the same 401.
    pub async fn login(&self, email: Option<String>, password: Option<String>) -> Result<LoginOutcome, ApiError> {
        let (email, password) = match (non_blank(email), password.filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => (normalize_email(&email), password),
            _ => return Err(ApiError::unauthorized(INVALID_CREDENTIALS)),
        };

        let Some(user) = self.users.find_by_email(&email).await? else {
            blocking(move || {
                verify_against_dummy(&password);
                Ok(())
            })
            .await?;
            warn!("Login failed: unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        let stored_hash = user.password_hash.clone();
        let matches = blocking(move || verify_password(&password, &stored_hash)).await?;
        if !matches {
            warn!("Login failed: wrong password for user {}", user.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id).map_err(|e| {
            tracing::error!("Failed to issue token: {}", e);
            ApiError::internal_server_error("Internal server error")
        })?;

        info!("User {} logged in", user.id);
        Ok(LoginOutcome {
            token,
            user: UserInfo::from(user),
            expires_in: self.tokens.lifetime_secs(),
        })
    }

    /// Public info for the principal; a deleted account reads as unauthenticated
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserInfo, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserInfo::from)
            .ok_or_else(|| ApiError::unauthorized("Unauthorized"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Run Argon2 work off the async executor
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| {
            tracing::error!("Password task failed: {}", e);
            ApiError::internal_server_error("Internal server error")
        })?
        .map_err(ApiError::from)
}
