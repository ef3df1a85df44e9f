use std::sync::Arc;
use thiserror::Error;

use crate::ai::{AiError, GeminiClient, TextGenerator};
use crate::auth::{TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::models::{Note, Project};
use crate::database::{ResourceStore, UserStore};

/// Shared dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub users: Arc<dyn UserStore>,
    pub notes: Arc<dyn ResourceStore<Note>>,
    pub projects: Arc<dyn ResourceStore<Project>>,
    pub ai: Arc<dyn TextGenerator>,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Ai(#[from] AiError),
}

impl AppState {
    /// Wire one store backend into every store slot and build the AI client from config
    pub fn new<S>(config: AppConfig, store: S) -> Result<Self, StateError>
    where
        S: UserStore + ResourceStore<Note> + ResourceStore<Project> + Clone + 'static,
    {
        let tokens = TokenService::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        let ai = GeminiClient::new(&config.ai)?;
        if !ai.is_configured() {
            tracing::warn!("GOOGLE_AI_STUDIO_API_KEY not set; AI routes will report the service as not configured");
        }

        Ok(Self {
            config: Arc::new(config),
            tokens,
            users: Arc::new(store.clone()),
            notes: Arc::new(store.clone()),
            projects: Arc::new(store),
            ai: Arc::new(ai),
        })
    }

    /// Swap the text generation backend
    pub fn with_ai(mut self, ai: Arc<dyn TextGenerator>) -> Self {
        self.ai = ai;
        self
    }
}
