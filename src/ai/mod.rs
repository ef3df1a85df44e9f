pub mod gemini;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Sampling parameters forwarded to the provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

/// One prompt sent to the text generation backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub config: Option<GenerationConfig>,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider API key is not configured")]
    NotConfigured,

    #[error("AI provider request timed out")]
    Timeout,

    #[error("AI provider request failed: {0}")]
    Transport(String),

    #[error("AI provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("AI provider response could not be decoded: {0}")]
    Decode(String),

    #[error("invalid AI provider URL: {0}")]
    InvalidUrl(String),
}

/// External text generation API.
///
/// `Ok(None)` means the provider answered successfully but produced no text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, AiError>;
}
