use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{AiError, GenerationConfig, GenerationRequest, TextGenerator};
use crate::config::AiConfig;

/// Google AI Studio (Gemini) `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: Url,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        // A trailing slash makes Url::join append rather than replace the last segment
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| AiError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, api_key: &str) -> Result<Url, AiError> {
        let mut url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| AiError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::NotConfigured)?;
        let url = self.endpoint(api_key)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(request.prompt) }],
            }],
            generation_config: request.config.map(WireGenerationConfig::from),
        };

        debug!("Calling AI provider model {}", self.model);
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::Decode(e.to_string()))?;

        Ok(data.first_text())
    }
}

fn transport_error(err: reqwest::Error) -> AiError {
    if err.is_timeout() {
        AiError::Timeout
    } else {
        AiError::Transport(err.to_string())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<GenerationConfig> for WireGenerationConfig {
    fn from(config: GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// candidates[0].content.parts[0].text
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str, api_key: Option<&str>) -> GeminiClient {
        GeminiClient::new(&AiConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_includes_model_and_key() {
        let url = client("https://generativelanguage.googleapis.com", Some("k"))
            .endpoint("k")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=k"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = client("http://127.0.0.1:9999/proxy/", Some("k")).endpoint("a b").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/proxy/v1beta/models/gemini-pro:generateContent?key=a+b"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        // Unroutable base URL: reaching the network would surface as Transport
        let gemini = client("http://192.0.2.1:1", None);
        assert!(!gemini.is_configured());
        let err = gemini
            .generate(GenerationRequest { prompt: "hi".into(), config: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }

    #[test]
    fn request_body_matches_provider_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some("hello".into()) }],
            }],
            generation_config: Some(WireGenerationConfig {
                temperature: 0.5,
                top_k: 40,
                top_p: 0.5,
                max_output_tokens: 2048,
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn first_text_handles_missing_candidates() {
        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);

        let full: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "answer" }, { "text": "ignored" }] } }]
        }))
        .unwrap();
        assert_eq!(full.first_text().as_deref(), Some("answer"));
    }
}
