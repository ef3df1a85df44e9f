#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::Router;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use devai_api::ai::{AiError, GenerationRequest, TextGenerator};
use devai_api::config::AppConfig;
use devai_api::database::MemoryStore;
use devai_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// What the stubbed AI provider answers with
#[derive(Clone, Debug)]
pub enum StubReply {
    Text(String),
    Empty,
    Fail,
}

/// Text generator that records calls instead of reaching the network
pub struct StubGenerator {
    reply: StubReply,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<std::sync::Mutex<Option<String>>>,
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Option<String>, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(request.prompt);
        match &self.reply {
            StubReply::Text(text) => Ok(Some(text.clone())),
            StubReply::Empty => Ok(None),
            StubReply::Fail => Err(AiError::Status {
                status: 503,
                body: "provider overloaded".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub base_url: String,
    pub store: MemoryStore,
    ai_calls: Arc<AtomicUsize>,
    last_prompt: Arc<std::sync::Mutex<Option<String>>>,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(StubReply::Text("stub answer".to_string())).await
    }

    pub async fn spawn_with(reply: StubReply) -> Result<Self> {
        let config = AppConfig::development().with_jwt_secret(TEST_SECRET);
        let store = MemoryStore::new();
        let ai_calls = Arc::new(AtomicUsize::new(0));
        let last_prompt = Arc::new(std::sync::Mutex::new(None));

        let state = AppState::new(config, store.clone())?.with_ai(Arc::new(StubGenerator {
            reply,
            calls: ai_calls.clone(),
            last_prompt: last_prompt.clone(),
        }));

        let base_url = serve(app(state)).await?;

        Ok(Self {
            base_url,
            store,
            ai_calls,
            last_prompt,
            client: reqwest::Client::new(),
        })
    }

    pub fn ai_calls(&self) -> usize {
        self.ai_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    /// Send a request with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// Send a raw, possibly malformed, JSON body
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        raw: &str,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(raw.to_string());
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Register an account and return a fresh token for it
    pub async fn register_and_login(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({ "name": name, "email": email, "password": password }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let (status, body) = self
            .post("/auth/login", None, json!({ "email": email, "password": password }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }
}

/// Serve a router on an unused local port and return its base URL
pub async fn serve(router: Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}
