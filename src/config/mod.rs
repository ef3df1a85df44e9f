use std::env;
use thiserror::Error;

/// Minimum signing secret length accepted outside development
const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string; `None` selects the in-memory store
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

// Hand-written so the signing secret never lands in logs
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be at least {0} bytes outside development")]
    WeakJwtSecret(usize),

    #[error("DATABASE_URL is required in {0:?} mode")]
    MissingDatabaseUrl(Environment),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

impl AppConfig {
    /// Load configuration from the process environment and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (the environment in production)
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&get);

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, get: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Database overrides
        if let Some(v) = get("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = Some(v);
        }
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = get("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = get("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Some(v) = get("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = get("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = get("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = get("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // AI provider overrides
        if let Some(v) = get("GOOGLE_AI_STUDIO_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.ai.api_key = Some(v);
        }
        if let Some(v) = get("AI_BASE_URL") {
            self.ai.base_url = v;
        }
        if let Some(v) = get("AI_MODEL") {
            self.ai.model = v;
        }
        if let Some(v) = get("AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = v.parse().unwrap_or(self.ai.timeout_secs);
        }

        self
    }

    /// The signing secret has no fallback; a missing or weak one is an error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.security.jwt_expiry_hours == 0 {
            return Err(ConfigError::ZeroDuration("SECURITY_JWT_EXPIRY_HOURS"));
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration("AI_TIMEOUT_SECS"));
        }
        if self.environment != Environment::Development {
            if self.security.jwt_secret.len() < MIN_PRODUCTION_SECRET_BYTES {
                return Err(ConfigError::WeakJwtSecret(MIN_PRODUCTION_SECRET_BYTES));
            }
            if self.database.url.is_none() {
                return Err(ConfigError::MissingDatabaseUrl(self.environment));
            }
        }
        Ok(())
    }

    /// Replace the signing secret (used when the secret comes from somewhere other than the env)
    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.security.jwt_secret = secret.into();
        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            ai: AiConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            ai: AiConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            ai: AiConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.jwt_expiry_hours, 168);
        assert!(config.database.url.is_none());
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert_eq!(config.api.max_request_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn missing_secret_fails_fast() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::MissingJwtSecret);
        assert_eq!(load(&[("JWT_SECRET", "   ")]).unwrap_err(), ConfigError::MissingJwtSecret);
    }

    #[test]
    fn production_requires_strong_secret_and_database() {
        let weak = load(&[("APP_ENV", "production"), ("JWT_SECRET", "short")]);
        assert_eq!(weak.unwrap_err(), ConfigError::WeakJwtSecret(32));

        let secret = "x".repeat(48);
        let no_db = load(&[("APP_ENV", "prod"), ("JWT_SECRET", &secret)]);
        assert_eq!(
            no_db.unwrap_err(),
            ConfigError::MissingDatabaseUrl(Environment::Production)
        );

        let ok = load(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", &secret),
            ("DATABASE_URL", "postgres://localhost/devai"),
        ])
        .unwrap();
        assert_eq!(ok.environment, Environment::Production);
    }

    #[test]
    fn env_overrides_apply() {
        let config = load(&[
            ("JWT_SECRET", "dev-secret"),
            ("SECURITY_JWT_EXPIRY_HOURS", "12"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("GOOGLE_AI_STUDIO_API_KEY", "key-123"),
            ("AI_TIMEOUT_SECS", "not-a-number"),
        ])
        .unwrap();

        assert_eq!(config.security.jwt_expiry_hours, 12);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.ai.api_key.as_deref(), Some("key-123"));
        // Unparseable values keep the profile default
        assert_eq!(config.ai.timeout_secs, 30);
    }

    #[test]
    fn zero_durations_are_rejected() {
        let no_expiry = load(&[("JWT_SECRET", "dev-secret"), ("SECURITY_JWT_EXPIRY_HOURS", "0")]);
        assert_eq!(
            no_expiry.unwrap_err(),
            ConfigError::ZeroDuration("SECURITY_JWT_EXPIRY_HOURS")
        );

        let no_timeout = load(&[("JWT_SECRET", "dev-secret"), ("AI_TIMEOUT_SECS", "0")]);
        assert_eq!(no_timeout.unwrap_err(), ConfigError::ZeroDuration("AI_TIMEOUT_SECS"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::development().with_jwt_secret("super-secret");
        config.ai.api_key = Some("api-key".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("api-key"));
    }
}
