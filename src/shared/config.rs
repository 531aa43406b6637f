//! Application configuration. LLM credentials, rate limiter backend, identity policy.

use crate::domain::identity::DEFAULT_IDENTITY;
use serde::Deserialize;

/// Permits per window per identity.
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 5;
/// Sliding window length.
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
/// Key namespace in the shared backing store.
pub const DEFAULT_RATE_LIMIT_PREFIX: &str = "cron-gen";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;
/// Per-request timeout for the hosted limiter; elapsing it triggers the fail policy.
pub const DEFAULT_RATE_LIMIT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// AI API key (e.g., OpenAI). Read from CRONSCRIBE_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// AI API URL. Defaults to OpenAI. Read from CRONSCRIBE_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// AI model name. Defaults to "gpt-4o-mini". Read from CRONSCRIBE_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    /// Per-request timeout for the AI API. Read from CRONSCRIBE_AI_TIMEOUT_SECS.
    #[serde(default)]
    pub ai_timeout_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Rate Limiter Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Upstash Redis REST URL. Also read from UPSTASH_REDIS_REST_URL.
    #[serde(default)]
    pub upstash_redis_rest_url: Option<String>,

    /// Upstash Redis REST token. Also read from UPSTASH_REDIS_REST_TOKEN.
    #[serde(default)]
    pub upstash_redis_rest_token: Option<String>,

    #[serde(default)]
    pub rate_limit_max_requests: Option<u32>,

    #[serde(default)]
    pub rate_limit_window_secs: Option<u64>,

    #[serde(default)]
    pub rate_limit_prefix: Option<String>,

    /// Per-request timeout for the hosted limiter. Read from CRONSCRIBE_RATE_LIMIT_TIMEOUT_SECS.
    #[serde(default)]
    pub rate_limit_timeout_secs: Option<u64>,

    /// Allow requests when the limiter backend is unreachable. Defaults to false (fail-closed).
    #[serde(default)]
    pub rate_limit_fail_open: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────
    /// Identity used when the caller has no address. Defaults to "anonymous".
    #[serde(default)]
    pub default_identity: Option<String>,

    /// Forwarded-for value reported for this session's caller. Read from CRONSCRIBE_CLIENT_ADDR.
    #[serde(default)]
    pub client_addr: Option<String>,
}

/// Which rate limiter backend to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitBackend {
    InMemory,
    Upstash { url: String, token: String },
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("CRONSCRIBE"));
        if let Ok(path) = std::env::var("CRONSCRIBE_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // Upstash's own variable names are read directly (no CRONSCRIBE_ prefix)
        if cfg.upstash_redis_rest_url.is_none() {
            cfg.upstash_redis_rest_url = std::env::var("UPSTASH_REDIS_REST_URL").ok();
        }
        if cfg.upstash_redis_rest_token.is_none() {
            cfg.upstash_redis_rest_token = std::env::var("UPSTASH_REDIS_REST_TOKEN").ok();
        }
        Ok(cfg)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the AI API key if configured and non-empty.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key.clone().filter(|k| !k.trim().is_empty())
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    pub fn ai_timeout_secs_or_default(&self) -> u64 {
        self.ai_timeout_secs.unwrap_or(DEFAULT_AI_TIMEOUT_SECS)
    }

    /// Returns true if AI is configured (API key present).
    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rate Limiter Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn rate_limit_max_requests_or_default(&self) -> u32 {
        self.rate_limit_max_requests
            .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS)
    }

    pub fn rate_limit_window_secs_or_default(&self) -> u64 {
        self.rate_limit_window_secs
            .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS)
    }

    pub fn rate_limit_prefix_or_default(&self) -> String {
        self.rate_limit_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_RATE_LIMIT_PREFIX.to_string())
    }

    pub fn rate_limit_timeout_secs_or_default(&self) -> u64 {
        self.rate_limit_timeout_secs
            .unwrap_or(DEFAULT_RATE_LIMIT_TIMEOUT_SECS)
    }

    pub fn rate_limit_fail_open(&self) -> bool {
        self.rate_limit_fail_open.unwrap_or(false)
    }

    /// Pick the limiter backend. Both Upstash values or neither; one alone is a config error.
    pub fn rate_limit_backend(&self) -> Result<RateLimitBackend, String> {
        let url = self
            .upstash_redis_rest_url
            .clone()
            .filter(|s| !s.trim().is_empty());
        let token = self
            .upstash_redis_rest_token
            .clone()
            .filter(|s| !s.trim().is_empty());
        match (url, token) {
            (Some(url), Some(token)) => Ok(RateLimitBackend::Upstash { url, token }),
            (None, None) => Ok(RateLimitBackend::InMemory),
            (Some(_), None) => {
                Err("UPSTASH_REDIS_REST_URL is set but UPSTASH_REDIS_REST_TOKEN is missing".into())
            }
            (None, Some(_)) => {
                Err("UPSTASH_REDIS_REST_TOKEN is set but UPSTASH_REDIS_REST_URL is missing".into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn default_identity_or_default(&self) -> String {
        self.default_identity
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IDENTITY.to_string())
    }
}
