//! Hosted sliding-window rate limiter on Upstash Redis (REST API).
//!
//! One atomic `EVAL` per check on key `{prefix}:{identity}`. The sorted set holds one
//! member per admitted request, scored by its millisecond timestamp.

use crate::domain::{DomainError, RateLimitDecision};
use crate::ports::RateLimiterPort;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// KEYS[1] = bucket key; ARGV = now_ms, window_ms, limit, member. Returns {allowed, remaining}.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
redis.call('ZREMRANGEBYSCORE', key, 0, now - window)
local count = redis.call('ZCARD', key)
if count < limit then
  redis.call('ZADD', key, now, ARGV[4])
  redis.call('PEXPIRE', key, window)
  return {1, limit - count - 1}
end
return {0, 0}
"#;

/// Upstash REST reply: either `result` or `error` is set.
#[derive(Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

pub struct UpstashRateLimiter {
    client: Client,
    url: String,
    token: String,
    max_requests: u32,
    window: Duration,
    prefix: String,
    /// Distinguishes this process's members from other instances sharing the key.
    instance: Uuid,
    seq: AtomicU64,
}

impl UpstashRateLimiter {
    /// Create a limiter bound to one Upstash database.
    ///
    /// # Arguments
    /// * `url` - REST endpoint (UPSTASH_REDIS_REST_URL)
    /// * `token` - REST token (UPSTASH_REDIS_REST_TOKEN)
    /// * `max_requests` - Permits per window per identity
    /// * `window` - Sliding window length
    /// * `prefix` - Key namespace shared with other consumers of the database
    /// * `timeout` - Per-request timeout; a hung backend surfaces as an error
    pub fn new(
        url: String,
        token: String,
        max_requests: u32,
        window: Duration,
        prefix: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url,
            token,
            max_requests,
            window,
            prefix,
            instance: Uuid::new_v4(),
            seq: AtomicU64::new(0),
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.prefix, identity)
    }

    /// Unique sorted-set member for this request.
    fn member(&self, now_ms: i64) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", now_ms, self.instance, seq)
    }

    /// Parse `[allowed, remaining]` from the script result.
    fn parse_result(value: &serde_json::Value) -> Result<(bool, u32), DomainError> {
        let arr = value.as_array().filter(|a| a.len() == 2).ok_or_else(|| {
            DomainError::RateLimiter(format!("unexpected script result: {}", value))
        })?;
        let allowed = arr[0].as_i64().unwrap_or(0) == 1;
        let remaining = arr[1].as_u64().unwrap_or(0) as u32;
        Ok((allowed, remaining))
    }
}

#[async_trait::async_trait]
impl RateLimiterPort for UpstashRateLimiter {
    async fn limit(&self, identity: &str) -> Result<RateLimitDecision, DomainError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let command = serde_json::json!([
            "EVAL",
            SLIDING_WINDOW_SCRIPT,
            "1",
            self.key(identity),
            now_ms.to_string(),
            self.window.as_millis().to_string(),
            self.max_requests.to_string(),
            self.member(now_ms),
        ]);

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&command)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::RateLimiter(format!("Request timed out: {}", e))
                } else {
                    DomainError::RateLimiter(format!("Request failed: {}", e))
                }
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Upstash returned error status");
            return Err(DomainError::RateLimiter(format!(
                "Upstash error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let reply: UpstashReply = res
            .json()
            .await
            .map_err(|e| DomainError::RateLimiter(format!("Failed to parse reply: {}", e)))?;

        if let Some(err) = reply.error {
            return Err(DomainError::RateLimiter(format!("Upstash error: {}", err)));
        }
        let result = reply
            .result
            .ok_or_else(|| DomainError::RateLimiter("reply has no result".into()))?;
        let (allowed, remaining) = Self::parse_result(&result)?;

        debug!(identity, allowed, remaining, "hosted rate limit check");

        Ok(RateLimitDecision {
            allowed,
            identity: identity.to_string(),
            remaining,
        })
    }
}
