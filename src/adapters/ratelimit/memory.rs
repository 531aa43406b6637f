//! In-memory sliding-window rate limiter. Single-process deployments and tests.
//!
//! Keeps a log of admitted request instants per key. Rejected requests are not logged,
//! so a caller that keeps retrying regains permits as old entries age out.

use crate::domain::{DomainError, RateLimitDecision};
use crate::ports::RateLimiterPort;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub struct InMemoryRateLimiter {
    max_requests: u32,
    window: Duration,
    prefix: String,
    log: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryRateLimiter {
    /// # Arguments
    /// * `max_requests` - Permits per window per identity
    /// * `window` - Sliding window length
    /// * `prefix` - Key namespace (kept for parity with the hosted backend's keys)
    pub fn new(max_requests: u32, window: Duration, prefix: impl Into<String>) -> Self {
        Self {
            max_requests,
            window,
            prefix: prefix.into(),
            log: Mutex::new(HashMap::new()),
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.prefix, identity)
    }
}

#[async_trait::async_trait]
impl RateLimiterPort for InMemoryRateLimiter {
    async fn limit(&self, identity: &str) -> Result<RateLimitDecision, DomainError> {
        let now = Instant::now();
        let key = self.key(identity);
        let mut log = self
            .log
            .lock()
            .map_err(|_| DomainError::RateLimiter("limiter state poisoned".into()))?;

        // Drop idle keys so the map does not grow with every identity ever seen.
        log.retain(|_, hits| {
            hits.back()
                .is_some_and(|last| now.duration_since(*last) < self.window)
        });

        let hits = log.entry(key).or_default();
        while hits
            .front()
            .is_some_and(|first| now.duration_since(*first) >= self.window)
        {
            hits.pop_front();
        }

        let used = hits.len() as u32;
        let allowed = used < self.max_requests;
        if allowed {
            hits.push_back(now);
        }
        let remaining = self.max_requests.saturating_sub(hits.len() as u32);

        debug!(identity, allowed, remaining, "in-memory rate limit check");

        Ok(RateLimitDecision {
            allowed,
            identity: identity.to_string(),
            remaining,
        })
    }
}
