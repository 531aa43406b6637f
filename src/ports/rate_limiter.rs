//! Rate limiter outbound port. Sliding-window counter keyed by caller identity.

use crate::domain::{DomainError, RateLimitDecision};

/// Port for consulting a rate limiter.
///
/// Implemented in memory for single-instance use and over a hosted Redis for
/// multi-instance deployments. Both enforce `max_requests` per sliding `window`
/// per identity.
#[async_trait::async_trait]
pub trait RateLimiterPort: Send + Sync {
    /// Record one request for `identity` and report whether it is allowed.
    ///
    /// # Errors
    /// Returns `DomainError::RateLimiter` if the backing store is unreachable.
    async fn limit(&self, identity: &str) -> Result<RateLimitDecision, DomainError>;
}
