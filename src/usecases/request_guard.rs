//! Identity resolution and rate-limit admission shared by both translation services.

use crate::domain::{ClientIdentity, TranslationError};
use crate::ports::RateLimiterPort;
use std::sync::Arc;
use tracing::{debug, warn};

/// One limiter, one identity policy, one backend-failure policy for every flow.
pub struct RequestGuard {
    limiter: Arc<dyn RateLimiterPort>,
    default_identity: String,
    /// Admit requests when the limiter backend fails.
    fail_open: bool,
}

impl RequestGuard {
    pub fn new(
        limiter: Arc<dyn RateLimiterPort>,
        default_identity: String,
        fail_open: bool,
    ) -> Self {
        Self {
            limiter,
            default_identity,
            fail_open,
        }
    }

    /// Resolve the caller identity from a forwarded-for value.
    pub fn identity(&self, forwarded_for: Option<&str>) -> ClientIdentity {
        let id = ClientIdentity::resolve(forwarded_for, &self.default_identity);
        if id.as_str() == self.default_identity {
            debug!(identity = %id, "no caller address; using shared default bucket");
        }
        id
    }

    /// Consult the limiter once for `identity`.
    pub async fn admit(&self, identity: &ClientIdentity) -> Result<(), TranslationError> {
        match self.limiter.limit(identity.as_str()).await {
            Ok(decision) if decision.allowed => Ok(()),
            Ok(_) => {
                warn!(identity = %identity, "rate limit exceeded");
                Err(TranslationError::RateLimitExceeded)
            }
            Err(e) if self.fail_open => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "rate limiter unavailable; admitting (fail-open)"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "rate limiter unavailable; rejecting (fail-closed)"
                );
                Err(TranslationError::RateLimiterUnavailable)
            }
        }
    }
}
