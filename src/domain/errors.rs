//! Domain errors.
//!
//! `DomainError` crosses ports; adapters map infrastructure errors into it.
//! `TranslationError` is the caller taxonomy; each variant has a fixed user message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Rate limiter error: {0}")]
    RateLimiter(String),

    #[error("UI error: {0}")]
    Ui(String),
}

pub const RATE_LIMITED_MSG: &str = "Too many requests. Please try again later.";
pub const UNAVAILABLE_MSG: &str =
    "The service is temporarily unavailable. Please try again later.";
pub const TIMEOUT_MSG: &str = "The request timed out. Please try again.";
pub const QUOTA_MSG: &str =
    "The service is currently experiencing high load or has reached its quota. Please try again later.";

/// Which flow produced the error. Selects wording of the flow-specific messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Generate,
    Describe,
}

/// Every way a translation can fail, as seen by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// Caller-correctable; carries field-level reasons.
    #[error("input validation failed: {}", .0.join(", "))]
    InputValidation(Vec<String>),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    /// Limiter backend failed and the guard is fail-closed.
    #[error("rate limiter unavailable")]
    RateLimiterUnavailable,

    /// The boundary judged the input not to be a schedule / CRON expression.
    #[error("upstream rejected the input")]
    UpstreamInvalidResult(Flow),

    /// The boundary broke its own output contract.
    #[error("upstream produced malformed output: {detail}")]
    UpstreamMalformedOutput { flow: Flow, detail: MalformedOutput },

    #[error("upstream timed out")]
    UpstreamTimeout,

    #[error("upstream quota exceeded")]
    UpstreamQuotaExceeded,

    #[error("upstream failed")]
    UpstreamUnknown(Flow),
}

/// Specific contract violation behind `UpstreamMalformedOutput`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedOutput {
    #[error("valid flag set but payload empty")]
    MissingPayload,

    #[error("expression does not have 5 or 6 fields")]
    BadFieldCount,
}

impl TranslationError {
    /// Classify a boundary failure by its message. Raw detail never reaches the caller.
    pub fn from_upstream(flow: Flow, err: &DomainError) -> Self {
        let msg = err.to_string().to_lowercase();
        if msg.contains("deadline exceeded") || msg.contains("timed out") {
            Self::UpstreamTimeout
        } else if msg.contains("quota") {
            Self::UpstreamQuotaExceeded
        } else {
            Self::UpstreamUnknown(flow)
        }
    }

    /// The single human-readable string surfaced to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::InputValidation(reasons) => reasons.join(", "),
            Self::RateLimitExceeded => RATE_LIMITED_MSG.to_string(),
            Self::RateLimiterUnavailable => UNAVAILABLE_MSG.to_string(),
            Self::UpstreamInvalidResult(Flow::Generate) => {
                "Could not generate a CRON expression from the provided text. Please describe a valid schedule."
                    .to_string()
            }
            Self::UpstreamInvalidResult(Flow::Describe) => {
                "The AI did not recognize this as a valid CRON schedule.".to_string()
            }
            Self::UpstreamMalformedOutput {
                flow: Flow::Generate,
                detail: MalformedOutput::MissingPayload,
            } => "The AI did not return a CRON expression. Please try again.".to_string(),
            Self::UpstreamMalformedOutput {
                flow: Flow::Generate,
                detail: MalformedOutput::BadFieldCount,
            } => "The AI generated an invalid CRON format. Please try rephrasing your request."
                .to_string(),
            Self::UpstreamMalformedOutput {
                flow: Flow::Describe,
                ..
            } => "The AI did not return a description. Please try again.".to_string(),
            Self::UpstreamTimeout => TIMEOUT_MSG.to_string(),
            Self::UpstreamQuotaExceeded => QUOTA_MSG.to_string(),
            Self::UpstreamUnknown(Flow::Generate) => {
                "An error occurred while generating the CRON expression.".to_string()
            }
            Self::UpstreamUnknown(Flow::Describe) => {
                "An error occurred while describing the CRON expression.".to_string()
            }
        }
    }
}
