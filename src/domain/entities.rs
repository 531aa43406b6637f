//! Domain entities. Transient request/response values; nothing here outlives a request.
//!
//! Boundary payloads use camelCase on the wire to match the LLM output schema.

use serde::{Deserialize, Serialize};

/// Input to the generation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateCronInput {
    pub description: String,
}

/// Output of the generation boundary. `cron_expression` is empty when no schedule was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCronOutput {
    #[serde(default)]
    pub cron_expression: String,
    pub is_valid_schedule: bool,
}

/// Input to the description boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeCronInput {
    pub cron_expression: String,
}

/// Output of the description boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeCronOutput {
    #[serde(default)]
    pub description: String,
    pub is_valid_cron: bool,
}

/// Outcome of one rate-limiter consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub identity: String,
    /// Permits left in the current window after this call.
    pub remaining: u32,
}

/// Caller-facing result. Exactly one of the three keys is present when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationResult {
    CronExpression {
        #[serde(rename = "cronExpression")]
        cron_expression: String,
    },
    Description {
        description: String,
    },
    Failure {
        error: String,
    },
}

impl TranslationResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }

    /// The success payload (expression or description), if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::CronExpression { cron_expression } => Some(cron_expression),
            Self::Description { description } => Some(description),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            _ => None,
        }
    }
}
