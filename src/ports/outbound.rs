//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    DescribeCronInput, DescribeCronOutput, DomainError, GenerateCronInput, GenerateCronOutput,
};

/// LLM boundary. Non-deterministic and fallible; output must match the declared schema
/// or the adapter returns `DomainError::Ai`.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Natural-language schedule to CRON expression.
    async fn generate_cron(
        &self,
        input: &GenerateCronInput,
    ) -> Result<GenerateCronOutput, DomainError>;

    /// CRON expression to natural-language description.
    async fn describe_cron(
        &self,
        input: &DescribeCronInput,
    ) -> Result<DescribeCronOutput, DomainError>;
}
