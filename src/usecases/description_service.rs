//! Description translation: CRON expression to natural language.
//!
//! Flow: rate limit -> structural check -> AI boundary. Malformed input spends a
//! permit but never reaches the AI.

use crate::domain::{
    ClientIdentity, CronExpression, CronSyntaxError, DescribeCronInput, Flow, MalformedOutput,
    TranslationError, TranslationResult,
};
use crate::ports::AiPort;
use crate::usecases::request_guard::RequestGuard;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const CRON_EMPTY_MSG: &str = "CRON expression cannot be empty.";
pub const CRON_FIELD_COUNT_MSG: &str = "Not a valid CRON expression, expected 5 or 6 fields.";

pub struct DescriptionTranslationService {
    ai: Arc<dyn AiPort>,
    guard: Arc<RequestGuard>,
}

impl DescriptionTranslationService {
    pub fn new(ai: Arc<dyn AiPort>, guard: Arc<RequestGuard>) -> Self {
        Self { ai, guard }
    }

    /// Describe `cron_expression` in plain language for the caller at `forwarded_for`.
    ///
    /// Never fails: errors are returned as `TranslationResult::Failure`.
    pub async fn describe(
        &self,
        cron_expression: &str,
        forwarded_for: Option<&str>,
    ) -> TranslationResult {
        let identity = self.guard.identity(forwarded_for);
        match self.try_describe(cron_expression, &identity).await {
            Ok(description) => TranslationResult::Description { description },
            Err(e) => TranslationResult::failure(e.user_message()),
        }
    }

    async fn try_describe(
        &self,
        cron_expression: &str,
        identity: &ClientIdentity,
    ) -> Result<String, TranslationError> {
        self.guard.admit(identity).await?;

        let expr = CronExpression::parse(cron_expression).map_err(|e| {
            let reason = match e {
                CronSyntaxError::Empty => CRON_EMPTY_MSG,
                CronSyntaxError::FieldCount(_) => CRON_FIELD_COUNT_MSG,
            };
            TranslationError::InputValidation(vec![reason.to_string()])
        })?;

        let input = DescribeCronInput {
            cron_expression: expr.into_inner(),
        };
        let output = self.ai.describe_cron(&input).await.map_err(|e| {
            error!(identity = %identity, error = %e, "CRON description failed");
            TranslationError::from_upstream(Flow::Describe, &e)
        })?;

        if !output.is_valid_cron {
            info!(
                identity = %identity,
                cron = %input.cron_expression,
                "AI rejected CRON expression"
            );
            return Err(TranslationError::UpstreamInvalidResult(Flow::Describe));
        }

        let description = output.description.trim();
        if description.is_empty() {
            warn!(identity = %identity, "AI flagged CRON valid but returned no description");
            return Err(TranslationError::UpstreamMalformedOutput {
                flow: Flow::Describe,
                detail: MalformedOutput::MissingPayload,
            });
        }

        Ok(description.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ratelimit::InMemoryRateLimiter;
    use crate::domain::errors::RATE_LIMITED_MSG;
    use crate::domain::{DescribeCronOutput, DomainError, GenerateCronInput, GenerateCronOutput};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned description reply; records every expression it was asked about.
    struct ScriptedAi {
        reply: Result<DescribeCronOutput, String>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedAi {
        fn ok(description: &str, valid: bool) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(DescribeCronOutput {
                    description: description.into(),
                    is_valid_cron: valid,
                }),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn err(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl AiPort for ScriptedAi {
        async fn generate_cron(
            &self,
            _input: &GenerateCronInput,
        ) -> Result<GenerateCronOutput, DomainError> {
            unreachable!("describe flow never generates")
        }

        async fn describe_cron(
            &self,
            input: &DescribeCronInput,
        ) -> Result<DescribeCronOutput, DomainError> {
            self.seen.lock().unwrap().push(input.cron_expression.clone());
            self.reply.clone().map_err(DomainError::Ai)
        }
    }

    fn service(ai: Arc<ScriptedAi>, max_requests: u32) -> DescriptionTranslationService {
        let limiter = Arc::new(InMemoryRateLimiter::new(
            max_requests,
            Duration::from_secs(60),
            "cron-gen",
        ));
        let guard = Arc::new(RequestGuard::new(limiter, "anonymous".into(), false));
        DescriptionTranslationService::new(ai, guard)
    }

    #[tokio::test]
    async fn test_five_fields_reach_the_boundary() {
        let ai = ScriptedAi::ok("At 08:00 on Monday.", true);
        let svc = service(ai.clone(), 5);
        let res = svc.describe(" 0 8 * * 1 ", None).await;
        assert_eq!(
            res,
            TranslationResult::Description {
                description: "At 08:00 on Monday.".into()
            }
        );
        assert_eq!(ai.seen(), vec!["0 8 * * 1".to_string()]);
    }

    #[tokio::test]
    async fn test_four_fields_short_circuit() {
        let ai = ScriptedAi::ok("unused", true);
        let svc = service(ai.clone(), 5);
        let res = svc.describe("0 8 * *", None).await;
        assert_eq!(res.error(), Some(CRON_FIELD_COUNT_MSG));
        assert!(ai.seen().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let ai = ScriptedAi::ok("unused", true);
        let svc = service(ai.clone(), 5);
        assert_eq!(svc.describe("  ", None).await.error(), Some(CRON_EMPTY_MSG));
        assert!(ai.seen().is_empty());
    }

    #[tokio::test]
    async fn test_sixth_request_limited_regardless_of_validity() {
        let ai = ScriptedAi::ok("Every day at midnight.", true);
        let svc = service(ai.clone(), 5);
        for _ in 0..5 {
            assert!(svc.describe("0 0 * * *", Some("1.2.3.4")).await.is_success());
        }
        assert_eq!(
            svc.describe("0 8 * *", Some("1.2.3.4")).await.error(),
            Some(RATE_LIMITED_MSG)
        );
        assert_eq!(
            svc.describe("  ", Some("1.2.3.4")).await.error(),
            Some(RATE_LIMITED_MSG)
        );
        assert_eq!(ai.seen().len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_input_spends_a_permit() {
        let ai = ScriptedAi::ok("Every minute.", true);
        let svc = service(ai.clone(), 1);
        assert_eq!(
            svc.describe("a b c", None).await.error(),
            Some(CRON_FIELD_COUNT_MSG)
        );
        assert_eq!(
            svc.describe("* * * * *", None).await.error(),
            Some(RATE_LIMITED_MSG)
        );
        assert!(ai.seen().is_empty());
    }

    #[tokio::test]
    async fn test_boundary_rejects_expression() {
        let svc = service(ScriptedAi::ok("", false), 5);
        let res = svc.describe("99 99 99 99 99", None).await;
        assert_eq!(
            res.error(),
            Some("The AI did not recognize this as a valid CRON schedule.")
        );
    }

    #[tokio::test]
    async fn test_valid_flag_without_description() {
        let svc = service(ScriptedAi::ok(" ", true), 5);
        let res = svc.describe("0 0 * * *", None).await;
        assert_eq!(
            res.error(),
            Some("The AI did not return a description. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_unknown_upstream_error_is_generic() {
        let svc = service(ScriptedAi::err("connection reset by peer"), 5);
        let res = svc.describe("0 0 * * *", None).await;
        assert_eq!(
            res.error(),
            Some("An error occurred while describing the CRON expression.")
        );
    }
}
