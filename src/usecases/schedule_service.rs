//! Schedule translation: natural-language description to CRON expression.
//!
//! Flow: reject blank input -> rate limit -> validate length -> AI boundary -> re-validate output.
//! Every failure becomes a single user-facing message; raw errors stay in the logs.

use crate::domain::request::DESCRIPTION_EMPTY_MSG;
use crate::domain::{
    ClientIdentity, Flow, GenerateCronInput, MalformedOutput, ScheduleDescription,
    TranslationError, TranslationResult, is_structurally_valid_cron,
};
use crate::ports::AiPort;
use crate::usecases::request_guard::RequestGuard;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct ScheduleTranslationService {
    ai: Arc<dyn AiPort>,
    guard: Arc<RequestGuard>,
}

impl ScheduleTranslationService {
    pub fn new(ai: Arc<dyn AiPort>, guard: Arc<RequestGuard>) -> Self {
        Self { ai, guard }
    }

    /// Translate `description` into a CRON expression for the caller at `forwarded_for`.
    ///
    /// Never fails: errors are returned as `TranslationResult::Failure`.
    pub async fn generate(
        &self,
        description: &str,
        forwarded_for: Option<&str>,
    ) -> TranslationResult {
        let identity = self.guard.identity(forwarded_for);
        match self.try_generate(description, &identity).await {
            Ok(cron_expression) => TranslationResult::CronExpression { cron_expression },
            Err(e) => TranslationResult::failure(e.user_message()),
        }
    }

    async fn try_generate(
        &self,
        description: &str,
        identity: &ClientIdentity,
    ) -> Result<String, TranslationError> {
        // Blank input never consults the limiter.
        if description.trim().is_empty() {
            return Err(TranslationError::InputValidation(vec![
                DESCRIPTION_EMPTY_MSG.to_string(),
            ]));
        }

        self.guard.admit(identity).await?;

        let description =
            ScheduleDescription::parse(description).map_err(TranslationError::InputValidation)?;

        let input = GenerateCronInput {
            description: description.into_inner(),
        };
        let output = self.ai.generate_cron(&input).await.map_err(|e| {
            error!(identity = %identity, error = %e, "CRON generation failed");
            TranslationError::from_upstream(Flow::Generate, &e)
        })?;

        if !output.is_valid_schedule {
            info!(identity = %identity, "AI found no schedule in description");
            return Err(TranslationError::UpstreamInvalidResult(Flow::Generate));
        }

        let expr = output.cron_expression.trim();
        if expr.is_empty() {
            warn!(identity = %identity, "AI flagged schedule valid but returned no expression");
            return Err(TranslationError::UpstreamMalformedOutput {
                flow: Flow::Generate,
                detail: MalformedOutput::MissingPayload,
            });
        }
        if !is_structurally_valid_cron(expr) {
            warn!(identity = %identity, cron = %expr, "AI generated an invalid CRON format");
            return Err(TranslationError::UpstreamMalformedOutput {
                flow: Flow::Generate,
                detail: MalformedOutput::BadFieldCount,
            });
        }

        info!(identity = %identity, cron = %expr, "CRON expression generated");
        Ok(expr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ratelimit::InMemoryRateLimiter;
    use crate::domain::errors::{QUOTA_MSG, RATE_LIMITED_MSG, TIMEOUT_MSG};
    use crate::domain::request::DESCRIPTION_TOO_LONG_MSG;
    use crate::domain::{
        DescribeCronInput, DescribeCronOutput, DomainError, GenerateCronOutput, RateLimitDecision,
    };
    use crate::ports::RateLimiterPort;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Returns one canned generation reply and counts calls.
    struct ScriptedAi {
        reply: Result<GenerateCronOutput, String>,
        calls: AtomicUsize,
    }

    impl ScriptedAi {
        fn ok(cron: &str, valid: bool) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(GenerateCronOutput {
                    cron_expression: cron.into(),
                    is_valid_schedule: valid,
                }),
                calls: AtomicUsize::new(0),
            })
        }

        fn err(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl AiPort for ScriptedAi {
        async fn generate_cron(
            &self,
            _input: &GenerateCronInput,
        ) -> Result<GenerateCronOutput, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(DomainError::Ai)
        }

        async fn describe_cron(
            &self,
            _input: &DescribeCronInput,
        ) -> Result<DescribeCronOutput, DomainError> {
            unreachable!("generate flow never describes")
        }
    }

    /// Always allows; counts consultations.
    #[derive(Default)]
    struct CountingLimiter {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RateLimiterPort for CountingLimiter {
        async fn limit(&self, identity: &str) -> Result<RateLimitDecision, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RateLimitDecision {
                allowed: true,
                identity: identity.to_string(),
                remaining: 5,
            })
        }
    }

    fn service(
        ai: Arc<ScriptedAi>,
        limiter: Arc<dyn RateLimiterPort>,
    ) -> ScheduleTranslationService {
        let guard = Arc::new(RequestGuard::new(limiter, "anonymous".into(), false));
        ScheduleTranslationService::new(ai, guard)
    }

    #[tokio::test]
    async fn test_success_returns_trimmed_expression() {
        let ai = ScriptedAi::ok(" 0 0 * * * ", true);
        let svc = service(ai.clone(), Arc::new(CountingLimiter::default()));
        let res = svc.generate("every day at midnight", None).await;
        assert_eq!(
            res,
            TranslationResult::CronExpression {
                cron_expression: "0 0 * * *".into()
            }
        );
        assert_eq!(ai.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_and_blank_skip_limiter_and_ai() {
        let ai = ScriptedAi::ok("0 0 * * *", true);
        let limiter = Arc::new(CountingLimiter::default());
        let svc = service(ai.clone(), limiter.clone());

        for input in ["", " "] {
            let res = svc.generate(input, None).await;
            assert_eq!(res.error(), Some(DESCRIPTION_EMPTY_MSG));
        }
        assert_eq!(limiter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_over_length_rejected_after_limiter() {
        let ai = ScriptedAi::ok("0 0 * * *", true);
        let limiter = Arc::new(CountingLimiter::default());
        let svc = service(ai.clone(), limiter.clone());
        let res = svc.generate(&"a".repeat(251), None).await;
        assert_eq!(res.error(), Some(DESCRIPTION_TOO_LONG_MSG));
        assert_eq!(limiter.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ai.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sixth_request_is_rate_limited() {
        let ai = ScriptedAi::ok("0 0 * * *", true);
        let limiter = Arc::new(InMemoryRateLimiter::new(
            5,
            Duration::from_secs(60),
            "cron-gen",
        ));
        let svc = service(ai.clone(), limiter);

        for _ in 0..5 {
            assert!(svc.generate("daily", Some("203.0.113.7")).await.is_success());
        }
        let sixth = svc.generate("daily", Some("203.0.113.7")).await;
        assert_eq!(sixth.error(), Some(RATE_LIMITED_MSG));
        assert_eq!(ai.calls.load(Ordering::SeqCst), 5);

        // Another caller is unaffected.
        assert!(svc.generate("daily", Some("198.51.100.2")).await.is_success());
    }

    #[tokio::test]
    async fn test_sixth_over_length_request_is_rate_limited() {
        let ai = ScriptedAi::ok("0 0 * * *", true);
        let limiter = Arc::new(InMemoryRateLimiter::new(
            5,
            Duration::from_secs(60),
            "cron-gen",
        ));
        let svc = service(ai.clone(), limiter);

        for _ in 0..5 {
            assert!(svc.generate("daily", Some("1.2.3.4")).await.is_success());
        }
        let sixth = svc.generate(&"a".repeat(251), Some("1.2.3.4")).await;
        assert_eq!(sixth.error(), Some(RATE_LIMITED_MSG));
    }

    #[tokio::test]
    async fn test_no_schedule_detected() {
        let svc = service(
            ScriptedAi::ok("", false),
            Arc::new(CountingLimiter::default()),
        );
        let res = svc.generate("make me a sandwich", None).await;
        assert!(!res.is_success());
        assert!(res.error().unwrap().starts_with("Could not generate a CRON expression"));
    }

    #[tokio::test]
    async fn test_valid_flag_without_expression() {
        let svc = service(ScriptedAi::ok("  ", true), Arc::new(CountingLimiter::default()));
        let res = svc.generate("daily", None).await;
        assert_eq!(
            res.error(),
            Some("The AI did not return a CRON expression. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_malformed_expression_caught_locally() {
        let svc = service(ScriptedAi::ok("a b c", true), Arc::new(CountingLimiter::default()));
        let res = svc.generate("daily", None).await;
        assert_eq!(
            res.error(),
            Some("The AI generated an invalid CRON format. Please try rephrasing your request.")
        );
    }

    #[tokio::test]
    async fn test_upstream_failures_are_classified() {
        let limiter: Arc<dyn RateLimiterPort> = Arc::new(CountingLimiter::default());

        let res = service(
            ScriptedAi::err("Deadline exceeded: operation timed out"),
            limiter.clone(),
        )
        .generate("daily", None)
        .await;
        assert_eq!(res.error(), Some(TIMEOUT_MSG));

        let res = service(ScriptedAi::err("API error 429: insufficient_quota"), limiter.clone())
            .generate("daily", None)
            .await;
        assert_eq!(res.error(), Some(QUOTA_MSG));

        let res = service(ScriptedAi::err("Failed to parse LLM JSON: missing field"), limiter)
            .generate("daily", None)
            .await;
        assert_eq!(
            res.error(),
            Some("An error occurred while generating the CRON expression.")
        );
    }
}
