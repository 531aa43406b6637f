//! Mock AI adapter for running without API calls.
//!
//! Deterministic: a small phrase table for generation and a field-pattern table for
//! description. Anything outside the tables is reported as not a valid schedule.

use crate::domain::{
    DescribeCronInput, DescribeCronOutput, DomainError, GenerateCronInput, GenerateCronOutput,
    is_structurally_valid_cron,
};
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// (phrase fragment, expression). First match wins, so longer phrases come first.
const PHRASES: &[(&str, &str)] = &[
    ("every 5 minutes", "*/5 * * * *"),
    ("every 15 minutes", "*/15 * * * *"),
    ("every minute", "* * * * *"),
    ("every hour", "0 * * * *"),
    ("hourly", "0 * * * *"),
    ("every weekday", "0 9 * * 1-5"),
    ("every monday", "0 9 * * 1"),
    ("1st and 15th", "0 0 1,15 * *"),
    ("midnight", "0 0 * * *"),
    ("daily at 3 am", "0 3 * * *"),
    ("every day", "0 0 * * *"),
    ("daily", "0 0 * * *"),
    ("weekly", "0 0 * * 0"),
    ("monthly", "0 0 1 * *"),
];

/// (expression, description) for the reverse direction.
const DESCRIPTIONS: &[(&str, &str)] = &[
    ("* * * * *", "Every minute."),
    ("*/5 * * * *", "Every 5 minutes."),
    ("*/15 * * * *", "Every 15 minutes."),
    ("0 * * * *", "At minute 0 of every hour."),
    ("0 0 * * *", "At 00:00 every day."),
    ("0 3 * * *", "At 03:00 every day."),
    ("0 9 * * 1-5", "At 09:00 on every day-of-week from Monday through Friday."),
    ("0 9 * * 1", "At 09:00 on Monday."),
    ("0 8 * * 1", "At 08:00 on Monday."),
    ("0 0 1,15 * *", "At 00:00 on day-of-month 1 and 15."),
    ("0 0 * * 0", "At 00:00 on Sunday."),
    ("0 0 1 * *", "At 00:00 on day-of-month 1."),
];

/// Mock AI adapter.
///
/// Returns predetermined responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    fn lookup_expression(description: &str) -> Option<&'static str> {
        let lower = description.to_lowercase();
        PHRASES
            .iter()
            .find(|(phrase, _)| lower.contains(phrase))
            .map(|(_, expr)| *expr)
    }

    fn lookup_description(expr: &str) -> String {
        let normalized = expr.split_whitespace().collect::<Vec<_>>().join(" ");
        DESCRIPTIONS
            .iter()
            .find(|(e, _)| *e == normalized)
            .map(|(_, d)| d.to_string())
            .unwrap_or_else(|| format!("[MOCK] Runs on the schedule \"{}\".", normalized))
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn generate_cron(
        &self,
        input: &GenerateCronInput,
    ) -> Result<GenerateCronOutput, DomainError> {
        info!(
            description_len = input.description.len(),
            "[MOCK] Simulating CRON generation"
        );
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(match Self::lookup_expression(&input.description) {
            Some(expr) => GenerateCronOutput {
                cron_expression: expr.to_string(),
                is_valid_schedule: true,
            },
            None => GenerateCronOutput {
                cron_expression: String::new(),
                is_valid_schedule: false,
            },
        })
    }

    async fn describe_cron(
        &self,
        input: &DescribeCronInput,
    ) -> Result<DescribeCronOutput, DomainError> {
        info!(cron = %input.cron_expression, "[MOCK] Simulating CRON description");
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if !is_structurally_valid_cron(&input.cron_expression) {
            return Ok(DescribeCronOutput {
                description: String::new(),
                is_valid_cron: false,
            });
        }
        Ok(DescribeCronOutput {
            description: Self::lookup_description(&input.cron_expression),
            is_valid_cron: true,
        })
    }
}
