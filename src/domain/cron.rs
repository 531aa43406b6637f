//! Structural CRON validation. Field count only: 5 (standard) or 6 (with seconds).
//!
//! Field content (ranges, steps, lists) is not checked here; the LLM boundary owns that.

use thiserror::Error;

/// Accepted field counts.
pub const MIN_FIELDS: usize = 5;
pub const MAX_FIELDS: usize = 6;

/// Number of whitespace-separated fields after trimming.
pub fn field_count(expr: &str) -> usize {
    expr.split_whitespace().count()
}

/// True iff `expr` has exactly 5 or 6 whitespace-separated fields.
pub fn is_structurally_valid_cron(expr: &str) -> bool {
    (MIN_FIELDS..=MAX_FIELDS).contains(&field_count(expr))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CronSyntaxError {
    #[error("CRON expression is empty")]
    Empty,

    #[error("expected 5 or 6 fields, found {0}")]
    FieldCount(usize),
}

/// A CRON expression that passed the structural check. Holds the trimmed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression(String);

impl CronExpression {
    pub fn parse(raw: &str) -> Result<Self, CronSyntaxError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CronSyntaxError::Empty);
        }
        let count = field_count(trimmed);
        if !(MIN_FIELDS..=MAX_FIELDS).contains(&count) {
            return Err(CronSyntaxError::FieldCount(count));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
