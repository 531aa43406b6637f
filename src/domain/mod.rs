//! Core domain layer. No external I/O dependencies.
//!
//! Entities, input rules and the CRON structure check live here. Dependencies flow inward.

pub mod cron;
pub mod entities;
pub mod errors;
pub mod identity;
pub mod request;

pub use cron::{CronExpression, CronSyntaxError, is_structurally_valid_cron};
pub use entities::{
    DescribeCronInput, DescribeCronOutput, GenerateCronInput, GenerateCronOutput,
    RateLimitDecision, TranslationResult,
};
pub use errors::{DomainError, Flow, MalformedOutput, TranslationError};
pub use identity::ClientIdentity;
pub use request::ScheduleDescription;
