//! Infrastructure adapters. Implement outbound ports.
//!
//! LLM, rate limiter backends, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod ratelimit;
pub mod ui;
