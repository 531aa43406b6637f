//! Rate limiter adapters. Implement RateLimiterPort.
//!
//! In-memory for single-instance use and tests; Upstash Redis for shared counters.

pub mod memory;
pub mod upstash;

pub use memory::InMemoryRateLimiter;
pub use upstash::UpstashRateLimiter;
