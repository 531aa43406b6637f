//! cronscribe: CRON expressions from plain language and back, via an LLM. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
