//! Application use cases. Orchestrate domain logic via ports.

pub mod description_service;
pub mod request_guard;
pub mod schedule_service;

pub use description_service::DescriptionTranslationService;
pub use request_guard::RequestGuard;
pub use schedule_service::ScheduleTranslationService;
