//! Core logic for the weekly lesson planner and homework tracker.
//! UI layers call into this crate; it owns layout math and persistence.

pub mod config;
pub mod db;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::PlannerConfig;
pub use layout::allocator::{allocate, allocate_with, LayoutError, RemainderPolicy, Span, Weighted};
pub use layout::week::{Block, DayColumn, DayConfig, PlacedBlock, WeekGrid};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::{
    check_due_date_input, parse_due_date, Assignment, AssignmentValidationError, DueDateError,
};
pub use model::lesson::Lesson;
pub use model::tenant::{TenantId, TenantIdError};
pub use repo::lesson_plan_repo::{
    LessonMap, LessonPlanRepository, RepoError, RepoResult, SqliteLessonPlanRepository,
};
pub use service::week_plan_service::{WeekPlan, WeekPlanError, WeekPlanService};
pub use store::assignment_store::{
    AssignmentOrder, AssignmentStore, StoreError, StoreResult, StoredLine, TenantSession,
};
pub use store::codec::RecordParseError;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
