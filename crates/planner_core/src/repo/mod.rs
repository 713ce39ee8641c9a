//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Repository reads reject rows they cannot decode instead of masking them.

pub mod lesson_plan_repo;
