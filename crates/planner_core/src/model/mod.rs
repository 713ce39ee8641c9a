//! Domain model for lessons, homework assignments and tenants.
//!
//! # Responsibility
//! - Define the value types shared by storage, services and callers.
//! - Own the validity rules applied before anything is persisted.
//!
//! # Invariants
//! - Assignments are compared by value; there is no separate identity.
//! - `Lesson::None` is the empty-slot placeholder and never a valid category.

pub mod assignment;
pub mod lesson;
pub mod tenant;
