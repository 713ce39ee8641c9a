//! Proportional layout for the weekly planner grid.
//!
//! # Responsibility
//! - Distribute vertical space among weighted blocks.
//! - Describe the week grid that feeds those blocks.

pub mod allocator;
pub mod week;
