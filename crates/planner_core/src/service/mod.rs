//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into caller-facing operations.
//! - Keep UI layers decoupled from storage details.

pub mod week_plan_service;
