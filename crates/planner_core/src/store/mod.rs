//! Flat-file persistence shared by every tenant.
//!
//! # Responsibility
//! - Encode and decode assignment lines in the shared CSV file.
//! - Rewrite one tenant's lines while leaving every other tenant untouched.
//!
//! # Invariants
//! - Tenant ownership is decided by an exact leading-field match.
//! - Malformed lines are skipped and logged, never fatal to a load.
//! - I/O failures abort the enclosing operation.

pub mod assignment_store;
pub mod codec;
