//! SQLite bootstrap for the weekly lesson plan.
//!
//! # Responsibility
//! - Open and configure the lesson-plan database.
//! - Apply schema migrations before any plan data is touched.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer build is refused, not downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or migrating the lesson-plan database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused a statement or the file could not be opened.
    Sqlite(rusqlite::Error),
    /// Directory meant to hold the plan file could not be created.
    PlanDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stored plan schema comes from a newer build.
    PlanSchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "lesson plan database error: {err}"),
            Self::PlanDirectory { path, source } => write!(
                f,
                "cannot create lesson plan directory `{}`: {source}",
                path.display()
            ),
            Self::PlanSchemaTooNew { found, supported } => write!(
                f,
                "lesson plan schema v{found} was written by a newer build; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::PlanDirectory { source, .. } => Some(source),
            Self::PlanSchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
