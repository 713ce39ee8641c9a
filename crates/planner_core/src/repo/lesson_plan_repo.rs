//! Per-tenant lesson plan persistence.
//!
//! # Responsibility
//! - Load and replace the slot -> lesson map of one tenant.
//!
//! # Invariants
//! - Tenants are matched case-insensitively (`COLLATE NOCASE`).
//! - A save replaces the tenant's whole map in one transaction and never
//!   touches other tenants' rows.
//! - `Lesson::None` is never stored; missing slots read back as empty.

use crate::db::DbError;
use crate::model::lesson::Lesson;
use crate::model::tenant::TenantId;
use log::info;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Slot number -> assigned lesson.
pub type LessonMap = BTreeMap<u32, Lesson>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted lesson data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for weekly lesson plans.
pub trait LessonPlanRepository {
    fn load_lessons(&self, tenant: &TenantId) -> RepoResult<LessonMap>;
    fn save_lessons(&self, tenant: &TenantId, lessons: &LessonMap) -> RepoResult<()>;
}

/// SQLite-backed lesson plan repository.
pub struct SqliteLessonPlanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLessonPlanRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LessonPlanRepository for SqliteLessonPlanRepository<'_> {
    fn load_lessons(&self, tenant: &TenantId) -> RepoResult<LessonMap> {
        let mut stmt = self.conn.prepare(
            "SELECT slot, lesson FROM lesson_slots WHERE username = ?1 ORDER BY slot ASC;",
        )?;
        let mut rows = stmt.query(params![tenant.as_str()])?;
        let mut lessons = LessonMap::new();

        while let Some(row) = rows.next()? {
            let slot: u32 = row.get("slot")?;
            let key: String = row.get("lesson")?;
            let lesson = Lesson::parse(&key).ok_or_else(|| {
                RepoError::InvalidData(format!("unknown lesson `{key}` in lesson_slots.lesson"))
            })?;
            lessons.insert(slot, lesson);
        }

        Ok(lessons)
    }

    fn save_lessons(&self, tenant: &TenantId, lessons: &LessonMap) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM lesson_slots WHERE username = ?1;",
            params![tenant.as_str()],
        )?;

        let mut stored = 0usize;
        {
            let mut insert = tx.prepare(
                "INSERT INTO lesson_slots (username, slot, lesson) VALUES (?1, ?2, ?3);",
            )?;
            for (slot, lesson) in lessons.iter().filter(|(_, lesson)| !lesson.is_placeholder()) {
                insert.execute(params![tenant.as_str(), slot, lesson.key()])?;
                stored += 1;
            }
        }
        tx.commit()?;

        info!("event=lesson_plan_save module=repo status=ok slots={stored}");
        Ok(())
    }
}
