//! Runtime configuration for file locations and log level.
//!
//! # Invariants
//! - Every data file lives directly under `data_dir`.
//! - `from_env` always yields an absolute `data_dir`, which the logger
//!   requires for `log_dir()`.

use crate::logging::default_log_level;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const DEFAULT_LESSON_DB_FILE: &str = "lesson_plan.sqlite3";

pub const DATA_DIR_ENV: &str = "PLANNER_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "PLANNER_LOG_LEVEL";

const FALLBACK_DATA_DIR: &str = "planner-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub data_dir: PathBuf,
    pub assignments_file: String,
    pub lesson_db_file: String,
    pub log_level: String,
}

impl PlannerConfig {
    /// Default file names under `data_dir`, build-mode log level.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            assignments_file: DEFAULT_ASSIGNMENTS_FILE.to_string(),
            lesson_db_file: DEFAULT_LESSON_DB_FILE.to_string(),
            log_level: default_log_level().to_string(),
        }
    }

    /// Reads `PLANNER_DATA_DIR` and `PLANNER_LOG_LEVEL`.
    ///
    /// Falls back to `planner-data` and the build-mode level. A relative
    /// data dir is resolved against the current directory, so `log_dir()`
    /// is always absolute.
    ///
    /// # Errors
    /// - The current directory cannot be determined.
    pub fn from_env() -> io::Result<Self> {
        let base = std::env::current_dir()?;
        Ok(Self::from_lookup(&base, |key| std::env::var(key).ok()))
    }

    fn from_lookup(base: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let data_dir = non_blank(DATA_DIR_ENV).unwrap_or_else(|| FALLBACK_DATA_DIR.to_string());
        // `join` keeps an absolute argument as is.
        let mut config = Self::new(base.join(data_dir.trim()));
        if let Some(level) = non_blank(LOG_LEVEL_ENV) {
            config.log_level = level.trim().to_string();
        }
        config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn assignments_path(&self) -> PathBuf {
        self.data_dir.join(&self.assignments_file)
    }

    pub fn lesson_db_path(&self) -> PathBuf {
        self.data_dir.join(&self.lesson_db_file)
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::{PlannerConfig, DATA_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::normalize_log_dir;
    use std::path::{Path, PathBuf};

    #[test]
    fn new_places_files_under_data_dir() {
        let config = PlannerConfig::new("/srv/planner");
        assert_eq!(
            config.assignments_path(),
            PathBuf::from("/srv/planner/assignments.csv")
        );
        assert_eq!(
            config.lesson_db_path(),
            PathBuf::from("/srv/planner/lesson_plan.sqlite3")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/srv/planner/logs"));
    }

    #[test]
    fn lookup_overrides_and_ignores_blank_values() {
        let base = Path::new("/home/mia");
        let config = PlannerConfig::from_lookup(base, |key| match key {
            DATA_DIR_ENV => Some("/tmp/alt".to_string()),
            LOG_LEVEL_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/tmp/alt"));
        assert_eq!(config.log_level, PlannerConfig::new("/x").log_level);

        let fallback = PlannerConfig::from_lookup(base, |_| None);
        assert_eq!(fallback.data_dir, PathBuf::from("/home/mia/planner-data"));

        let relative = PlannerConfig::from_lookup(base, |key| {
            (key == DATA_DIR_ENV).then(|| " school/data ".to_string())
        });
        assert_eq!(relative.data_dir, PathBuf::from("/home/mia/school/data"));
    }

    #[test]
    fn default_log_dir_is_accepted_by_the_logger() {
        let config = PlannerConfig::from_env().unwrap();
        assert!(config.log_dir().is_absolute());
        assert_eq!(
            normalize_log_dir(&config.log_dir()).unwrap(),
            config.log_dir()
        );

        let fallback = PlannerConfig::from_lookup(Path::new("/home/mia"), |_| None);
        assert!(normalize_log_dir(&fallback.log_dir()).is_ok());
    }
}
