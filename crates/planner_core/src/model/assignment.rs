//! Homework assignment record.
//!
//! # Responsibility
//! - Define the persisted homework item.
//! - Provide the validity predicate used by every store write path.
//! - Parse user-entered due dates.
//!
//! # Invariants
//! - A valid assignment has non-blank notes that are not the `Notes...`
//!   input placeholder (any case).
//! - A valid assignment has a real lesson, not the `+` placeholder.

use crate::model::lesson::Lesson;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder text shown in an empty notes field.
pub const NOTES_PLACEHOLDER: &str = "Notes...";

/// Date pattern used by input fields and legacy rows (`31.12.2026`).
pub const DATE_INPUT_FORMAT: &str = "%d.%m.%Y";

/// Reasons an assignment is refused by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentValidationError {
    BlankNotes,
    PlaceholderNotes,
    PlaceholderLesson,
}

impl Display for AssignmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankNotes => write!(f, "notes must not be blank"),
            Self::PlaceholderNotes => {
                write!(f, "notes must not be the `{NOTES_PLACEHOLDER}` placeholder")
            }
            Self::PlaceholderLesson => write!(f, "a lesson must be selected"),
        }
    }
}

impl Error for AssignmentValidationError {}

/// One homework item owned by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub lesson: Lesson,
    pub due_date: NaiveDate,
    pub completed: bool,
    /// Free text; may contain delimiters and quotes.
    pub notes: String,
}

impl Assignment {
    pub fn new(
        lesson: Lesson,
        due_date: NaiveDate,
        completed: bool,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            lesson,
            due_date,
            completed,
            notes: notes.into(),
        }
    }

    /// Checks the persistence validity rules.
    pub fn validate(&self) -> Result<(), AssignmentValidationError> {
        if self.notes.trim().is_empty() {
            return Err(AssignmentValidationError::BlankNotes);
        }
        if self.notes.eq_ignore_ascii_case(NOTES_PLACEHOLDER) {
            return Err(AssignmentValidationError::PlaceholderNotes);
        }
        if self.lesson.is_placeholder() {
            return Err(AssignmentValidationError::PlaceholderLesson);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Errors for user-entered due dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDateError {
    /// Text does not follow [`DATE_INPUT_FORMAT`].
    InvalidFormat(String),
    /// Date lies in a year before the current one.
    PastYear { year: i32, current_year: i32 },
}

impl Display for DueDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(text) => {
                write!(f, "invalid date `{text}`; expected format dd.mm.yyyy")
            }
            Self::PastYear { year, current_year } => write!(
                f,
                "due year {year} is before the current year {current_year}"
            ),
        }
    }
}

impl Error for DueDateError {}

/// Parses a due date in [`DATE_INPUT_FORMAT`].
pub fn parse_due_date(text: &str) -> Result<NaiveDate, DueDateError> {
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| DueDateError::InvalidFormat(text.trim().to_string()))
}

/// Parses a due date entered for a new assignment.
///
/// Dates in earlier years than `today` are rejected; earlier days of the
/// current year are accepted.
pub fn check_due_date_input(text: &str, today: NaiveDate) -> Result<NaiveDate, DueDateError> {
    let date = parse_due_date(text)?;
    if date.year() < today.year() {
        return Err(DueDateError::PastYear {
            year: date.year(),
            current_year: today.year(),
        });
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::{check_due_date_input, parse_due_date, DueDateError};
    use chrono::NaiveDate;

    #[test]
    fn parse_due_date_uses_day_month_year() {
        assert_eq!(
            parse_due_date(" 03.11.2026 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 3).unwrap()
        );
        assert!(matches!(
            parse_due_date("2026-11-03"),
            Err(DueDateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn check_due_date_input_rejects_previous_years_only() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert!(check_due_date_input("01.01.2026", today).is_ok());
        assert_eq!(
            check_due_date_input("31.12.2025", today).unwrap_err(),
            DueDateError::PastYear {
                year: 2025,
                current_year: 2026
            }
        );
    }
}
