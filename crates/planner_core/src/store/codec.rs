//! Line codec for the shared assignments CSV file.
//!
//! # Responsibility
//! - Serialize assignments into `tenant,lesson,date,completed,notes` lines.
//! - Parse stored lines back, tolerating rows written by older builds.
//!
//! # Invariants
//! - Only the notes field can hold delimiters, quotes or line breaks; it is
//!   quoted with doubled inner quotes whenever it does.
//! - Fields that need no quoting are written bare, so plain rows keep the
//!   legacy byte layout.
//! - Dates are written as ISO `YYYY-MM-DD`.

use crate::model::assignment::{Assignment, DATE_INPUT_FORMAT};
use crate::model::lesson::Lesson;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed first line of the shared file.
pub const HEADER: &str = "username,lesson,date,completed,notes";

pub const DELIMITER: char = ',';

const QUOTE: char = '"';
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";
const ASSIGNMENT_FIELD_COUNT: usize = 4;

/// Per-line decode failure. Never fatal to a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    MissingTenant,
    FieldCount { expected: usize, found: usize },
    Lesson(String),
    Date(String),
    Completed(String),
    UnterminatedQuote,
}

impl Display for RecordParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTenant => write!(f, "line has no tenant field"),
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::Lesson(value) => write!(f, "unknown lesson `{value}`"),
            Self::Date(value) => write!(f, "invalid date `{value}`"),
            Self::Completed(value) => write!(f, "invalid completed flag `{value}`"),
            Self::UnterminatedQuote => write!(f, "unterminated quoted field"),
        }
    }
}

impl Error for RecordParseError {}

/// Whether `line` is the schema header (`username,...`, any case).
pub fn is_header(line: &str) -> bool {
    line.trim().to_ascii_lowercase().starts_with("username,")
}

/// Splits a stored line into `(tenant, remainder)` at the first delimiter.
///
/// The remainder is returned untouched so other tenants' rows can be
/// re-emitted byte for byte.
pub fn split_tenant(line: &str) -> Option<(&str, &str)> {
    line.split_once(DELIMITER)
}

/// Quotes a field when it contains a delimiter, quote or line break.
pub fn quote_field(value: &str) -> String {
    if value.contains([DELIMITER, QUOTE, '\n', '\r']) {
        format!("{QUOTE}{}{QUOTE}", value.replace(QUOTE, "\"\""))
    } else {
        value.to_string()
    }
}

/// Encodes the four assignment fields, without the tenant column.
pub fn encode_assignment(assignment: &Assignment) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
        assignment.lesson.key(),
        assignment.due_date.format(STORED_DATE_FORMAT),
        assignment.completed,
        quote_field(&assignment.notes)
    )
}

/// Encodes a full stored line for `tenant`.
pub fn encode_line(tenant: &str, assignment: &Assignment) -> String {
    format!("{tenant}{DELIMITER}{}", encode_assignment(assignment))
}

/// Decodes the four assignment fields that follow the tenant column.
///
/// Accepts lesson display names and `dd.mm.yyyy` dates from older rows.
pub fn decode_assignment(fields: &str) -> Result<Assignment, RecordParseError> {
    let parts = split_fields(fields, ASSIGNMENT_FIELD_COUNT)?;
    if parts.len() != ASSIGNMENT_FIELD_COUNT {
        return Err(RecordParseError::FieldCount {
            expected: ASSIGNMENT_FIELD_COUNT,
            found: parts.len(),
        });
    }

    let lesson =
        Lesson::parse(&parts[0]).ok_or_else(|| RecordParseError::Lesson(parts[0].clone()))?;
    let due_date = parse_stored_date(&parts[1])?;
    let completed = match parts[2].trim().to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => return Err(RecordParseError::Completed(parts[2].clone())),
    };

    Ok(Assignment {
        lesson,
        due_date,
        completed,
        notes: parts[3].clone(),
    })
}

/// Decodes a full stored line into `(tenant, assignment)`.
pub fn decode_line(line: &str) -> Result<(&str, Assignment), RecordParseError> {
    let (tenant, rest) = split_tenant(line).ok_or(RecordParseError::MissingTenant)?;
    Ok((tenant, decode_assignment(rest)?))
}

/// Whether `line` stops inside a quoted field, meaning the record continues
/// on the next physical line.
pub fn continues_on_next_line(line: &str) -> bool {
    matches!(decode_line(line), Err(RecordParseError::UnterminatedQuote))
}

fn parse_stored_date(value: &str) -> Result<NaiveDate, RecordParseError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, STORED_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT))
        .map_err(|_| RecordParseError::Date(value.to_string()))
}

/// Splits at most `limit` fields; the last field takes the rest of the text.
///
/// A bare last field keeps any delimiters it contains, which is how rows
/// with unquoted notes from older builds still load.
fn split_fields(text: &str, limit: usize) -> Result<Vec<String>, RecordParseError> {
    let mut fields = Vec::with_capacity(limit);
    let mut rest = text;

    loop {
        let is_last = fields.len() + 1 == limit;
        if rest.starts_with(QUOTE) {
            let (value, consumed) = read_quoted(rest)?;
            fields.push(value);
            rest = &rest[consumed..];
            match rest.strip_prefix(DELIMITER) {
                Some(next) if !is_last => rest = next,
                None if rest.is_empty() => return Ok(fields),
                // Trailing text after a closing quote: count the extra field.
                _ => {
                    fields.push(rest.to_string());
                    return Ok(fields);
                }
            }
        } else if is_last {
            fields.push(rest.to_string());
            return Ok(fields);
        } else {
            match rest.split_once(DELIMITER) {
                Some((value, next)) => {
                    fields.push(value.to_string());
                    rest = next;
                }
                None => {
                    fields.push(rest.to_string());
                    return Ok(fields);
                }
            }
        }
    }
}

/// Reads one quoted field from the start of `text`.
///
/// Returns the unescaped value and the number of bytes consumed, including
/// both quotes.
fn read_quoted(text: &str) -> Result<(String, usize), RecordParseError> {
    let mut value = String::new();
    let mut chars = text.char_indices().skip(1).peekable();

    while let Some((index, ch)) = chars.next() {
        if ch != QUOTE {
            value.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, QUOTE))) {
            value.push(QUOTE);
            chars.next();
            continue;
        }
        return Ok((value, index + QUOTE.len_utf8()));
    }

    Err(RecordParseError::UnterminatedQuote)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_assignment, decode_line, encode_line, is_header, quote_field, split_tenant,
        RecordParseError, HEADER,
    };
    use crate::model::assignment::Assignment;
    use crate::model::lesson::Lesson;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn header_detection_ignores_case_and_whitespace() {
        assert!(is_header(HEADER));
        assert!(is_header("  USERNAME,Lesson,Date "));
        assert!(!is_header("alex,math,2026-01-01,false,read"));
    }

    #[test]
    fn split_tenant_keeps_remainder_intact() {
        assert_eq!(
            split_tenant("alexander,math,2026-01-01,false,\"a, b\""),
            Some(("alexander", "math,2026-01-01,false,\"a, b\""))
        );
        assert_eq!(split_tenant("no-delimiter"), None);
    }

    #[test]
    fn plain_rows_are_written_bare() {
        let assignment = Assignment::new(Lesson::Math, date(2026, 11, 3), false, "page 12");
        assert_eq!(
            encode_line("alex", &assignment),
            "alex,math,2026-11-03,false,page 12"
        );
    }

    #[test]
    fn notes_with_delimiters_and_quotes_survive() {
        let notes = "read \"Faust\", act 1,\nthen summarize";
        let assignment = Assignment::new(Lesson::German, date(2026, 12, 1), true, notes);
        let line = encode_line("mia", &assignment);
        assert!(line.ends_with("\"read \"\"Faust\"\", act 1,\nthen summarize\""));

        let (tenant, decoded) = decode_line(&line).unwrap();
        assert_eq!(tenant, "mia");
        assert_eq!(decoded, assignment);
    }

    #[test]
    fn legacy_rows_with_display_names_and_unquoted_commas_load() {
        let decoded = decode_assignment("Computer Science,05.01.2027,TRUE,arrays, loops").unwrap();
        assert_eq!(decoded.lesson, Lesson::ComputerScience);
        assert_eq!(decoded.due_date, date(2027, 1, 5));
        assert!(decoded.completed);
        assert_eq!(decoded.notes, "arrays, loops");
    }

    #[test]
    fn malformed_rows_report_the_failing_field() {
        assert_eq!(
            decode_assignment("math,2026-01-01").unwrap_err(),
            RecordParseError::FieldCount {
                expected: 4,
                found: 2
            }
        );
        assert_eq!(
            decode_assignment("alchemy,2026-01-01,false,x").unwrap_err(),
            RecordParseError::Lesson("alchemy".to_string())
        );
        assert_eq!(
            decode_assignment("math,someday,false,x").unwrap_err(),
            RecordParseError::Date("someday".to_string())
        );
        assert_eq!(
            decode_assignment("math,2026-01-01,maybe,x").unwrap_err(),
            RecordParseError::Completed("maybe".to_string())
        );
        assert_eq!(
            decode_assignment("math,2026-01-01,false,\"open").unwrap_err(),
            RecordParseError::UnterminatedQuote
        );
    }

    #[test]
    fn quote_field_leaves_safe_values_alone() {
        assert_eq!(quote_field("plain text"), "plain text");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
