//! Tenant (user) identifier for shared-file storage.
//!
//! # Invariants
//! - Ids are trimmed and non-empty.
//! - Ids never contain the field delimiter, quotes or line breaks, so the
//!   leading field of a stored line can always be written bare.
//! - Matching is case-insensitive and exact; a prefix never matches.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation errors for tenant ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantIdError {
    Empty,
    ForbiddenCharacter(char),
}

impl Display for TenantIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "tenant id must not be blank"),
            Self::ForbiddenCharacter(ch) => {
                write!(f, "tenant id must not contain {ch:?}")
            }
        }
    }
}

impl Error for TenantIdError {}

/// Stable identifier of the user owning a set of records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TenantIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TenantIdError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|ch| matches!(ch, ',' | '"' | '\r' | '\n'))
        {
            return Err(TenantIdError::ForbiddenCharacter(ch));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares against a stored leading field.
    ///
    /// `"alex"` matches `"ALEX"` but never `"alexander"`.
    pub fn matches(&self, stored: &str) -> bool {
        stored
            .chars()
            .flat_map(char::to_lowercase)
            .eq(self.0.chars().flat_map(char::to_lowercase))
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = TenantIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}
