//! Validated title values for columns and tasks.

use super::BoardDomainError;
use std::fmt;

/// Character limit the remote API applies to column titles.
pub const MAX_COLUMN_TITLE_CHARS: usize = 100;

/// Character limit the remote API applies to task titles.
pub const MAX_TASK_TITLE_CHARS: usize = 200;

/// A trimmed, non-empty title bounded by a character limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    /// Creates a validated title.
    ///
    /// Surrounding whitespace is removed before the checks run, and the
    /// limit counts characters rather than bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] for blank input and
    /// [`BoardDomainError::TitleTooLong`] when the trimmed value has more
    /// than `max_chars` characters.
    pub fn parse(raw: &str, max_chars: usize) -> Result<Self, BoardDomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        let actual = trimmed.chars().count();
        if actual > max_chars {
            return Err(BoardDomainError::TitleTooLong {
                max: max_chars,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the title and returns the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
