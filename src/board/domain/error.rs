//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The trimmed title exceeds the configured character limit.
    #[error("title has {actual} characters, exceeds limit of {max}")]
    TitleTooLong {
        /// The maximum allowed number of characters.
        max: usize,
        /// The actual number of characters.
        actual: usize,
    },

    /// A rank value of zero was supplied.
    #[error("invalid position {0}, expected a positive integer")]
    InvalidPosition(u32),
}
