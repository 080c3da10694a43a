//! Configuration for the board store.

use crate::board::domain::{MAX_COLUMN_TITLE_CHARS, MAX_TASK_TITLE_CHARS};
use serde::Deserialize;

/// Tunables applied by [`super::BoardStore`] before any gateway call.
///
/// Deserialises from partial JSON; missing keys take their defaults.
///
/// # Examples
///
/// ```
/// use trellis::board::services::BoardStoreConfig;
///
/// let config = BoardStoreConfig::default();
/// assert!(config.guard_concurrent_moves);
///
/// let parsed: BoardStoreConfig =
///     serde_json::from_str(r#"{ "max_task_title_chars": 80 }"#).expect("valid config");
/// assert_eq!(parsed.max_task_title_chars, 80);
/// assert_eq!(parsed.max_column_title_chars, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardStoreConfig {
    /// Maximum column title length in characters.
    pub max_column_title_chars: usize,
    /// Maximum task title length in characters.
    pub max_task_title_chars: usize,
    /// Reject a move while another move of the same task is pending.
    pub guard_concurrent_moves: bool,
}

impl Default for BoardStoreConfig {
    fn default() -> Self {
        Self {
            max_column_title_chars: MAX_COLUMN_TITLE_CHARS,
            max_task_title_chars: MAX_TASK_TITLE_CHARS,
            guard_concurrent_moves: true,
        }
    }
}

impl BoardStoreConfig {
    /// Creates a configuration that lets moves of the same task overlap.
    ///
    /// Overlapping moves may be applied out of order by the server; the
    /// store then relies on a later `load_all` to converge.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            guard_concurrent_moves: false,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
