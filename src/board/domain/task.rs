//! Task card records as returned by the remote gateway.

use super::{ColumnId, Position, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled, optionally described unit of work owned by one column.
///
/// Tasks are canonical server records: the store never invents one, it only
/// holds copies returned by the gateway and adjusts their rank locally to
/// mirror server-side normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    column_id: ColumnId,
    #[serde(rename = "task_order")]
    order: Position,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Owning column.
    pub column_id: ColumnId,
    /// Rank within the owning column.
    pub order: Position,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            column_id: data.column_id,
            order: data.order,
            created_at: data.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning column identifier.
    #[must_use]
    pub const fn column_id(&self) -> ColumnId {
        self.column_id
    }

    /// Returns the rank within the owning column.
    #[must_use]
    pub const fn order(&self) -> Position {
        self.order
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub(crate) const fn set_placement(&mut self, column_id: ColumnId, order: Position) {
        self.column_id = column_id;
        self.order = order;
    }
}
