//! Board columns and their ordered task sequences.

use super::{ColumnId, Position, Task, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, ordered container of tasks.
///
/// The order of `tasks` is the display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: ColumnId,
    title: String,
    #[serde(rename = "column_order")]
    order: Position,
    created_at: DateTime<Utc>,
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Persisted title.
    pub title: String,
    /// Rank of the column on the board.
    pub order: Position,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Tasks in display order.
    pub tasks: Vec<Task>,
}

impl Column {
    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            order: data.order,
            created_at: data.created_at,
            tasks: data.tasks,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the column title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the rank of the column on the board.
    #[must_use]
    pub const fn order(&self) -> Position {
        self.order
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task identifiers in display order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(Task::id).collect()
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the display index of a task, if the column holds it.
    #[must_use]
    pub fn index_of(&self, task_id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == task_id)
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Removes every copy of the task, returning the first one found.
    pub(crate) fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let index = self.index_of(task_id)?;
        let removed = self.tasks.remove(index);
        self.tasks.retain(|task| task.id() != task_id);
        Some(removed)
    }

    /// Inserts a task at `index`, clamped to the end of the sequence.
    pub(crate) fn insert_task(&mut self, index: usize, task: Task) {
        let slot = index.min(self.tasks.len());
        self.tasks.insert(slot, task);
    }

    pub(crate) fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Replaces a task in place, keeping its display index.
    ///
    /// Returns `false` when the column does not hold the task.
    pub(crate) fn replace_task(&mut self, task: Task) -> bool {
        let Some(slot) = self.tasks.iter_mut().find(|held| held.id() == task.id()) else {
            return false;
        };
        *slot = task;
        true
    }

    /// Rewrites task ranks to the contiguous sequence `1..=n`.
    pub(crate) fn rerank(&mut self) {
        let column_id = self.id;
        for (index, task) in self.tasks.iter_mut().enumerate() {
            task.set_placement(column_id, Position::from_index(index));
        }
    }
}
