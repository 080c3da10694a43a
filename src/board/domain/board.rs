//! The board snapshot: ordered columns with their ordered tasks.

use super::{Column, ColumnId, Task, TaskId};
use serde::{Deserialize, Serialize};

/// Where a task currently sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation {
    /// Column holding the task.
    pub column_id: ColumnId,
    /// Zero-based display index inside that column.
    pub index: usize,
}

/// Ordered collection of columns, each with an ordered task sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Creates a board from columns in display order.
    #[must_use]
    pub const fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Returns the columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns `true` when the board has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::task_count).sum()
    }

    /// Finds a column by identifier.
    #[must_use]
    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == column_id)
    }

    /// Finds the first column holding the task and the task's index in it.
    #[must_use]
    pub fn locate_task(&self, task_id: TaskId) -> Option<TaskLocation> {
        self.columns.iter().find_map(|column| {
            column.index_of(task_id).map(|index| TaskLocation {
                column_id: column.id(),
                index,
            })
        })
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(Column::tasks)
            .find(|task| task.id() == task_id)
    }

    /// Returns the task identifiers of a column in display order.
    #[must_use]
    pub fn task_ids_in(&self, column_id: ColumnId) -> Option<Vec<TaskId>> {
        self.column(column_id).map(Column::task_ids)
    }

    pub(crate) fn column_mut(&mut self, column_id: ColumnId) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|column| column.id() == column_id)
    }

    pub(crate) fn push_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Removes the column and, with it, every task it holds.
    pub(crate) fn remove_column(&mut self, column_id: ColumnId) -> Option<Column> {
        let index = self
            .columns
            .iter()
            .position(|column| column.id() == column_id)?;
        Some(self.columns.remove(index))
    }

    /// Removes the task from every column.
    ///
    /// Returns the first copy found together with the column it came from.
    pub(crate) fn remove_task(&mut self, task_id: TaskId) -> Option<(ColumnId, Task)> {
        let mut removed = None;
        for column in &mut self.columns {
            if let Some(task) = column.remove_task(task_id) {
                removed.get_or_insert((column.id(), task));
            }
        }
        removed
    }
}
