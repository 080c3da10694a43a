//! Drag-and-drop gestures and the move intents derived from them.
//!
//! A [`DragGesture`] carries only identities: the dragged task and whatever
//! sits under the pointer when it is released. [`MoveIntent::resolve`]
//! reads a board snapshot and turns that into one of three outcomes: a
//! reorder inside the source column, a move into another column, or
//! nothing.

use super::{Board, ColumnId, Position, TaskId};

/// The element under the pointer when a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Another task card.
    Task(TaskId),
    /// A column container, typically its empty area or header.
    Column(ColumnId),
}

/// A completed pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    /// The task being dragged.
    pub active: TaskId,
    /// The drop target, or `None` when released over empty space.
    pub over: Option<DropTarget>,
}

impl DragGesture {
    /// Creates a gesture released over `target`.
    #[must_use]
    pub const fn dropped_on(active: TaskId, target: DropTarget) -> Self {
        Self {
            active,
            over: Some(target),
        }
    }

    /// Creates a gesture released outside any recognised target.
    #[must_use]
    pub const fn dropped_outside(active: TaskId) -> Self {
        Self { active, over: None }
    }
}

/// The move a gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    /// Reorder a task inside its own column.
    Reorder {
        /// The task being moved.
        task_id: TaskId,
        /// Column holding the task.
        column_id: ColumnId,
        /// Current zero-based index.
        from_index: usize,
        /// Zero-based index the task should occupy afterwards.
        to_index: usize,
    },
    /// Move a task into a different column.
    CrossMove {
        /// The task being moved.
        task_id: TaskId,
        /// Column the task leaves.
        from_column_id: ColumnId,
        /// Column the task joins.
        to_column_id: ColumnId,
        /// Zero-based index the task should occupy in the new column.
        to_index: usize,
    },
    /// The gesture has no recognised target.
    Ignored,
}

impl MoveIntent {
    /// Interprets a gesture against a board snapshot.
    ///
    /// Dropping on a task in the source column reorders to that task's slot.
    /// Dropping on the source column container moves the task to the end of
    /// its column. Dropping on a task in another column inserts before that
    /// task; dropping on another column container appends. Anything that
    /// cannot be located on the board is ignored.
    #[must_use]
    pub fn resolve(board: &Board, gesture: &DragGesture) -> Self {
        let Some(target) = gesture.over else {
            return Self::Ignored;
        };
        let Some(source) = board.locate_task(gesture.active) else {
            return Self::Ignored;
        };

        let (to_column_id, to_index) = match target {
            DropTarget::Task(over_id) => match board.locate_task(over_id) {
                Some(over) => (over.column_id, over.index),
                None => return Self::Ignored,
            },
            DropTarget::Column(column_id) => match board.column(column_id) {
                Some(column) if column_id == source.column_id => {
                    (column_id, column.task_count().saturating_sub(1))
                }
                Some(column) => (column_id, column.task_count()),
                None => return Self::Ignored,
            },
        };

        if to_column_id == source.column_id {
            Self::Reorder {
                task_id: gesture.active,
                column_id: source.column_id,
                from_index: source.index,
                to_index,
            }
        } else {
            Self::CrossMove {
                task_id: gesture.active,
                from_column_id: source.column_id,
                to_column_id,
                to_index,
            }
        }
    }

    /// Returns `true` when applying the intent would leave the board as is.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        match *self {
            Self::Reorder {
                from_index,
                to_index,
                ..
            } => from_index == to_index,
            Self::CrossMove { .. } => false,
            Self::Ignored => true,
        }
    }

    /// Returns the task, destination column and one-based destination rank.
    ///
    /// `None` for intents that do not move anything.
    #[must_use]
    pub fn destination(&self) -> Option<(TaskId, ColumnId, Position)> {
        if self.is_noop() {
            return None;
        }
        match *self {
            Self::Reorder {
                task_id,
                column_id,
                to_index,
                ..
            } => Some((task_id, column_id, Position::from_index(to_index))),
            Self::CrossMove {
                task_id,
                to_column_id,
                to_index,
                ..
            } => Some((task_id, to_column_id, Position::from_index(to_index))),
            Self::Ignored => None,
        }
    }
}
