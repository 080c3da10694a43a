//! Domain model for the board.
//!
//! Columns, tasks and the board snapshot are plain data; the drag gesture
//! types translate pointer identities into move intents without touching
//! any infrastructure.

mod board;
mod column;
mod error;
mod gesture;
mod ids;
mod task;
mod title;

pub use board::{Board, TaskLocation};
pub use column::{Column, PersistedColumnData};
pub use error::BoardDomainError;
pub use gesture::{DragGesture, DropTarget, MoveIntent};
pub use ids::{ColumnId, Position, TaskId};
pub use task::{PersistedTaskData, Task};
pub use title::{MAX_COLUMN_TITLE_CHARS, MAX_TASK_TITLE_CHARS, Title};
