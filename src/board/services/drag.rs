//! Translation of drag gestures into store moves.

use std::sync::Arc;

use tracing::debug;

use super::{BoardStore, BoardStoreResult, MoveOutcome};
use crate::board::{
    domain::{DragGesture, MoveIntent, Task},
    ports::BoardGateway,
};

/// Result of handling a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The gesture had no recognised target.
    Ignored,
    /// The task was dropped back onto its own slot.
    Unchanged,
    /// The store accepted the move; carries the canonical record.
    Moved(Task),
}

/// Interprets pointer gestures against the store's board and delegates the
/// resulting move.
///
/// The interpreter owns no state and performs no persistence itself.
pub struct DragInterpreter<G>
where
    G: BoardGateway,
{
    store: Arc<BoardStore<G>>,
}

impl<G> DragInterpreter<G>
where
    G: BoardGateway,
{
    /// Creates an interpreter for `store`.
    #[must_use]
    pub const fn new(store: Arc<BoardStore<G>>) -> Self {
        Self { store }
    }

    /// Resolves a gesture against the current board without acting on it.
    #[must_use]
    pub fn interpret(&self, gesture: &DragGesture) -> MoveIntent {
        self.store
            .with_board(|board| MoveIntent::resolve(board, gesture))
    }

    /// Resolves a gesture and performs the move it describes.
    ///
    /// # Errors
    ///
    /// Propagates the store's error when the move is rejected or fails.
    pub async fn handle(&self, gesture: DragGesture) -> BoardStoreResult<DragOutcome> {
        let intent = self.interpret(&gesture);
        let Some((task_id, column_id, position)) = intent.destination() else {
            debug!(task_id = %gesture.active, ?intent, "gesture does not move a task");
            return Ok(match intent {
                MoveIntent::Ignored => DragOutcome::Ignored,
                MoveIntent::Reorder { .. } | MoveIntent::CrossMove { .. } => DragOutcome::Unchanged,
            });
        };

        let outcome = match self.store.move_task(task_id, column_id, position).await? {
            MoveOutcome::Unchanged => DragOutcome::Unchanged,
            MoveOutcome::Moved(task) => DragOutcome::Moved(task),
        };
        Ok(outcome)
    }
}
