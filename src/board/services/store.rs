//! Board state store.
//!
//! [`BoardStore`] is the single writer of the in-memory board. Creates,
//! edits and deletes are applied only after the gateway confirms them. Moves
//! are applied optimistically: the task leaves its source column at once,
//! the gateway's canonical record decides where it lands, and any gateway
//! failure resynchronises the whole board from [`BoardGateway::list_columns`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::BoardStoreConfig;
use crate::board::{
    domain::{Board, BoardDomainError, Column, ColumnId, Position, Task, TaskId, Title},
    ports::{BoardGateway, ColumnPatch, GatewayError, NewColumn, NewTask, TaskMove, TaskPatch},
};

/// Service-level errors for board store operations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// Input validation failed before any gateway call.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The column is not on the local board.
    #[error("column not found on board: {0}")]
    UnknownColumn(ColumnId),

    /// The task is not on the local board.
    #[error("task not found on board: {0}")]
    UnknownTask(TaskId),

    /// A move of the same task is still waiting for the gateway.
    #[error("task {0} already has a move in flight")]
    MoveInFlight(TaskId),

    /// The gateway call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl BoardStoreError {
    /// Returns `true` for errors raised before the gateway was contacted.
    ///
    /// Validation errors are returned to the caller but never stored as the
    /// current error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Gateway(_))
    }
}

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Result of a [`BoardStore::move_task`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The task already occupies the requested slot; the gateway was not
    /// called.
    Unchanged,
    /// The gateway accepted the move and returned the canonical record.
    Moved(Task),
}

/// Read model published to the view layer.
#[derive(Debug, Clone, Default)]
pub struct BoardView {
    /// Current board snapshot, possibly optimistic.
    pub board: Board,
    /// `true` while a full snapshot load is in progress.
    pub loading: bool,
    /// The most recent gateway failure, if not yet cleared.
    pub error: Option<GatewayError>,
}

#[derive(Debug, Default)]
struct StoreState {
    board: Board,
    loads_in_flight: usize,
    error: Option<GatewayError>,
    pending_moves: HashMap<TaskId, usize>,
}

impl StoreState {
    fn view(&self) -> BoardView {
        BoardView {
            board: self.board.clone(),
            loading: self.loads_in_flight > 0,
            error: self.error.clone(),
        }
    }
}

fn write_state(lock: &RwLock<StoreState>) -> RwLockWriteGuard<'_, StoreState> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a task as having a move in flight until dropped.
struct PendingMove<'a> {
    state: &'a RwLock<StoreState>,
    task_id: TaskId,
}

impl Drop for PendingMove<'_> {
    fn drop(&mut self) {
        let mut state = write_state(self.state);
        if let Some(count) = state.pending_moves.get_mut(&self.task_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                state.pending_moves.remove(&self.task_id);
            }
        }
    }
}

/// What a validated move request turned into.
enum MovePlan {
    Unchanged,
    Dispatch { source: Option<ColumnId> },
}

/// Owner of board state and the only path for mutating it.
pub struct BoardStore<G>
where
    G: BoardGateway,
{
    gateway: Arc<G>,
    config: BoardStoreConfig,
    state: RwLock<StoreState>,
    updates: watch::Sender<BoardView>,
    publish: Mutex<()>,
}

impl<G> BoardStore<G>
where
    G: BoardGateway,
{
    /// Creates an empty store using the default configuration.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self::with_config(gateway, BoardStoreConfig::default())
    }

    /// Creates an empty store with a custom configuration.
    #[must_use]
    pub fn with_config(gateway: Arc<G>, config: BoardStoreConfig) -> Self {
        let (updates, _) = watch::channel(BoardView::default());
        Self {
            gateway,
            config,
            state: RwLock::new(StoreState::default()),
            updates,
            publish: Mutex::new(()),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardStoreConfig {
        &self.config
    }

    /// Subscribes to every state the store publishes.
    ///
    /// Dropping the receiver is always safe; publishing to a store with no
    /// subscribers is a no-op. Reading the store while holding a borrow is
    /// fine, but mutating it while holding one blocks the publisher.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<BoardView> {
        self.updates.subscribe()
    }

    /// Returns a copy of the current view.
    #[must_use]
    pub fn view(&self) -> BoardView {
        self.read_state().view()
    }

    /// Returns a copy of the current board.
    #[must_use]
    pub fn snapshot(&self) -> Board {
        self.read_state().board.clone()
    }

    /// Runs `read` against the current board without copying it.
    pub fn with_board<T>(&self, read: impl FnOnce(&Board) -> T) -> T {
        read(&self.read_state().board)
    }

    /// Returns `true` while at least one snapshot load is in progress.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read_state().loads_in_flight > 0
    }

    /// Returns the current error, if any.
    #[must_use]
    pub fn current_error(&self) -> Option<GatewayError> {
        self.read_state().error.clone()
    }

    /// Dismisses the current error.
    pub fn clear_error(&self) {
        self.mutate(|state| state.error = None);
    }

    /// Replaces local state with the gateway's full snapshot.
    ///
    /// On failure the previous board is kept and the error becomes the
    /// current error.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Gateway`] when the snapshot cannot be read.
    pub async fn load_all(&self) -> BoardStoreResult<()> {
        self.mutate(|state| state.loads_in_flight += 1);
        debug!("loading board snapshot");

        match self.gateway.list_columns().await {
            Ok(columns) => {
                let board = Board::new(columns);
                info!(
                    columns = board.columns().len(),
                    tasks = board.task_count(),
                    "board snapshot loaded"
                );
                self.mutate(|state| {
                    state.board = board;
                    state.error = None;
                    state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load board snapshot");
                self.mutate(|state| {
                    state.error = Some(err.clone());
                    state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
                });
                Err(BoardStoreError::Gateway(err))
            }
        }
    }

    /// Creates a column and appends the server's record to the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] for a blank or over-long title
    /// (nothing is sent) and [`BoardStoreError::Gateway`] when the server
    /// rejects the request.
    pub async fn create_column(&self, title: &str) -> BoardStoreResult<Column> {
        let validated = Title::parse(title, self.config.max_column_title_chars)?;
        debug!(title = validated.as_str(), "creating column");

        let request = NewColumn {
            title: validated.into_inner(),
        };
        let created = self
            .gateway
            .create_column(&request)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| state.board.push_column(created.clone()));
        Ok(created)
    }

    /// Renames a column once the server confirms the new title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] for an invalid title,
    /// [`BoardStoreError::UnknownColumn`] when the column is not on the
    /// board and [`BoardStoreError::Gateway`] when the server rejects it.
    pub async fn rename_column(&self, id: ColumnId, title: &str) -> BoardStoreResult<Column> {
        let validated = Title::parse(title, self.config.max_column_title_chars)?;
        if self.with_board(|board| board.column(id).is_none()) {
            return Err(BoardStoreError::UnknownColumn(id));
        }
        debug!(column_id = %id, title = validated.as_str(), "renaming column");

        let patch = ColumnPatch {
            title: Some(validated.into_inner()),
        };
        let updated = self
            .gateway
            .update_column(id, &patch)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| {
            if let Some(column) = state.board.column_mut(id) {
                column.set_title(updated.title().to_owned());
            }
        });
        Ok(updated)
    }

    /// Deletes a column and its tasks once the server confirms.
    ///
    /// Callers confirm destructive intent before calling.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Gateway`] when the server rejects the
    /// deletion; the column stays on the board.
    pub async fn delete_column(&self, id: ColumnId) -> BoardStoreResult<()> {
        debug!(column_id = %id, "deleting column");
        self.gateway
            .delete_column(id)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| {
            state.board.remove_column(id);
        });
        Ok(())
    }

    /// Creates a task and appends the server's record to its column.
    ///
    /// A blank description is sent as absent.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] for an invalid title,
    /// [`BoardStoreError::UnknownColumn`] when the column is not on the
    /// board and [`BoardStoreError::Gateway`] when the server rejects it.
    pub async fn create_task(
        &self,
        column_id: ColumnId,
        title: &str,
        description: Option<&str>,
    ) -> BoardStoreResult<Task> {
        let validated = Title::parse(title, self.config.max_task_title_chars)?;
        if self.with_board(|board| board.column(column_id).is_none()) {
            return Err(BoardStoreError::UnknownColumn(column_id));
        }
        debug!(column_id = %column_id, title = validated.as_str(), "creating task");

        let request = NewTask {
            title: validated.into_inner(),
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
            column_id,
        };
        let created = self
            .gateway
            .create_task(&request)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| {
            if let Some(column) = state.board.column_mut(created.column_id()) {
                column.push_task(created.clone());
            }
        });
        Ok(created)
    }

    /// Sends a partial task update and adopts the server's record.
    ///
    /// An empty patch returns the local record without a gateway call.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Domain`] when a replacement title is
    /// invalid, [`BoardStoreError::UnknownTask`] when the task is not on the
    /// board and [`BoardStoreError::Gateway`] when the server rejects it.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> BoardStoreResult<Task> {
        let request = TaskPatch {
            title: patch
                .title
                .as_deref()
                .map(|raw| Title::parse(raw, self.config.max_task_title_chars))
                .transpose()?
                .map(Title::into_inner),
            description: patch.description,
        };
        let Some(current) = self.with_board(|board| board.task(id).cloned()) else {
            return Err(BoardStoreError::UnknownTask(id));
        };
        if request.is_empty() {
            debug!(task_id = %id, "empty task patch; nothing to send");
            return Ok(current);
        }
        debug!(task_id = %id, "updating task");

        let updated = self
            .gateway
            .update_task(id, &request)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| merge_updated_task(&mut state.board, updated.clone()));
        Ok(updated)
    }

    /// Deletes a task once the server confirms.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Gateway`] when the server rejects the
    /// deletion; the task stays on the board.
    pub async fn delete_task(&self, id: TaskId) -> BoardStoreResult<()> {
        debug!(task_id = %id, "deleting task");
        self.gateway
            .delete_task(id)
            .await
            .map_err(|err| self.record_failure(err))?;

        self.mutate(|state| {
            if let Some((column_id, _)) = state.board.remove_task(id) {
                if let Some(column) = state.board.column_mut(column_id) {
                    column.rerank();
                }
            }
        });
        Ok(())
    }

    /// Moves a task to `target_position` (one-based, post-move) in
    /// `target_column`.
    ///
    /// Requesting the slot the task already occupies returns
    /// [`MoveOutcome::Unchanged`] without calling the gateway. Otherwise the
    /// task leaves its source column immediately and the gateway's canonical
    /// record is inserted at its returned rank. Any gateway failure triggers
    /// a full [`load_all`](Self::load_all) instead of a local undo.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::UnknownTask`] or
    /// [`BoardStoreError::UnknownColumn`] for references missing from the
    /// board, [`BoardStoreError::MoveInFlight`] when the task's previous move
    /// is still pending and [`BoardStoreError::Gateway`] when the move
    /// fails.
    pub async fn move_task(
        &self,
        id: TaskId,
        target_column: ColumnId,
        target_position: Position,
    ) -> BoardStoreResult<MoveOutcome> {
        let plan = self.mutate(|state| {
            plan_move(state, &self.config, id, target_column, target_position)
        })?;
        let MovePlan::Dispatch { source } = plan else {
            debug!(task_id = %id, "task already at requested position");
            return Ok(MoveOutcome::Unchanged);
        };
        let _pending = PendingMove {
            state: &self.state,
            task_id: id,
        };

        debug!(
            task_id = %id,
            column_id = %target_column,
            position = target_position.get(),
            "moving task"
        );
        let request = TaskMove {
            column_id: target_column,
            task_order: target_position,
        };

        match self.gateway.move_task(id, &request).await {
            Ok(moved) => {
                let merged =
                    self.mutate(|state| merge_moved_task(&mut state.board, source, moved.clone()));
                if !merged {
                    warn!(
                        task_id = %id,
                        column_id = %moved.column_id(),
                        "moved task landed in a column missing locally; resynchronising board"
                    );
                    if let Err(err) = self.load_all().await {
                        warn!(error = %err, "resynchronisation after move failed");
                    }
                }
                Ok(MoveOutcome::Moved(moved))
            }
            Err(err) => {
                warn!(task_id = %id, error = %err, "task move failed; resynchronising board");
                if let Err(resync) = self.load_all().await {
                    warn!(error = %resync, "resynchronisation after failed move also failed");
                }
                Err(self.record_failure(err))
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `apply` under the write lock and publishes the new view.
    ///
    /// The state lock is released before publishing so subscribers holding
    /// a borrow can still read the store. The publish lock keeps views in
    /// the order their changes were applied.
    fn mutate<T>(&self, apply: impl FnOnce(&mut StoreState) -> T) -> T {
        let _publishing = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        let (value, view) = {
            let mut state = write_state(&self.state);
            let value = apply(&mut state);
            (value, state.view())
        };
        self.updates.send_replace(view);
        value
    }

    /// Stores `err` as the current error and wraps it for the caller.
    fn record_failure(&self, err: GatewayError) -> BoardStoreError {
        warn!(error = %err, "gateway call failed");
        self.mutate(|state| state.error = Some(err.clone()));
        BoardStoreError::Gateway(err)
    }
}

/// Validates a move, registers it as pending and removes the task from its
/// source column.
fn plan_move(
    state: &mut StoreState,
    config: &BoardStoreConfig,
    id: TaskId,
    target_column: ColumnId,
    target_position: Position,
) -> BoardStoreResult<MovePlan> {
    let pending = state.pending_moves.contains_key(&id);
    if pending && config.guard_concurrent_moves {
        return Err(BoardStoreError::MoveInFlight(id));
    }
    let destination_len = state
        .board
        .column(target_column)
        .map(Column::task_count)
        .ok_or(BoardStoreError::UnknownColumn(target_column))?;

    let source = match state.board.locate_task(id) {
        Some(location) => {
            if location.column_id == target_column {
                let last_index = destination_len.saturating_sub(1);
                if target_position.to_index().min(last_index) == location.index {
                    return Ok(MovePlan::Unchanged);
                }
            }
            if let Some(column) = state.board.column_mut(location.column_id) {
                column.remove_task(id);
            }
            Some(location.column_id)
        }
        // Only reachable with the guard off: an overlapping move already
        // took the task off the board.
        None if pending => None,
        None => return Err(BoardStoreError::UnknownTask(id)),
    };

    *state.pending_moves.entry(id).or_default() += 1;
    Ok(MovePlan::Dispatch { source })
}

/// Places the canonical record of a moved task on the board.
///
/// Returns `false` when the task's column is not on the local board.
fn merge_moved_task(board: &mut Board, source: Option<ColumnId>, moved: Task) -> bool {
    let lingering = board.remove_task(moved.id()).map(|(column_id, _)| column_id);
    let destination_id = moved.column_id();
    let index = moved.order().to_index();

    let Some(destination) = board.column_mut(destination_id) else {
        return false;
    };
    destination.insert_task(index, moved);
    destination.rerank();

    for column_id in [source, lingering].into_iter().flatten() {
        if let Some(column) = board.column_mut(column_id) {
            column.rerank();
        }
    }
    true
}

/// Replaces a task with its updated record, relocating it when the server
/// moved it to another column.
fn merge_updated_task(board: &mut Board, updated: Task) {
    let Some(location) = board.locate_task(updated.id()) else {
        return;
    };
    if location.column_id == updated.column_id() {
        if let Some(column) = board.column_mut(location.column_id) {
            column.replace_task(updated);
        }
        return;
    }

    board.remove_task(updated.id());
    if let Some(column) = board.column_mut(location.column_id) {
        column.rerank();
    }
    let index = updated.order().to_index();
    if let Some(column) = board.column_mut(updated.column_id()) {
        column.insert_task(index, updated);
        column.rerank();
    }
}
