//! In-memory board gateway for tests and offline hosts.
//!
//! Applies the same persistence rules as the remote API: columns and tasks
//! are ranked by insertion, a move re-ranks both affected columns to a
//! contiguous sequence, and deleting a column cascades to its tasks.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::board::{
    domain::{
        Column, ColumnId, MAX_COLUMN_TITLE_CHARS, MAX_TASK_TITLE_CHARS, PersistedColumnData,
        PersistedTaskData, Position, Task, TaskId, Title,
    },
    ports::{
        BoardGateway, ColumnPatch, GatewayError, GatewayResult, NewColumn, NewTask, TaskMove,
        TaskPatch,
    },
};

/// Gateway operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    /// [`BoardGateway::list_columns`].
    ListColumns,
    /// [`BoardGateway::create_column`].
    CreateColumn,
    /// [`BoardGateway::update_column`].
    UpdateColumn,
    /// [`BoardGateway::delete_column`].
    DeleteColumn,
    /// [`BoardGateway::create_task`].
    CreateTask,
    /// [`BoardGateway::update_task`].
    UpdateTask,
    /// [`BoardGateway::move_task`].
    MoveTask,
    /// [`BoardGateway::delete_task`].
    DeleteTask,
}

impl GatewayOperation {
    /// Returns the operation name used in logs and injected errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListColumns => "list_columns",
            Self::CreateColumn => "create_column",
            Self::UpdateColumn => "update_column",
            Self::DeleteColumn => "delete_column",
            Self::CreateTask => "create_task",
            Self::UpdateTask => "update_task",
            Self::MoveTask => "move_task",
            Self::DeleteTask => "delete_task",
        }
    }
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an injected failure is reported relative to the state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Fail without applying the request.
    BeforeCommit,
    /// Apply the request, then report failure as if the response was lost.
    AfterCommit,
}

/// Thread-safe in-memory implementation of [`BoardGateway`].
#[derive(Debug, Clone)]
pub struct InMemoryBoardGateway<C: Clock + Send + Sync> {
    state: Arc<RwLock<InMemoryBoardState>>,
    clock: C,
}

#[derive(Debug, Default)]
struct InMemoryBoardState {
    columns: Vec<StoredColumn>,
    tasks: Vec<Task>,
    pending_failures: HashMap<GatewayOperation, FailureMode>,
    calls: HashMap<GatewayOperation, usize>,
}

#[derive(Debug, Clone)]
struct StoredColumn {
    id: ColumnId,
    title: String,
    order: Position,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl<C: Clock + Send + Sync> InMemoryBoardGateway<C> {
    /// Creates an empty gateway stamping records with `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryBoardState::default())),
            clock,
        }
    }

    /// Makes the next call of `operation` fail with
    /// [`GatewayError::Unavailable`].
    pub fn fail_next(&self, operation: GatewayOperation, mode: FailureMode) {
        if let Ok(mut state) = self.state.write() {
            state.pending_failures.insert(operation, mode);
        }
    }

    /// Returns how many times `operation` has been called.
    #[must_use]
    pub fn calls(&self, operation: GatewayOperation) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn write_state(&self) -> GatewayResult<RwLockWriteGuard<'_, InMemoryBoardState>> {
        self.state
            .write()
            .map_err(|err| GatewayError::server(std::io::Error::other(err.to_string())))
    }

    /// Runs `apply` under the write lock, honouring any injected failure.
    fn execute<T>(
        &self,
        operation: GatewayOperation,
        apply: impl FnOnce(&mut InMemoryBoardState, &C) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let mut state = self.write_state()?;
        *state.calls.entry(operation).or_default() += 1;
        let failure = state.pending_failures.remove(&operation);

        if failure == Some(FailureMode::BeforeCommit) {
            debug!(%operation, "injected failure before commit");
            return Err(injected_failure(operation));
        }
        let value = apply(&mut *state, &self.clock)?;
        if failure == Some(FailureMode::AfterCommit) {
            debug!(%operation, "injected failure after commit");
            return Err(injected_failure(operation));
        }
        Ok(value)
    }
}

fn injected_failure(operation: GatewayOperation) -> GatewayError {
    GatewayError::Unavailable(format!("injected failure in {operation}"))
}

fn validate_title(raw: &str, max_chars: usize) -> GatewayResult<String> {
    Title::parse(raw, max_chars)
        .map(Title::into_inner)
        .map_err(|err| GatewayError::Validation(err.to_string()))
}

impl InMemoryBoardState {
    fn has_column(&self, column_id: ColumnId) -> bool {
        self.columns.iter().any(|column| column.id == column_id)
    }

    fn task_mut(&mut self, task_id: TaskId) -> GatewayResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(GatewayError::TaskNotFound(task_id))
    }

    /// Task identifiers of a column ordered by rank, ties by insertion.
    fn ordered_task_ids(&self, column_id: ColumnId) -> Vec<TaskId> {
        let mut members: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.column_id() == column_id)
            .collect();
        members.sort_by_key(|task| task.order());
        members.into_iter().map(Task::id).collect()
    }

    fn next_task_order(&self, column_id: ColumnId) -> Position {
        self.tasks
            .iter()
            .filter(|task| task.column_id() == column_id)
            .map(Task::order)
            .max()
            .map_or(Position::FIRST, Position::next)
    }

    /// Places `sequence` into `column_id` with ranks `1..=n`.
    fn assign_ranks(&mut self, column_id: ColumnId, sequence: &[TaskId]) {
        for (index, task_id) in sequence.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|task| task.id() == *task_id) {
                task.set_placement(column_id, Position::from_index(index));
            }
        }
    }

    fn recalculate_orders(&mut self, column_id: ColumnId) {
        let sequence = self.ordered_task_ids(column_id);
        self.assign_ranks(column_id, &sequence);
    }

    fn build_column(&self, stored: &StoredColumn) -> Column {
        let tasks = self
            .ordered_task_ids(stored.id)
            .into_iter()
            .filter_map(|task_id| self.tasks.iter().find(|task| task.id() == task_id))
            .cloned()
            .collect();
        Column::from_persisted(PersistedColumnData {
            id: stored.id,
            title: stored.title.clone(),
            order: stored.order,
            created_at: stored.created_at,
            tasks,
        })
    }

    fn snapshot(&self) -> Vec<Column> {
        let mut columns: Vec<&StoredColumn> = self.columns.iter().collect();
        columns.sort_by_key(|column| column.order);
        columns
            .into_iter()
            .map(|column| self.build_column(column))
            .collect()
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> BoardGateway for InMemoryBoardGateway<C> {
    async fn list_columns(&self) -> GatewayResult<Vec<Column>> {
        self.execute(GatewayOperation::ListColumns, |state, _| Ok(state.snapshot()))
    }

    async fn create_column(&self, column: &NewColumn) -> GatewayResult<Column> {
        let title = validate_title(&column.title, MAX_COLUMN_TITLE_CHARS)?;
        self.execute(GatewayOperation::CreateColumn, |state, clock| {
            let order = state
                .columns
                .iter()
                .map(|stored| stored.order)
                .max()
                .map_or(Position::FIRST, Position::next);
            let stored = StoredColumn {
                id: ColumnId::new(),
                title,
                order,
                created_at: clock.utc(),
            };
            let created = state.build_column(&stored);
            state.columns.push(stored);
            Ok(created)
        })
    }

    async fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> GatewayResult<Column> {
        let title = patch
            .title
            .as_deref()
            .map(|raw| validate_title(raw, MAX_COLUMN_TITLE_CHARS))
            .transpose()?;
        self.execute(GatewayOperation::UpdateColumn, |state, _| {
            let stored = state
                .columns
                .iter_mut()
                .find(|column| column.id == id)
                .ok_or(GatewayError::ColumnNotFound(id))?;
            if let Some(new_title) = title {
                stored.title = new_title;
            }
            let updated = stored.clone();
            Ok(state.build_column(&updated))
        })
    }

    async fn delete_column(&self, id: ColumnId) -> GatewayResult<()> {
        self.execute(GatewayOperation::DeleteColumn, |state, _| {
            if !state.has_column(id) {
                return Err(GatewayError::ColumnNotFound(id));
            }
            state.columns.retain(|column| column.id != id);
            state.tasks.retain(|task| task.column_id() != id);
            Ok(())
        })
    }

    async fn create_task(&self, task: &NewTask) -> GatewayResult<Task> {
        let title = validate_title(&task.title, MAX_TASK_TITLE_CHARS)?;
        self.execute(GatewayOperation::CreateTask, |state, clock| {
            if !state.has_column(task.column_id) {
                return Err(GatewayError::ColumnNotFound(task.column_id));
            }
            let created = Task::from_persisted(PersistedTaskData {
                id: TaskId::new(),
                title,
                description: task.description.clone(),
                column_id: task.column_id,
                order: state.next_task_order(task.column_id),
                created_at: clock.utc(),
            });
            state.tasks.push(created.clone());
            Ok(created)
        })
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> GatewayResult<Task> {
        let title = patch
            .title
            .as_deref()
            .map(|raw| validate_title(raw, MAX_TASK_TITLE_CHARS))
            .transpose()?;
        self.execute(GatewayOperation::UpdateTask, |state, _| {
            let task = state.task_mut(id)?;
            if let Some(new_title) = title {
                task.set_title(new_title);
            }
            if let Some(description) = patch.description.clone() {
                task.set_description(Some(description));
            }
            Ok(task.clone())
        })
    }

    async fn move_task(&self, id: TaskId, request: &TaskMove) -> GatewayResult<Task> {
        self.execute(GatewayOperation::MoveTask, |state, _| {
            if !state.has_column(request.column_id) {
                return Err(GatewayError::ColumnNotFound(request.column_id));
            }
            let source = state.task_mut(id)?.column_id();

            let mut sequence: Vec<TaskId> = state
                .ordered_task_ids(request.column_id)
                .into_iter()
                .filter(|task_id| *task_id != id)
                .collect();
            let slot = request.task_order.to_index().min(sequence.len());
            sequence.insert(slot, id);
            state.assign_ranks(request.column_id, &sequence);
            if source != request.column_id {
                state.recalculate_orders(source);
            }

            Ok(state.task_mut(id)?.clone())
        })
    }

    async fn delete_task(&self, id: TaskId) -> GatewayResult<()> {
        self.execute(GatewayOperation::DeleteTask, |state, _| {
            let column_id = state.task_mut(id)?.column_id();
            state.tasks.retain(|task| task.id() != id);
            state.recalculate_orders(column_id);
            Ok(())
        })
    }
}
