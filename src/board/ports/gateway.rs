//! Gateway port for the remote board API.

use crate::board::domain::{Column, ColumnId, Position, Task, TaskId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Payload for creating a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewColumn {
    /// Column title.
    pub title: String,
}

/// Partial column update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column that will own the task.
    pub column_id: ColumnId,
}

/// Partial task update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskPatch {
    /// Sets the replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Payload describing where a task should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMove {
    /// Destination column.
    pub column_id: ColumnId,
    /// One-based rank in the destination column after the move.
    pub task_order: Position,
}

/// Remote entity gateway contract.
///
/// Every call is a single request/response exchange that either returns the
/// canonical persisted entity or fails.
#[async_trait]
pub trait BoardGateway: Send + Sync {
    /// Lists every column with its tasks, both in display order.
    async fn list_columns(&self) -> GatewayResult<Vec<Column>>;

    /// Creates a column at the end of the board.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the server rejects the title.
    async fn create_column(&self, column: &NewColumn) -> GatewayResult<Column>;

    /// Applies a partial update to a column.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ColumnNotFound`] when the column does not
    /// exist.
    async fn update_column(&self, id: ColumnId, patch: &ColumnPatch) -> GatewayResult<Column>;

    /// Deletes a column and every task it holds.
    async fn delete_column(&self, id: ColumnId) -> GatewayResult<()>;

    /// Creates a task at the end of its column.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ColumnNotFound`] when the owning column does
    /// not exist.
    async fn create_task(&self, task: &NewTask) -> GatewayResult<Task>;

    /// Applies a partial update to a task.
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> GatewayResult<Task>;

    /// Moves a task to a column and rank, returning the normalised record.
    async fn move_task(&self, id: TaskId, request: &TaskMove) -> GatewayResult<Task>;

    /// Deletes a task.
    async fn delete_task(&self, id: TaskId) -> GatewayResult<()>;
}

/// Errors returned by gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The server rejected the request payload.
    #[error("request rejected: {0}")]
    Validation(String),

    /// The referenced column does not exist on the server.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The referenced task does not exist on the server.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The server could not be reached.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The server failed while handling the request.
    #[error("server error: {0}")]
    Server(Arc<dyn std::error::Error + Send + Sync>),
}

impl GatewayError {
    /// Wraps a server-side error.
    pub fn server(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Server(Arc::new(err))
    }
}
