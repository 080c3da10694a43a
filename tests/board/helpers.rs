//! Shared helpers for board integration tests.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tokio::runtime::Runtime;
use trellis::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{Board, ColumnId, TaskId},
    ports::{BoardGateway, GatewayResult, NewColumn, NewTask},
    services::BoardStore,
};

/// Gateway type used across board integration tests.
pub type Gateway = InMemoryBoardGateway<DefaultClock>;

/// Store type used across board integration tests.
pub type Store = BoardStore<Gateway>;

/// Provides a multi-threaded tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
}

/// Provides a fresh in-memory gateway for each test.
#[fixture]
pub fn gateway() -> Arc<Gateway> {
    Arc::new(InMemoryBoardGateway::new(DefaultClock))
}

/// Creates a column directly on the gateway.
///
/// # Errors
///
/// Returns the gateway error when the column is rejected.
pub async fn seed_column(gateway: &Gateway, title: &str) -> GatewayResult<ColumnId> {
    let column = gateway
        .create_column(&NewColumn {
            title: title.to_owned(),
        })
        .await?;
    Ok(column.id())
}

/// Creates a task directly on the gateway.
///
/// # Errors
///
/// Returns the gateway error when the task is rejected.
pub async fn seed_task(
    gateway: &Gateway,
    column_id: ColumnId,
    title: &str,
) -> GatewayResult<TaskId> {
    let task = gateway
        .create_task(&NewTask {
            title: title.to_owned(),
            description: None,
            column_id,
        })
        .await?;
    Ok(task.id())
}

/// Reads the gateway's current snapshot as a board.
///
/// # Errors
///
/// Returns the gateway error when the snapshot cannot be read.
pub async fn server_board(gateway: &Gateway) -> GatewayResult<Board> {
    Ok(Board::new(gateway.list_columns().await?))
}
