//! Shared world state for board move BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::board::{
    adapters::memory::InMemoryBoardGateway,
    domain::{Board, Column, ColumnId, TaskId},
    services::{BoardStore, BoardStoreResult, MoveOutcome},
};

/// Gateway type used by the BDD world.
pub type TestGateway = InMemoryBoardGateway<DefaultClock>;

/// Scenario world for board move behaviour tests.
pub struct BoardMoveWorld {
    pub gateway: Arc<TestGateway>,
    pub store: BoardStore<TestGateway>,
    pub columns: HashMap<String, ColumnId>,
    pub tasks: HashMap<String, TaskId>,
    pub board_before: Option<Board>,
    pub last_move: Option<BoardStoreResult<MoveOutcome>>,
    pub last_create: Option<BoardStoreResult<Column>>,
}

impl BoardMoveWorld {
    /// Creates a world over an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        let gateway = Arc::new(InMemoryBoardGateway::new(DefaultClock));
        let store = BoardStore::new(Arc::clone(&gateway));

        Self {
            gateway,
            store,
            columns: HashMap::new(),
            tasks: HashMap::new(),
            board_before: None,
            last_move: None,
            last_create: None,
        }
    }

    /// Looks up a column created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no column with that title was created.
    pub fn column(&self, title: &str) -> Result<ColumnId, eyre::Report> {
        self.columns
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown column in scenario: {title}"))
    }

    /// Looks up a task created earlier in the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no task with that title was created.
    pub fn task(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task in scenario: {title}"))
    }
}

impl Default for BoardMoveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardMoveWorld {
    BoardMoveWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
