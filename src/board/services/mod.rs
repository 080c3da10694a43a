//! Application services for board state and drag handling.

mod config;
mod drag;
mod store;

pub use config::BoardStoreConfig;
pub use drag::{DragInterpreter, DragOutcome};
pub use store::{BoardStore, BoardStoreError, BoardStoreResult, BoardView, MoveOutcome};
