//! In-memory adapters for the board.

mod gateway;

pub use gateway::{FailureMode, GatewayOperation, InMemoryBoardGateway};
