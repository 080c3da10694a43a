//! Port contracts for the board.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod gateway;

pub use gateway::{
    BoardGateway, ColumnPatch, GatewayError, GatewayResult, NewColumn, NewTask, TaskMove,
    TaskPatch,
};
