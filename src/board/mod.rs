//! Kanban board state and ordering.
//!
//! Holds the board as ordered columns of ordered tasks, applies every
//! mutation through a remote gateway, and reconciles local state with the
//! gateway's canonical records. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
