//! Trellis: kanban board state with optimistic ordering.
//!
//! This crate holds a board of ordered columns and ordered tasks, turns
//! drag-and-drop gestures into moves, and keeps local state consistent with
//! a remote API through optimistic updates and resynchronisation.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure board data and gesture interpretation
//! - **Ports**: The remote gateway contract
//! - **Adapters**: Concrete gateway implementations
//! - **Services**: The board store and drag interpreter
//!
//! # Modules
//!
//! - [`board`]: Board state, ordering protocol and gesture handling

pub mod board;
