//! # Gavel Runtime
//!
//! Wires the engine, ledger, and agent services together and drives rooms
//! with a per-room scheduler task. The scheduler is an ordinary caller of
//! the idempotent command surface: it may fire late, early, or redundantly
//! and the engine stays consistent.

pub mod catalog;
pub mod scheduler;
pub mod wiring;

pub use scheduler::RoomScheduler;
pub use wiring::Runtime;
