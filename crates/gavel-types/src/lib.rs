//! # Shared Types Crate
//!
//! Cross-crate domain entities for the Gavel auction engine.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a crate boundary
//!   (rooms, participants, items, auction state, bid/allocation rows) is
//!   defined here.
//! - **Exact Money**: amounts are fixed-point integers (`Amount`), never
//!   floats; the conditional-write discipline compares them for equality.
//! - **Append-Only History**: `Bid` and `Allocation` rows are write-once;
//!   nothing in this crate mutates them after construction.

pub mod amount;
pub mod entities;
pub mod ids;
pub mod state;

pub use amount::Amount;
pub use entities::*;
pub use ids::*;
pub use state::*;

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
