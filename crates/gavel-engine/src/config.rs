//! Engine configuration.

use gavel_types::Amount;
use serde::{Deserialize, Serialize};

/// Pricing rules shared by every room.
///
/// Per-room knobs (purse, roster bounds, timers) live on `RoomConfig`; these
/// are the auction-house constants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Absolute floor for a nomination's starting price.
    pub nomination_floor: Amount,
    /// Budget a participant must hold back per unfilled mandatory slot.
    pub slot_reserve: Amount,
    /// High bids below this use `small_increment`, at or above it
    /// `large_increment`.
    pub increment_threshold: Amount,
    pub small_increment: Amount,
    pub large_increment: Amount,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nomination_floor: Amount::from_hundredths(20),
            slot_reserve: Amount::from_hundredths(20),
            increment_threshold: Amount::from_units(5),
            small_increment: Amount::from_hundredths(20),
            large_increment: Amount::from_hundredths(50),
        }
    }
}
