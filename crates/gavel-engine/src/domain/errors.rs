//! Auction engine error types.
//!
//! Every variant is an expected, typed outcome returned to the caller; none
//! is retried automatically by the engine.

use gavel_types::{Amount, ItemId, ParticipantId, Phase, RoomId};
use thiserror::Error;

/// Auction engine errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuctionError {
    /// Command not legal in the room's current phase.
    #[error("command not legal while {actual}")]
    InvalidPhase { actual: Phase },

    /// Nomination starting price below the floor.
    #[error("starting price {offered} below floor {minimum}")]
    PriceTooLow { offered: Amount, minimum: Amount },

    /// Bid below the current high bid plus the minimum increment.
    #[error("bid {offered} below minimum {minimum}")]
    BidTooLow { offered: Amount, minimum: Amount },

    /// The bidding window elapsed before the command applied.
    #[error("bidding window has expired")]
    WindowExpired,

    /// Finalization requested before the deadline.
    #[error("bidding window has not expired yet")]
    NotYetExpired,

    /// Lost the race on a conditional write; recompute against fresh state.
    #[error("superseded by a concurrent writer")]
    Superseded,

    /// Accepting the bid would break the remaining-slot reserve floor.
    #[error("bid {offered} exceeds budget {available} less the {reserve} slot reserve")]
    BudgetExceeded {
        offered: Amount,
        available: Amount,
        reserve: Amount,
    },

    /// No roster slots remaining.
    #[error("no roster slots remaining")]
    SlotsExhausted,

    /// Quota-limited item cap reached.
    #[error("quota-limited item cap reached ({held}/{max})")]
    QuotaExceeded { held: u8, max: u8 },

    /// Item already has an allocation in this room.
    #[error("item {0} already sold in this room")]
    ItemAlreadySold(ItemId),

    /// Participant is not seated in this room.
    #[error("participant {0} not found in room")]
    ParticipantNotFound(ParticipantId),

    /// Item not in the catalog.
    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    /// Room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// Room exists but is not accepting auction commands.
    #[error("room {0} is not active")]
    RoomNotActive(RoomId),

    /// The catalog has no unsold items left for this room.
    #[error("no unsold items remain")]
    NoItemsRemaining,

    /// Storage-layer failure; safe to retry, no partial state was persisted.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Result type for auction operations.
pub type AuctionResult<T> = Result<T, AuctionError>;
