//! The per-room auction state singleton.
//!
//! `AuctionState` is the sole source of truth for "who is winning". One row
//! exists per room, created at activation and never deleted; it cycles
//! `idle -> bidding -> idle` for the life of the room. All mutation goes
//! through the ledger's conditional write keyed on `version`.

use crate::amount::Amount;
use crate::ids::{ItemId, ParticipantId, RoomId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Auction phase within a room.
///
/// `Finalizing` is transient: it is only ever observed inside the ledger's
/// settlement transaction, never by a client read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Bidding,
    Finalizing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Bidding => write!(f, "bidding"),
            Phase::Finalizing => write!(f, "finalizing"),
        }
    }
}

/// Result of a settled round, also what a duplicate finalize call reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub sold: bool,
    pub item: ItemId,
    pub final_price: Amount,
    pub winner: Option<ParticipantId>,
}

impl SaleOutcome {
    pub fn sold(item: ItemId, final_price: Amount, winner: ParticipantId) -> Self {
        Self {
            sold: true,
            item,
            final_price,
            winner: Some(winner),
        }
    }

    pub fn unsold(item: ItemId) -> Self {
        Self {
            sold: false,
            item,
            final_price: Amount::ZERO,
            winner: None,
        }
    }
}

/// The mutable heart of a room.
///
/// Invariant: `phase == Idle` iff `current_item`, `base_price`, `high_bid`,
/// `high_bidder`, `nominated_by`, and `deadline` are all `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionState {
    pub room: RoomId,
    pub phase: Phase,
    pub current_item: Option<ItemId>,
    /// Seat that nominated the live item; `None` for an auto-opened round.
    pub nominated_by: Option<ParticipantId>,
    pub base_price: Option<Amount>,
    pub high_bid: Option<Amount>,
    /// Seat currently winning; `None` only for an auto-opened round that
    /// has attracted no bid yet.
    pub high_bidder: Option<ParticipantId>,
    pub deadline: Option<Timestamp>,
    /// Conditional-write compare key; the ledger bumps it on every accepted
    /// mutation.
    pub version: u64,
    /// Most recently settled round, reported by duplicate finalize calls.
    pub last_outcome: Option<SaleOutcome>,
}

impl AuctionState {
    /// The freshly created singleton for a newly activated room.
    pub fn idle(room: RoomId) -> Self {
        Self {
            room,
            phase: Phase::Idle,
            current_item: None,
            nominated_by: None,
            base_price: None,
            high_bid: None,
            high_bidder: None,
            deadline: None,
            version: 0,
            last_outcome: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_bidding(&self) -> bool {
        self.phase == Phase::Bidding
    }

    /// True once the bidding window has elapsed.
    pub fn expired(&self, now: Timestamp) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// The same row with a round opened on `item`.
    pub fn with_round_opened(
        mut self,
        item: ItemId,
        nominated_by: Option<ParticipantId>,
        opening_price: Amount,
        deadline: Timestamp,
    ) -> Self {
        self.phase = Phase::Bidding;
        self.current_item = Some(item);
        self.nominated_by = nominated_by;
        self.base_price = Some(opening_price);
        self.high_bid = Some(opening_price);
        self.high_bidder = nominated_by;
        self.deadline = Some(deadline);
        self
    }

    /// The same row raised to a new high bid with the window restarted.
    pub fn with_raise(mut self, bidder: ParticipantId, amount: Amount, deadline: Timestamp) -> Self {
        self.high_bid = Some(amount);
        self.high_bidder = Some(bidder);
        self.deadline = Some(deadline);
        self
    }

    /// The same row reset to idle with the round's outcome recorded.
    pub fn with_round_settled(mut self, outcome: SaleOutcome) -> Self {
        self.phase = Phase::Idle;
        self.current_item = None;
        self.nominated_by = None;
        self.base_price = None;
        self.high_bid = None;
        self.high_bidder = None;
        self.deadline = None;
        self.last_outcome = Some(outcome);
        self
    }
}
