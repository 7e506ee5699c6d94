//! Typed success payloads for engine commands.

use gavel_types::{Amount, AuctionState, ItemId, Participant, ParticipantId, Phase, Room, Timestamp};
use serde::{Deserialize, Serialize};

/// Result of a nomination or an auto-opened round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominationReceipt {
    pub phase: Phase,
    pub item: ItemId,
    pub opening_price: Amount,
    /// `None` for an auto-opened round: nobody holds the opening bid.
    pub high_bidder: Option<ParticipantId>,
    pub deadline: Timestamp,
    pub min_next_bid: Amount,
}

/// Result of an accepted bid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidReceipt {
    pub high_bid: Amount,
    pub high_bidder: ParticipantId,
    pub deadline: Timestamp,
    pub min_next_bid: Amount,
}

/// Read-only room snapshot; the shape observers broadcast from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomView {
    pub room: Room,
    pub state: AuctionState,
    pub participants: Vec<Participant>,
}
