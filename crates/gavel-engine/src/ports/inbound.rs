//! Driving port: the command surface.
//!
//! Humans and autonomous agents submit through this same trait; the decision
//! engine is just another caller, never a privileged code path.

use crate::domain::errors::AuctionResult;
use crate::domain::receipts::{BidReceipt, NominationReceipt, RoomView};
use async_trait::async_trait;
use gavel_types::{Amount, Bid, ItemId, ParticipantId, RoomId, SaleOutcome};

/// Primary auction API.
///
/// All commands are short-lived request/response operations; none blocks
/// waiting on other participants. Losing writers receive `Superseded` and
/// decide for themselves whether to recompute and resubmit.
#[async_trait]
pub trait AuctionApi: Send + Sync {
    /// Activate a `waiting` room and create its `AuctionState` singleton.
    ///
    /// Idempotent: an already-active room returns its current view.
    async fn start_room(&self, room: RoomId) -> AuctionResult<RoomView>;

    /// Put an item up for bidding with an opening bid attributed to the
    /// nominator. Legal only while `idle`.
    async fn nominate(
        &self,
        room: RoomId,
        item: ItemId,
        nominator: ParticipantId,
        starting_price: Amount,
    ) -> AuctionResult<NominationReceipt>;

    /// Auto-open a round on a random unsold item at its base price with no
    /// bidder attributed. Legal only while `idle`.
    async fn open_next(&self, room: RoomId) -> AuctionResult<NominationReceipt>;

    /// Raise the live item's high bid and restart the bidding window.
    async fn place_bid(
        &self,
        room: RoomId,
        bidder: ParticipantId,
        amount: Amount,
    ) -> AuctionResult<BidReceipt>;

    /// Settle an expired round: allocate to the high bidder or mark the item
    /// unsold, then return the room to `idle`.
    ///
    /// Idempotent under duplicate invocation: a caller that observes the
    /// round already settled receives the settled outcome, not an error.
    async fn expire_and_finalize(&self, room: RoomId) -> AuctionResult<SaleOutcome>;

    /// Newest-first slice of the room's bid history.
    async fn recent_bids(&self, room: RoomId, limit: usize) -> AuctionResult<Vec<Bid>>;

    /// Read-only snapshot of room, state, and participants.
    async fn room_view(&self, room: RoomId) -> AuctionResult<RoomView>;

    /// Mark an idle room `completed`; no further rounds can open.
    async fn complete_room(&self, room: RoomId) -> AuctionResult<RoomView>;
}
