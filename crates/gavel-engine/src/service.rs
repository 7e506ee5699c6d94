//! The auction state machine.
//!
//! `AuctionService` orchestrates every command: validate phase, validate
//! price, delegate eligibility to the constraint evaluator, then commit
//! through the ledger's conditional write. Correctness under concurrent
//! writers rests entirely on that final step: two bidders racing to raise
//! the same stale high bid cannot both pass the version check.

use crate::config::EngineConfig;
use crate::domain::constraints::evaluate_bid;
use crate::domain::errors::{AuctionError, AuctionResult};
use crate::domain::increment::min_next_bid;
use crate::domain::receipts::{BidReceipt, NominationReceipt, RoomView};
use crate::ports::inbound::AuctionApi;
use crate::ports::outbound::{LedgerStore, SaleCommit, StoreError, TimeSource};
use async_trait::async_trait;
use gavel_types::{
    Allocation, Amount, AuctionState, Bid, ItemId, ParticipantId, Phase, Room, RoomId, RoomStatus,
    SaleOutcome, Timestamp,
};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Auction engine service, generic over its ledger and clock.
pub struct AuctionService<L, T>
where
    L: LedgerStore,
    T: TimeSource,
{
    config: EngineConfig,
    store: Arc<L>,
    clock: Arc<T>,
}

impl<L, T> AuctionService<L, T>
where
    L: LedgerStore,
    T: TimeSource,
{
    pub fn new(store: Arc<L>, clock: Arc<T>) -> Self {
        Self {
            config: EngineConfig::default(),
            store,
            clock,
        }
    }

    pub fn with_config(config: EngineConfig, store: Arc<L>, clock: Arc<T>) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the room and require it to be accepting auction commands.
    async fn active_room(&self, room_id: RoomId) -> AuctionResult<Room> {
        let room = self.store.room(room_id).await?;
        if !room.is_active() {
            return Err(AuctionError::RoomNotActive(room_id));
        }
        Ok(room)
    }

    fn deadline_after(&self, room: &Room, now: Timestamp) -> Timestamp {
        now + room.config.bid_timer_secs * 1_000
    }

    /// Open a round via the conditional write and report the receipt.
    async fn open_round(
        &self,
        room: &Room,
        state: AuctionState,
        item: ItemId,
        nominated_by: Option<ParticipantId>,
        opening_price: Amount,
    ) -> AuctionResult<NominationReceipt> {
        let now = self.clock.now();
        let deadline = self.deadline_after(room, now);
        let expected = state.version;
        let next = state.with_round_opened(item, nominated_by, opening_price, deadline);
        self.store.compare_and_swap_state(expected, next).await?;

        if let Some(nominator) = nominated_by {
            // The nomination itself is the opening bid.
            self.store
                .append_bid(Bid::new(room.id, item, nominator, opening_price, now))
                .await?;
        }

        info!(
            room = %room.id,
            %item,
            opening_price = %opening_price,
            nominated = nominated_by.is_some(),
            "round opened"
        );

        Ok(NominationReceipt {
            phase: Phase::Bidding,
            item,
            opening_price,
            high_bidder: nominated_by,
            deadline,
            min_next_bid: min_next_bid(&self.config, opening_price),
        })
    }

    /// Report the outcome a concurrent finalizer already settled.
    async fn settled_outcome(&self, room_id: RoomId) -> AuctionResult<SaleOutcome> {
        let fresh = self.store.auction_state(room_id).await?;
        fresh.last_outcome.ok_or(AuctionError::Superseded)
    }
}

#[async_trait]
impl<L, T> AuctionApi for AuctionService<L, T>
where
    L: LedgerStore,
    T: TimeSource,
{
    async fn start_room(&self, room_id: RoomId) -> AuctionResult<RoomView> {
        let room = self.store.room(room_id).await?;
        match room.status {
            RoomStatus::Completed => Err(AuctionError::RoomNotActive(room_id)),
            RoomStatus::Active => self.room_view(room_id).await,
            RoomStatus::Waiting => {
                self.store
                    .update_room_status(room_id, RoomStatus::Active)
                    .await?;
                self.store
                    .create_auction_state(AuctionState::idle(room_id))
                    .await?;
                info!(room = %room_id, "room activated");
                self.room_view(room_id).await
            }
        }
    }

    async fn nominate(
        &self,
        room_id: RoomId,
        item_id: ItemId,
        nominator: ParticipantId,
        starting_price: Amount,
    ) -> AuctionResult<NominationReceipt> {
        let room = self.active_room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;
        if !state.is_idle() {
            return Err(AuctionError::InvalidPhase { actual: state.phase });
        }

        let item = self.store.item(item_id).await?;
        // Referential checks before price checks: a bad seat or a sold item
        // is rejected regardless of the offered price.
        self.store.participant(room_id, nominator).await?;
        if self
            .store
            .allocation_for_item(room_id, item_id)
            .await?
            .is_some()
        {
            return Err(AuctionError::ItemAlreadySold(item_id));
        }

        let floor = item.base_price.max(self.config.nomination_floor);
        if starting_price < floor {
            return Err(AuctionError::PriceTooLow {
                offered: starting_price,
                minimum: floor,
            });
        }

        self.open_round(&room, state, item_id, Some(nominator), starting_price)
            .await
    }

    async fn open_next(&self, room_id: RoomId) -> AuctionResult<NominationReceipt> {
        let room = self.active_room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;
        if !state.is_idle() {
            return Err(AuctionError::InvalidPhase { actual: state.phase });
        }

        let unsold = self.store.unsold_items(room_id).await?;
        if unsold.is_empty() {
            return Err(AuctionError::NoItemsRemaining);
        }
        let pick = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..unsold.len())
        };
        let item = &unsold[pick];
        let opening_price = item.base_price.max(self.config.nomination_floor);

        // No opening bid is attributed: the item can go unsold if nobody
        // raises before the deadline.
        self.open_round(&room, state, item.id, None, opening_price)
            .await
    }

    async fn place_bid(
        &self,
        room_id: RoomId,
        bidder: ParticipantId,
        amount: Amount,
    ) -> AuctionResult<BidReceipt> {
        let room = self.active_room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;
        let (Some(item_id), Some(current_high)) = (state.current_item, state.high_bid) else {
            return Err(AuctionError::InvalidPhase { actual: state.phase });
        };
        if !state.is_bidding() {
            return Err(AuctionError::InvalidPhase { actual: state.phase });
        }

        let now = self.clock.now();
        if state.expired(now) {
            return Err(AuctionError::WindowExpired);
        }

        let minimum = min_next_bid(&self.config, current_high);
        if amount < minimum {
            return Err(AuctionError::BidTooLow {
                offered: amount,
                minimum,
            });
        }

        let seat = self.store.participant(room_id, bidder).await?;
        let item = self.store.item(item_id).await?;
        evaluate_bid(&self.config, &room.config, &seat, &item, amount)?;

        let deadline = self.deadline_after(&room, now);
        let expected = state.version;
        let next = state.with_raise(bidder, amount, deadline);
        self.store.compare_and_swap_state(expected, next).await?;
        self.store
            .append_bid(Bid::new(room_id, item_id, bidder, amount, now))
            .await?;

        debug!(
            room = %room_id,
            %item_id,
            bidder = %bidder,
            amount = %amount,
            "bid accepted"
        );

        Ok(BidReceipt {
            high_bid: amount,
            high_bidder: bidder,
            deadline,
            min_next_bid: min_next_bid(&self.config, amount),
        })
    }

    async fn expire_and_finalize(&self, room_id: RoomId) -> AuctionResult<SaleOutcome> {
        self.store.room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;

        match state.phase {
            // A duplicate call lands after the transition: report the
            // already-settled outcome instead of erroring.
            Phase::Idle => state
                .last_outcome
                .ok_or(AuctionError::InvalidPhase { actual: Phase::Idle }),
            Phase::Finalizing => Err(AuctionError::InvalidPhase {
                actual: Phase::Finalizing,
            }),
            Phase::Bidding => {
                let now = self.clock.now();
                if !state.expired(now) {
                    return Err(AuctionError::NotYetExpired);
                }
                let Some(item_id) = state.current_item else {
                    return Err(AuctionError::InvalidPhase { actual: state.phase });
                };

                match (state.high_bidder, state.high_bid) {
                    (Some(winner), Some(price)) if !price.is_zero() => {
                        let item = self.store.item(item_id).await?;
                        let outcome = SaleOutcome::sold(item_id, price, winner);
                        let allocation = Allocation::new(room_id, winner, &item, price, now);
                        let expected = state.version;
                        let next_state = state.with_round_settled(outcome);
                        match self
                            .store
                            .commit_sale(
                                expected,
                                SaleCommit {
                                    allocation,
                                    next_state,
                                },
                            )
                            .await
                        {
                            Ok(_) => {
                                info!(
                                    room = %room_id,
                                    %item_id,
                                    winner = %winner,
                                    price = %price,
                                    "item sold"
                                );
                                Ok(outcome)
                            }
                            Err(StoreError::VersionConflict { .. }) => {
                                warn!(room = %room_id, "lost finalization race");
                                self.settled_outcome(room_id).await
                            }
                            Err(err) => Err(err.into()),
                        }
                    }
                    _ => {
                        let outcome = SaleOutcome::unsold(item_id);
                        let expected = state.version;
                        let next = state.with_round_settled(outcome);
                        match self.store.compare_and_swap_state(expected, next).await {
                            Ok(_) => {
                                info!(room = %room_id, %item_id, "item went unsold");
                                Ok(outcome)
                            }
                            Err(StoreError::VersionConflict { .. }) => {
                                warn!(room = %room_id, "lost finalization race");
                                self.settled_outcome(room_id).await
                            }
                            Err(err) => Err(err.into()),
                        }
                    }
                }
            }
        }
    }

    async fn recent_bids(&self, room_id: RoomId, limit: usize) -> AuctionResult<Vec<Bid>> {
        Ok(self.store.recent_bids(room_id, limit).await?)
    }

    async fn room_view(&self, room_id: RoomId) -> AuctionResult<RoomView> {
        let room = self.store.room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;
        let participants = self.store.participants(room_id).await?;
        Ok(RoomView {
            room,
            state,
            participants,
        })
    }

    async fn complete_room(&self, room_id: RoomId) -> AuctionResult<RoomView> {
        let room = self.active_room(room_id).await?;
        let state = self.store.auction_state(room_id).await?;
        if !state.is_idle() {
            return Err(AuctionError::InvalidPhase { actual: state.phase });
        }
        self.store
            .update_room_status(room.id, RoomStatus::Completed)
            .await?;
        info!(room = %room_id, "room completed");
        self.room_view(room_id).await
    }
}
