//! In-memory ledger.
//!
//! A `parking_lot::RwLock` arena keyed by room id, realizing the
//! conditional-update contract of `LedgerStore`: state swaps are versioned,
//! and `commit_sale` applies the allocation insert, the winner's balance
//! updates, and the state reset under one write guard, all or nothing.

use crate::ports::outbound::{LedgerStore, SaleCommit, StoreError};
use async_trait::async_trait;
use gavel_types::{
    Allocation, AuctionState, Bid, Item, ItemId, Participant, ParticipantId, Room, RoomId,
    RoomStatus,
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Everything one room owns.
#[derive(Debug)]
struct RoomShard {
    room: Room,
    participants: Vec<Participant>,
    state: Option<AuctionState>,
    bids: Vec<Bid>,
    allocations: Vec<Allocation>,
    allocated_items: HashSet<ItemId>,
}

impl RoomShard {
    fn new(room: Room, participants: Vec<Participant>) -> Self {
        Self {
            room,
            participants,
            state: None,
            bids: Vec::new(),
            allocations: Vec::new(),
            allocated_items: HashSet::new(),
        }
    }
}

#[derive(Debug, Default)]
struct LedgerInner {
    catalog: Vec<Item>,
    rooms: HashMap<RoomId, RoomShard>,
}

/// In-memory implementation of `LedgerStore`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    inner: RwLock<LedgerInner>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a room and its seats.
    pub fn insert_room(&self, room: Room, participants: Vec<Participant>) {
        let mut inner = self.inner.write();
        inner
            .rooms
            .insert(room.id, RoomShard::new(room, participants));
    }

    /// Seed catalog entries.
    pub fn insert_items(&self, items: Vec<Item>) {
        let mut inner = self.inner.write();
        inner.catalog.extend(items);
    }

    /// Overwrite one seat's resources. Seeding/test support only; live
    /// balances move exclusively through `commit_sale`.
    pub fn set_participant_resources(
        &self,
        room: RoomId,
        participant: ParticipantId,
        budget: gavel_types::Amount,
        slots: u8,
        quota: u8,
    ) -> Result<(), StoreError> {
        self.with_shard_mut(room, |shard| {
            let seat = shard
                .participants
                .iter_mut()
                .find(|p| p.id == participant)
                .ok_or(StoreError::ParticipantMissing(participant))?;
            seat.budget_remaining = budget;
            seat.slots_remaining = slots;
            seat.quota_count = quota;
            Ok(())
        })
    }

    fn with_shard<R>(
        &self,
        room: RoomId,
        f: impl FnOnce(&RoomShard) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let inner = self.inner.read();
        let shard = inner.rooms.get(&room).ok_or(StoreError::RoomMissing(room))?;
        f(shard)
    }

    fn with_shard_mut<R>(
        &self,
        room: RoomId,
        f: impl FnOnce(&mut RoomShard) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut inner = self.inner.write();
        let shard = inner
            .rooms
            .get_mut(&room)
            .ok_or(StoreError::RoomMissing(room))?;
        f(shard)
    }

    /// Version check shared by every conditional write.
    fn check_version(shard: &RoomShard, expected: u64) -> Result<u64, StoreError> {
        let current = shard
            .state
            .as_ref()
            .ok_or(StoreError::StateMissing(shard.room.id))?
            .version;
        if current != expected {
            return Err(StoreError::VersionConflict {
                expected,
                actual: current,
            });
        }
        Ok(current)
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn room(&self, room: RoomId) -> Result<Room, StoreError> {
        self.with_shard(room, |shard| Ok(shard.room.clone()))
    }

    async fn update_room_status(
        &self,
        room: RoomId,
        status: RoomStatus,
    ) -> Result<(), StoreError> {
        self.with_shard_mut(room, |shard| {
            shard.room.status = status;
            Ok(())
        })
    }

    async fn participant(
        &self,
        room: RoomId,
        participant: ParticipantId,
    ) -> Result<Participant, StoreError> {
        self.with_shard(room, |shard| {
            shard
                .participants
                .iter()
                .find(|p| p.id == participant)
                .cloned()
                .ok_or(StoreError::ParticipantMissing(participant))
        })
    }

    async fn participants(&self, room: RoomId) -> Result<Vec<Participant>, StoreError> {
        self.with_shard(room, |shard| Ok(shard.participants.clone()))
    }

    async fn item(&self, item: ItemId) -> Result<Item, StoreError> {
        let inner = self.inner.read();
        inner
            .catalog
            .iter()
            .find(|i| i.id == item)
            .cloned()
            .ok_or(StoreError::ItemMissing(item))
    }

    async fn unsold_items(&self, room: RoomId) -> Result<Vec<Item>, StoreError> {
        let inner = self.inner.read();
        let shard = inner.rooms.get(&room).ok_or(StoreError::RoomMissing(room))?;
        Ok(inner
            .catalog
            .iter()
            .filter(|i| !shard.allocated_items.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn auction_state(&self, room: RoomId) -> Result<AuctionState, StoreError> {
        self.with_shard(room, |shard| {
            shard
                .state
                .clone()
                .ok_or(StoreError::StateMissing(room))
        })
    }

    async fn create_auction_state(&self, state: AuctionState) -> Result<(), StoreError> {
        self.with_shard_mut(state.room, |shard| {
            if shard.state.is_none() {
                shard.state = Some(state);
            }
            Ok(())
        })
    }

    async fn compare_and_swap_state(
        &self,
        expected: u64,
        mut next: AuctionState,
    ) -> Result<AuctionState, StoreError> {
        self.with_shard_mut(next.room, |shard| {
            Self::check_version(shard, expected)?;
            next.version = expected + 1;
            shard.state = Some(next.clone());
            Ok(next)
        })
    }

    async fn append_bid(&self, bid: Bid) -> Result<(), StoreError> {
        self.with_shard_mut(bid.room, |shard| {
            shard.bids.push(bid);
            Ok(())
        })
    }

    async fn recent_bids(&self, room: RoomId, limit: usize) -> Result<Vec<Bid>, StoreError> {
        self.with_shard(room, |shard| {
            Ok(shard.bids.iter().rev().take(limit).cloned().collect())
        })
    }

    async fn allocation_for_item(
        &self,
        room: RoomId,
        item: ItemId,
    ) -> Result<Option<Allocation>, StoreError> {
        self.with_shard(room, |shard| {
            Ok(shard.allocations.iter().find(|a| a.item == item).cloned())
        })
    }

    async fn allocations(&self, room: RoomId) -> Result<Vec<Allocation>, StoreError> {
        self.with_shard(room, |shard| Ok(shard.allocations.clone()))
    }

    async fn commit_sale(
        &self,
        expected: u64,
        sale: SaleCommit,
    ) -> Result<AuctionState, StoreError> {
        let SaleCommit {
            allocation,
            mut next_state,
        } = sale;
        self.with_shard_mut(next_state.room, |shard| {
            Self::check_version(shard, expected)?;

            // Validate every leg before touching anything: the transaction
            // either applies in full or not at all.
            if shard.allocated_items.contains(&allocation.item) {
                return Err(StoreError::Unavailable(format!(
                    "item {} already allocated",
                    allocation.item
                )));
            }
            let winner_idx = shard
                .participants
                .iter()
                .position(|p| p.id == allocation.participant)
                .ok_or(StoreError::ParticipantMissing(allocation.participant))?;
            let winner = &shard.participants[winner_idx];
            let new_budget = winner
                .budget_remaining
                .checked_sub(allocation.price)
                .ok_or_else(|| {
                    StoreError::Unavailable("winner budget would go negative".into())
                })?;
            let new_slots = winner.slots_remaining.checked_sub(1).ok_or_else(|| {
                StoreError::Unavailable("winner has no roster slot to fill".into())
            })?;

            let winner = &mut shard.participants[winner_idx];
            winner.budget_remaining = new_budget;
            winner.slots_remaining = new_slots;
            if allocation.quota_limited {
                winner.quota_count += 1;
            }
            shard.allocated_items.insert(allocation.item);
            shard.allocations.push(allocation);
            next_state.version = expected + 1;
            shard.state = Some(next_state.clone());
            Ok(next_state)
        })
    }
}
