//! Driven ports: storage and time.
//!
//! The ledger contract is conditional-update plus one transactional
//! multi-row write; any store honoring it (in-memory, SQL, KV) can back the
//! engine. The clock is abstracted so tests control expiry deterministically.

use crate::domain::errors::AuctionError;
use async_trait::async_trait;
use gavel_types::{
    Allocation, AuctionState, Bid, Item, ItemId, Participant, ParticipantId, Room, RoomId,
    RoomStatus, Timestamp,
};
use thiserror::Error;

/// Storage-layer errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Conditional write lost: the row moved since the caller's read.
    #[error("conditional write lost: expected version {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    #[error("room {0} not found")]
    RoomMissing(RoomId),

    #[error("participant {0} not found")]
    ParticipantMissing(ParticipantId),

    #[error("item {0} not found")]
    ItemMissing(ItemId),

    /// Room exists but was never activated (no state row).
    #[error("auction state for room {0} not created")]
    StateMissing(RoomId),

    /// Connectivity or transaction failure; nothing was persisted.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AuctionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { .. } => AuctionError::Superseded,
            StoreError::RoomMissing(room) => AuctionError::RoomNotFound(room),
            StoreError::ParticipantMissing(id) => AuctionError::ParticipantNotFound(id),
            StoreError::ItemMissing(id) => AuctionError::ItemNotFound(id),
            StoreError::StateMissing(room) => AuctionError::RoomNotActive(room),
            StoreError::Unavailable(reason) => AuctionError::StorageUnavailable(reason),
        }
    }
}

/// The winning-path settlement, applied as one all-or-nothing transaction.
#[derive(Clone, Debug)]
pub struct SaleCommit {
    pub allocation: Allocation,
    /// The state row reset to idle with the round's outcome recorded.
    pub next_state: AuctionState,
}

/// Durable, transactional storage for rooms, participants, items, auction
/// state, bid history, and allocations.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn room(&self, room: RoomId) -> Result<Room, StoreError>;

    async fn update_room_status(&self, room: RoomId, status: RoomStatus)
        -> Result<(), StoreError>;

    async fn participant(
        &self,
        room: RoomId,
        participant: ParticipantId,
    ) -> Result<Participant, StoreError>;

    async fn participants(&self, room: RoomId) -> Result<Vec<Participant>, StoreError>;

    async fn item(&self, item: ItemId) -> Result<Item, StoreError>;

    /// Catalog entries without an allocation in this room.
    async fn unsold_items(&self, room: RoomId) -> Result<Vec<Item>, StoreError>;

    async fn auction_state(&self, room: RoomId) -> Result<AuctionState, StoreError>;

    /// Create the room's singleton state row. Idempotent: an existing row is
    /// left untouched.
    async fn create_auction_state(&self, state: AuctionState) -> Result<(), StoreError>;

    /// Replace the state row only if its version still equals `expected`.
    /// The stored row's version becomes `expected + 1`. Returns the row as
    /// stored.
    async fn compare_and_swap_state(
        &self,
        expected: u64,
        next: AuctionState,
    ) -> Result<AuctionState, StoreError>;

    async fn append_bid(&self, bid: Bid) -> Result<(), StoreError>;

    /// Newest-first bid history for a room.
    async fn recent_bids(&self, room: RoomId, limit: usize) -> Result<Vec<Bid>, StoreError>;

    async fn allocation_for_item(
        &self,
        room: RoomId,
        item: ItemId,
    ) -> Result<Option<Allocation>, StoreError>;

    async fn allocations(&self, room: RoomId) -> Result<Vec<Allocation>, StoreError>;

    /// Settle a won round in one transaction: insert the allocation, debit
    /// the winner's budget and roster slot (and quota count if applicable),
    /// and reset the state row, all conditioned on the state version still
    /// equaling `expected`. A partial application must be impossible.
    async fn commit_sale(&self, expected: u64, sale: SaleCommit)
        -> Result<AuctionState, StoreError>;
}

/// Time source for consistent deadline handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually advanced time source for tests and simulations.
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}
