//! Core domain entities.
//!
//! `Room`, `Participant`, and `Item` are the configuration side of the
//! system: a room is immutable after creation except for `status`, items are
//! immutable catalog rows, and participant balances are mutated exclusively
//! by sale finalization. `Bid` and `Allocation` are append-only history.

use crate::amount::Amount;
use crate::ids::{ItemId, ParticipantId, RoomId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Room lifecycle: `waiting` (filling seats) -> `active` -> `completed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Active,
    Completed,
}

/// Per-room configuration, fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Starting budget per participant.
    pub purse: Amount,
    /// Minimum roster size a participant must be able to fill.
    pub squad_min: u8,
    /// Roster slots per participant.
    pub squad_max: u8,
    /// Cap on quota-limited items per participant.
    pub quota_max: u8,
    /// Nomination window length.
    pub nomination_secs: u64,
    /// Bidding window length; every accepted bid restarts it.
    pub bid_timer_secs: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            purse: Amount::from_units(100),
            squad_min: 11,
            squad_max: 15,
            quota_max: 8,
            nomination_secs: 30,
            bid_timer_secs: 12,
        }
    }
}

/// One isolated auction instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Short join code shown to clients.
    pub code: String,
    pub config: RoomConfig,
    pub status: RoomStatus,
}

impl Room {
    pub fn new(code: impl Into<String>, config: RoomConfig) -> Self {
        Self {
            id: RoomId::new(),
            code: code.into(),
            config,
            status: RoomStatus::Waiting,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }
}

/// Who operates a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Human,
    Autonomous,
}

/// A seat in a room.
///
/// `budget_remaining`, `slots_remaining`, and `quota_count` move only when a
/// sale settles; a standing high bid reserves nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub room: RoomId,
    pub name: String,
    pub kind: ParticipantKind,
    pub budget_remaining: Amount,
    pub slots_remaining: u8,
    pub quota_count: u8,
}

impl Participant {
    /// A fresh seat with the room's full purse and roster.
    pub fn new(room: &Room, name: impl Into<String>, kind: ParticipantKind) -> Self {
        Self {
            id: ParticipantId::new(),
            room: room.id,
            name: name.into(),
            kind,
            budget_remaining: room.config.purse,
            slots_remaining: room.config.squad_max,
            quota_count: 0,
        }
    }

    pub fn is_autonomous(&self) -> bool {
        self.kind == ParticipantKind::Autonomous
    }
}

/// A static catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Free-form class label ("batter", "pacer", ...) carried into the
    /// allocation row for roster views.
    pub category: String,
    /// Counts against the room's per-participant quota.
    pub quota_limited: bool,
    pub base_price: Amount,
    /// Headline item; agents treat these as jump-bid candidates.
    pub marquee: bool,
    /// Flavor rating in `0..=100`, advisory only.
    pub rating: u8,
}

impl Item {
    pub fn new(name: impl Into<String>, category: impl Into<String>, base_price: Amount) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            category: category.into(),
            quota_limited: false,
            base_price,
            marquee: false,
            rating: 50,
        }
    }

    pub fn quota_limited(mut self) -> Self {
        self.quota_limited = true;
        self
    }

    pub fn marquee(mut self) -> Self {
        self.marquee = true;
        self
    }

    pub fn rated(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }
}

/// Append-only bid history row. Write-once; never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub room: RoomId,
    pub item: ItemId,
    pub participant: ParticipantId,
    pub amount: Amount,
    pub at: Timestamp,
}

impl Bid {
    pub fn new(
        room: RoomId,
        item: ItemId,
        participant: ParticipantId,
        amount: Amount,
        at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room,
            item,
            participant,
            amount,
            at,
        }
    }
}

/// Permanent proof an item was sold in a room. At most one per item per room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Uuid,
    pub room: RoomId,
    pub participant: ParticipantId,
    pub item: ItemId,
    pub category: String,
    pub quota_limited: bool,
    pub price: Amount,
    pub at: Timestamp,
}

impl Allocation {
    pub fn new(
        room: RoomId,
        participant: ParticipantId,
        item: &Item,
        price: Amount,
        at: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            room,
            participant,
            item: item.id,
            category: item.category.clone(),
            quota_limited: item.quota_limited,
            price,
            at,
        }
    }
}
