//! The decision-provider port.
//!
//! The agent service is indifferent to which backend produced a decision: a
//! local heuristic, a hosted language model, or a scripted test double all
//! return the same structured `{action, rationale}` result.

use async_trait::async_trait;
use gavel_types::{Amount, AuctionState, Item, ItemId, Participant, ParticipantId, Room};
use thiserror::Error;

/// What an autonomous seat wants to do this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecisionAction {
    Nominate {
        participant: ParticipantId,
        item: ItemId,
        starting_price: Amount,
    },
    Bid {
        participant: ParticipantId,
        amount: Amount,
    },
    Skip,
}

/// A structured decision with the backend's stated reasoning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub action: DecisionAction,
    pub rationale: String,
}

impl Decision {
    pub fn skip(rationale: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::Skip,
            rationale: rationale.into(),
        }
    }
}

/// Everything a backend may consider when picking a nomination.
#[derive(Clone, Debug)]
pub struct NominationContext {
    pub room: Room,
    /// Autonomous seats still holding slots and budget.
    pub seats: Vec<Participant>,
    /// Catalog entries without an allocation in this room.
    pub unsold: Vec<Item>,
}

/// Everything a backend may consider when deciding a raise.
#[derive(Clone, Debug)]
pub struct BiddingContext {
    pub room: Room,
    pub state: AuctionState,
    pub item: Item,
    /// Autonomous seats that could legally place the minimum raise and do
    /// not already hold the high bid.
    pub eligible: Vec<Participant>,
    pub min_next_bid: Amount,
}

/// Backend failures. Never escalated past the agent service.
#[derive(Clone, Debug, Error)]
pub enum ProviderError {
    #[error("decision backend failed: {0}")]
    Backend(String),
}

/// Pluggable reasoning backend for autonomous participants.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Pick a seat/item pair and a starting price, or skip.
    async fn propose_nomination(&self, ctx: &NominationContext)
        -> Result<Decision, ProviderError>;

    /// Decide whether one of the eligible seats raises, or skip.
    async fn propose_bid(&self, ctx: &BiddingContext) -> Result<Decision, ProviderError>;
}
