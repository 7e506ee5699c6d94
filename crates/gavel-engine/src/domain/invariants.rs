//! Domain invariants as checkable predicates.
//!
//! Pure boolean functions over ledger snapshots. The engine enforces these
//! in its command handlers; the integration suite re-checks them after every
//! command sequence.

use crate::config::EngineConfig;
use crate::domain::increment::min_next_bid;
use gavel_types::{Allocation, AuctionState, Bid, Participant, Phase, RoomConfig};
use std::collections::HashMap;

/// An idle room carries no round fields; a live round carries all of them
/// except (for auto-opened rounds) the high bidder.
pub fn invariant_phase_consistency(state: &AuctionState) -> bool {
    match state.phase {
        Phase::Idle => {
            state.current_item.is_none()
                && state.nominated_by.is_none()
                && state.base_price.is_none()
                && state.high_bid.is_none()
                && state.high_bidder.is_none()
                && state.deadline.is_none()
        }
        Phase::Bidding | Phase::Finalizing => {
            state.current_item.is_some() && state.base_price.is_some() && state.high_bid.is_some()
                && state.deadline.is_some()
        }
    }
}

/// While a round is live the high bid never undercuts the opening price.
pub fn invariant_high_bid_bounds(state: &AuctionState) -> bool {
    match (state.phase, state.base_price, state.high_bid) {
        (Phase::Idle, _, _) => true,
        (_, Some(base), Some(high)) => high >= base,
        _ => false,
    }
}

/// An item is allocated at most once per room.
pub fn invariant_single_allocation(allocations: &[Allocation]) -> bool {
    let mut seen = std::collections::HashSet::new();
    allocations.iter().all(|a| seen.insert(a.item))
}

/// Balances never go negative and quota counts respect the room cap.
pub fn invariant_participant_balances(participants: &[Participant], room: &RoomConfig) -> bool {
    participants
        .iter()
        .all(|p| p.slots_remaining <= room.squad_max && p.quota_count <= room.quota_max)
}

/// Within one bidding round the accepted amounts strictly increase, and
/// each raise meets the increment rule evaluated at the prior high bid.
///
/// Takes a chronological history and groups it per item; an item that went
/// unsold and was re-auctioned starts a fresh sequence, so callers covering
/// such histories should pass per-round slices.
pub fn invariant_bid_monotonicity(config: &EngineConfig, bids: &[Bid]) -> bool {
    let mut per_item: HashMap<_, Vec<&Bid>> = HashMap::new();
    for bid in bids {
        per_item.entry(bid.item).or_default().push(bid);
    }
    per_item.values().all(|history| {
        history.windows(2).all(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            next.amount > prev.amount && next.amount >= min_next_bid(config, prev.amount)
        })
    })
}
