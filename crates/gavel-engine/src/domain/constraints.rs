//! The constraint evaluator.
//!
//! Pure predicates over `(participant, item, candidate amount)`, shared by
//! the human command path and the autonomous decision engine. Violations are
//! reported in a fixed order (budget, then slots, then quota) so callers and
//! tests see deterministic error kinds.

use crate::config::EngineConfig;
use crate::domain::errors::{AuctionError, AuctionResult};
use gavel_types::{Amount, Item, Participant, RoomConfig};

/// Budget a participant must keep in hand after winning at `amount`: the
/// per-slot reserve times the slots that would still be unfilled.
///
/// Guarantees no participant can bid itself into a state where it cannot
/// fill its mandatory remaining slots.
pub fn slot_reserve_floor(config: &EngineConfig, slots_remaining: u8) -> Amount {
    config.slot_reserve * u64::from(slots_remaining.saturating_sub(1))
}

/// Largest bid `participant` could have accepted right now.
///
/// Zero when the reserve floor already swallows the whole budget.
pub fn max_affordable_bid(config: &EngineConfig, participant: &Participant) -> Amount {
    participant
        .budget_remaining
        .saturating_sub(slot_reserve_floor(config, participant.slots_remaining))
}

/// Validate a prospective bid. All three rules must hold; the first violated
/// rule (budget, slots, quota) is returned.
pub fn evaluate_bid(
    config: &EngineConfig,
    room: &RoomConfig,
    participant: &Participant,
    item: &Item,
    amount: Amount,
) -> AuctionResult<()> {
    let reserve = slot_reserve_floor(config, participant.slots_remaining);
    let within_budget = participant
        .budget_remaining
        .checked_sub(amount)
        .map(|left| left >= reserve)
        .unwrap_or(false);
    if !within_budget {
        return Err(AuctionError::BudgetExceeded {
            offered: amount,
            available: participant.budget_remaining,
            reserve,
        });
    }

    if participant.slots_remaining == 0 {
        return Err(AuctionError::SlotsExhausted);
    }

    if item.quota_limited && participant.quota_count >= room.quota_max {
        return Err(AuctionError::QuotaExceeded {
            held: participant.quota_count,
            max: room.quota_max,
        });
    }

    Ok(())
}
