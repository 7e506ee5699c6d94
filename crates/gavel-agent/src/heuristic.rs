//! The production heuristic decision backend.
//!
//! Interest in an item is scored as a product of independent factors
//! (unmet quota need, budget health, remaining-slot urgency, desirability,
//! and price pressure relative to what the seat can still afford), then a
//! probabilistic go/no-go picks the action. Every emitted amount is clamped
//! so the constraint evaluator and increment rule still pass; anything that
//! would not pass degrades to skip.

use crate::config::AgentConfig;
use crate::provider::{
    BiddingContext, Decision, DecisionAction, DecisionProvider, NominationContext, ProviderError,
};
use async_trait::async_trait;
use gavel_engine::config::EngineConfig;
use gavel_engine::domain::constraints::max_affordable_bid;
use gavel_types::{Amount, Item, Participant, Room};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scoring-based decision backend.
pub struct HeuristicProvider {
    config: AgentConfig,
    engine: EngineConfig,
    rng: Mutex<StdRng>,
}

impl HeuristicProvider {
    pub fn new(config: AgentConfig, engine: EngineConfig) -> Self {
        Self {
            config,
            engine,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic variant for tests and reproducible simulations.
    pub fn with_seed(config: AgentConfig, engine: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            engine,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Interest in raising to `next_bid`, as a product of independent
    /// factors. Zero means hard-ineligible (quota full or unaffordable).
    fn interest(&self, room: &Room, seat: &Participant, item: &Item, next_bid: Amount) -> f64 {
        let quota_need = if item.quota_limited {
            if seat.quota_count >= room.config.quota_max {
                return 0.0;
            }
            let unmet = 1.0 - f64::from(seat.quota_count) / f64::from(room.config.quota_max.max(1));
            0.8 + 0.6 * unmet
        } else {
            1.0
        };

        let affordable = max_affordable_bid(&self.engine, seat);
        if next_bid > affordable {
            return 0.0;
        }

        let budget_health = (seat.budget_remaining.hundredths() as f64
            / room.config.purse.hundredths().max(1) as f64)
            .clamp(0.15, 1.0);
        let slot_urgency =
            0.4 + 0.6 * f64::from(seat.slots_remaining) / f64::from(room.config.squad_max.max(1));
        let desirability =
            (0.5 + f64::from(item.rating) / 100.0) * if item.marquee { 1.35 } else { 1.0 };
        let price_pressure = (1.0
            - next_bid.hundredths() as f64 / affordable.hundredths().max(1) as f64)
            .max(0.05);

        quota_need * budget_health * slot_urgency * desirability * price_pressure
    }
}

#[async_trait]
impl DecisionProvider for HeuristicProvider {
    async fn propose_nomination(
        &self,
        ctx: &NominationContext,
    ) -> Result<Decision, ProviderError> {
        if ctx.seats.is_empty() {
            return Ok(Decision::skip("no autonomous seat can nominate"));
        }
        if ctx.unsold.is_empty() {
            return Ok(Decision::skip("no unsold items left to nominate"));
        }

        let mut rng = self.rng.lock();
        let seat = &ctx.seats[rng.gen_range(0..ctx.seats.len())];
        let item = &ctx.unsold[rng.gen_range(0..ctx.unsold.len())];

        // Starting price lands in [floor, 1.5 x base], snapped to the 0.10
        // grid, and never above what the seat could pay if nobody raises.
        let floor = item.base_price.max(self.engine.nomination_floor);
        let ceiling = item.base_price.scale(3, 2).max(floor);
        let span = ceiling.hundredths() - floor.hundredths();
        let offset = if span == 0 { 0 } else { rng.gen_range(0..=span) };
        let mut price = Amount::from_hundredths(floor.hundredths() + offset / 10 * 10);

        let affordable = max_affordable_bid(&self.engine, seat);
        price = price.min(affordable);
        if price < floor {
            return Ok(Decision::skip(format!(
                "{} cannot cover the {} floor for {}",
                seat.name, floor, item.name
            )));
        }

        Ok(Decision {
            action: DecisionAction::Nominate {
                participant: seat.id,
                item: item.id,
                starting_price: price,
            },
            rationale: format!("{} nominates {} at {}", seat.name, item.name, price),
        })
    }

    async fn propose_bid(&self, ctx: &BiddingContext) -> Result<Decision, ProviderError> {
        if ctx.eligible.is_empty() {
            return Ok(Decision::skip("no eligible autonomous seat can raise"));
        }

        let mut rng = self.rng.lock();
        let seat = &ctx.eligible[rng.gen_range(0..ctx.eligible.len())];
        let interest = self.interest(&ctx.room, seat, &ctx.item, ctx.min_next_bid);
        if interest == 0.0 {
            return Ok(Decision::skip(format!(
                "{} is hard-ineligible for {}",
                seat.name, ctx.item.name
            )));
        }

        let go = (interest * self.config.bid_probability).clamp(0.0, 0.95);
        if !rng.gen_bool(go) {
            return Ok(Decision::skip(format!(
                "{} passes on {} (interest {:.2})",
                seat.name, ctx.item.name, interest
            )));
        }

        // Minimum legal raise, with an occasional jump on marquee items
        // from seats that can shoulder it.
        let mut amount = ctx.min_next_bid;
        if ctx.item.marquee
            && interest > 1.0
            && rng.gen_bool(self.config.marquee_jump_probability)
        {
            let jump = self.engine.large_increment * rng.gen_range(1..=4);
            amount = amount + jump;
        }
        let affordable = max_affordable_bid(&self.engine, seat);
        amount = amount.min(affordable);
        if amount < ctx.min_next_bid {
            return Ok(Decision::skip(format!(
                "{} cannot meet the minimum raise {}",
                seat.name, ctx.min_next_bid
            )));
        }

        Ok(Decision {
            action: DecisionAction::Bid {
                participant: seat.id,
                amount,
            },
            rationale: format!(
                "{} raises {} to {} (interest {:.2})",
                seat.name, ctx.item.name, amount, interest
            ),
        })
    }
}
