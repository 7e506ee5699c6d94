//! Agent service: the cadence entry points.
//!
//! `decide_nomination` and `decide_bidding` are invoked by the runtime
//! scheduler on the same cadence a human would act. Both gather context,
//! consult the provider, re-validate the proposal, and submit through the
//! human command surface. Every failure path returns `TickOutcome::Skipped`:
//! an autonomous seat can lose a race or hit a constraint, but it can
//! never corrupt auction state or surface an error to users.

use crate::provider::{BiddingContext, DecisionAction, DecisionProvider, NominationContext};
use gavel_engine::domain::constraints::{evaluate_bid, max_affordable_bid};
use gavel_engine::domain::increment::min_next_bid;
use gavel_engine::domain::receipts::{BidReceipt, NominationReceipt};
use gavel_engine::ports::inbound::AuctionApi;
use gavel_engine::ports::outbound::LedgerStore;
use gavel_engine::EngineConfig;
use gavel_types::{Participant, RoomId};
use std::sync::Arc;
use tracing::{debug, warn};

/// What one decision tick produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Nominated(NominationReceipt),
    Bid(BidReceipt),
    /// No action this tick; the reason is logged, never escalated.
    Skipped,
}

/// Drives autonomous seats through the human command surface.
pub struct AgentService<A, L, P>
where
    A: AuctionApi,
    L: LedgerStore,
    P: DecisionProvider,
{
    api: Arc<A>,
    store: Arc<L>,
    provider: Arc<P>,
    engine: EngineConfig,
}

impl<A, L, P> AgentService<A, L, P>
where
    A: AuctionApi,
    L: LedgerStore,
    P: DecisionProvider,
{
    pub fn new(api: Arc<A>, store: Arc<L>, provider: Arc<P>) -> Self {
        Self {
            api,
            store,
            provider,
            engine: EngineConfig::default(),
        }
    }

    pub fn with_engine_config(
        engine: EngineConfig,
        api: Arc<A>,
        store: Arc<L>,
        provider: Arc<P>,
    ) -> Self {
        Self {
            api,
            store,
            provider,
            engine,
        }
    }

    /// Consider nominating while the room is idle.
    pub async fn decide_nomination(&self, room_id: RoomId) -> TickOutcome {
        let view = match self.api.room_view(room_id).await {
            Ok(view) => view,
            Err(err) => {
                warn!(room = %room_id, %err, "nomination tick: view unavailable");
                return TickOutcome::Skipped;
            }
        };
        if !view.state.is_idle() {
            return TickOutcome::Skipped;
        }

        let seats: Vec<Participant> = view
            .participants
            .iter()
            .filter(|p| {
                p.is_autonomous()
                    && p.slots_remaining > 0
                    && max_affordable_bid(&self.engine, p) >= self.engine.nomination_floor
            })
            .cloned()
            .collect();
        let unsold = match self.store.unsold_items(room_id).await {
            Ok(items) => items,
            Err(err) => {
                warn!(room = %room_id, %err, "nomination tick: catalog unavailable");
                return TickOutcome::Skipped;
            }
        };
        if seats.is_empty() || unsold.is_empty() {
            return TickOutcome::Skipped;
        }

        let ctx = NominationContext {
            room: view.room,
            seats,
            unsold,
        };
        let decision = match self.provider.propose_nomination(&ctx).await {
            Ok(decision) => decision,
            Err(err) => {
                warn!(room = %room_id, %err, "nomination backend failed; skipping tick");
                return TickOutcome::Skipped;
            }
        };

        match decision.action {
            DecisionAction::Nominate {
                participant,
                item,
                starting_price,
            } => {
                debug!(room = %room_id, rationale = %decision.rationale, "agent nominating");
                match self
                    .api
                    .nominate(room_id, item, participant, starting_price)
                    .await
                {
                    Ok(receipt) => TickOutcome::Nominated(receipt),
                    Err(err) => {
                        debug!(room = %room_id, %err, "nomination rejected; skipping tick");
                        TickOutcome::Skipped
                    }
                }
            }
            DecisionAction::Bid { .. } => {
                warn!(room = %room_id, "backend proposed a bid during nomination; skipping");
                TickOutcome::Skipped
            }
            DecisionAction::Skip => {
                debug!(room = %room_id, rationale = %decision.rationale, "agent skips nomination");
                TickOutcome::Skipped
            }
        }
    }

    /// Consider raising while a round is live.
    pub async fn decide_bidding(&self, room_id: RoomId) -> TickOutcome {
        let view = match self.api.room_view(room_id).await {
            Ok(view) => view,
            Err(err) => {
                warn!(room = %room_id, %err, "bid tick: view unavailable");
                return TickOutcome::Skipped;
            }
        };
        let state = view.state;
        let (Some(item_id), Some(high_bid)) = (state.current_item, state.high_bid) else {
            return TickOutcome::Skipped;
        };
        if !state.is_bidding() {
            return TickOutcome::Skipped;
        }

        let item = match self.store.item(item_id).await {
            Ok(item) => item,
            Err(err) => {
                warn!(room = %room_id, %err, "bid tick: item unavailable");
                return TickOutcome::Skipped;
            }
        };
        let minimum = min_next_bid(&self.engine, high_bid);

        // Policy-layer pre-filter: the same rules the engine will enforce.
        let eligible: Vec<Participant> = view
            .participants
            .iter()
            .filter(|p| {
                p.is_autonomous()
                    && state.high_bidder != Some(p.id)
                    && evaluate_bid(&self.engine, &view.room.config, p, &item, minimum).is_ok()
            })
            .cloned()
            .collect();
        if eligible.is_empty() {
            return TickOutcome::Skipped;
        }

        let ctx = BiddingContext {
            room: view.room,
            state,
            item: item.clone(),
            eligible,
            min_next_bid: minimum,
        };
        let decision = match self.provider.propose_bid(&ctx).await {
            Ok(decision) => decision,
            Err(err) => {
                warn!(room = %room_id, %err, "bid backend failed; skipping tick");
                return TickOutcome::Skipped;
            }
        };

        match decision.action {
            DecisionAction::Bid {
                participant,
                amount,
            } => {
                // The provider is a policy layer, not a bypass: re-check the
                // raise before submitting, and skip rather than send an
                // invalid bid.
                let Some(seat) = ctx.eligible.iter().find(|p| p.id == participant) else {
                    warn!(room = %room_id, "backend picked an ineligible seat; skipping");
                    return TickOutcome::Skipped;
                };
                if amount < minimum
                    || evaluate_bid(&self.engine, &ctx.room.config, seat, &item, amount).is_err()
                {
                    warn!(room = %room_id, %amount, "backend proposed an invalid raise; skipping");
                    return TickOutcome::Skipped;
                }

                debug!(room = %room_id, rationale = %decision.rationale, "agent bidding");
                match self.api.place_bid(room_id, participant, amount).await {
                    Ok(receipt) => TickOutcome::Bid(receipt),
                    Err(err) => {
                        // Lost races and closed windows are routine here.
                        debug!(room = %room_id, %err, "bid rejected; skipping tick");
                        TickOutcome::Skipped
                    }
                }
            }
            DecisionAction::Nominate { .. } => {
                warn!(room = %room_id, "backend proposed a nomination during bidding; skipping");
                TickOutcome::Skipped
            }
            DecisionAction::Skip => {
                debug!(room = %room_id, rationale = %decision.rationale, "agent skips bid");
                TickOutcome::Skipped
            }
        }
    }
}
