//! Per-room scheduler.
//!
//! Drives one room to completion: nudges agent nominations while idle,
//! schedules agent bid ticks shortly before each deadline, and invokes
//! finalization once the window elapses. Every call goes through the same
//! idempotent command surface as any client, so redundant or late firing is
//! harmless.

use gavel_agent::{AgentConfig, AgentService, DecisionProvider, TickOutcome};
use gavel_engine::ports::inbound::AuctionApi;
use gavel_engine::ports::outbound::{LedgerStore, TimeSource};
use gavel_engine::AuctionError;
use gavel_types::{Phase, RoomId, RoomStatus};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct RoomScheduler<A, L, P, T>
where
    A: AuctionApi,
    L: LedgerStore,
    P: DecisionProvider,
    T: TimeSource,
{
    engine: Arc<A>,
    agents: Arc<AgentService<A, L, P>>,
    clock: Arc<T>,
    config: AgentConfig,
    room: RoomId,
}

impl<A, L, P, T> RoomScheduler<A, L, P, T>
where
    A: AuctionApi,
    L: LedgerStore,
    P: DecisionProvider,
    T: TimeSource,
{
    pub fn new(
        engine: Arc<A>,
        agents: Arc<AgentService<A, L, P>>,
        clock: Arc<T>,
        config: AgentConfig,
        room: RoomId,
    ) -> Self {
        Self {
            engine,
            agents,
            clock,
            config,
            room,
        }
    }

    fn jitter(range: (u64, u64)) -> u64 {
        if range.0 >= range.1 {
            return range.0;
        }
        rand::thread_rng().gen_range(range.0..=range.1)
    }

    /// Drive the room until it completes.
    pub async fn run(&self) {
        loop {
            let view = match self.engine.room_view(self.room).await {
                Ok(view) => view,
                Err(err) => {
                    warn!(room = %self.room, %err, "scheduler: view unavailable; stopping");
                    return;
                }
            };
            if view.room.status == RoomStatus::Completed {
                info!(room = %self.room, "scheduler: room completed");
                return;
            }

            match view.state.phase {
                Phase::Idle => {
                    // Nothing left to fill: close the room out.
                    if view.participants.iter().all(|p| p.slots_remaining == 0) {
                        self.complete().await;
                        continue;
                    }

                    // Human-realism delay, then let an agent nominate; fall
                    // back to auto-opening a random item.
                    let delay = Self::jitter(self.config.nomination_delay_ms);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    if self.agents.decide_nomination(self.room).await == TickOutcome::Skipped {
                        match self.engine.open_next(self.room).await {
                            Ok(receipt) => {
                                debug!(room = %self.room, item = %receipt.item, "auto-opened round");
                            }
                            Err(AuctionError::NoItemsRemaining) => {
                                self.complete().await;
                            }
                            Err(
                                AuctionError::InvalidPhase { .. } | AuctionError::Superseded,
                            ) => {
                                // Another caller opened a round first.
                            }
                            Err(err) => {
                                warn!(room = %self.room, %err, "scheduler: open_next failed");
                            }
                        }
                    }
                }
                Phase::Bidding => {
                    let deadline = view.state.deadline.unwrap_or_default();
                    let now = self.clock.now();
                    if now >= deadline {
                        match self.engine.expire_and_finalize(self.room).await {
                            Ok(outcome) if outcome.sold => {
                                info!(
                                    room = %self.room,
                                    item = %outcome.item,
                                    price = %outcome.final_price,
                                    "scheduler: sold"
                                );
                            }
                            Ok(outcome) => {
                                info!(room = %self.room, item = %outcome.item, "scheduler: unsold");
                            }
                            Err(AuctionError::NotYetExpired) => {
                                // A bid extended the window between our read
                                // and the call; loop and re-read.
                            }
                            Err(err) => {
                                warn!(room = %self.room, %err, "scheduler: finalize failed");
                            }
                        }
                    } else {
                        // Wake shortly before the deadline for an agent bid
                        // tick, or at the deadline if the lead is larger
                        // than the remaining window.
                        let lead = Self::jitter(self.config.bid_lead_ms);
                        let remaining = deadline - now;
                        if remaining > lead {
                            tokio::time::sleep(Duration::from_millis(remaining - lead)).await;
                            self.agents.decide_bidding(self.room).await;
                        } else {
                            tokio::time::sleep(Duration::from_millis(remaining)).await;
                        }
                    }
                }
                Phase::Finalizing => {
                    tokio::time::sleep(Duration::from_millis(25)).await;
                }
            }
        }
    }

    async fn complete(&self) {
        match self.engine.complete_room(self.room).await {
            Ok(_) => {}
            Err(AuctionError::InvalidPhase { .. } | AuctionError::RoomNotActive(_)) => {
                // A round opened, or another scheduler already closed it.
            }
            Err(err) => {
                warn!(room = %self.room, %err, "scheduler: complete_room failed");
            }
        }
    }
}
