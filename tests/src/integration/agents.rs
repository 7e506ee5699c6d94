//! Autonomous seats driving a whole room through the human command surface,
//! with ledger invariants re-checked after every settled round.

#[cfg(test)]
mod tests {
    use gavel_agent::{AgentConfig, AgentService, HeuristicProvider, TickOutcome};
    use gavel_engine::adapters::memory_ledger::InMemoryLedger;
    use gavel_engine::domain::invariants::{
        invariant_bid_monotonicity, invariant_high_bid_bounds, invariant_participant_balances,
        invariant_phase_consistency, invariant_single_allocation,
    };
    use gavel_engine::ports::outbound::{LedgerStore, MockTimeSource};
    use gavel_engine::{AuctionApi, AuctionError, AuctionService, EngineConfig};
    use gavel_types::{
        Amount, Item, Participant, ParticipantKind, Phase, Room, RoomConfig, RoomId, RoomStatus,
    };
    use std::sync::Arc;

    type Engine = AuctionService<InMemoryLedger, MockTimeSource>;
    type Agents = AgentService<Engine, InMemoryLedger, HeuristicProvider>;

    struct Sim {
        ledger: Arc<InMemoryLedger>,
        clock: Arc<MockTimeSource>,
        engine: Arc<Engine>,
        agents: Arc<Agents>,
        room: RoomId,
    }

    fn catalog() -> Vec<Item> {
        vec![
            Item::new("Anchor", "batter", Amount::from_units(2)).marquee().rated(90),
            Item::new("Keeper", "wicketkeeper", Amount::from_units(1)).rated(70),
            Item::new("Import A", "pacer", Amount::from_hundredths(150))
                .quota_limited()
                .rated(82),
            Item::new("Import B", "allrounder", Amount::from_units(1))
                .quota_limited()
                .rated(68),
            Item::new("Spinner", "spinner", Amount::from_hundredths(50)).rated(61),
            Item::new("Reserve", "batter", Amount::from_hundredths(50)).rated(48),
        ]
    }

    async fn sim(seed: u64) -> Sim {
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(MockTimeSource::new(100_000_000));
        let config = RoomConfig {
            purse: Amount::from_units(20),
            squad_min: 2,
            squad_max: 3,
            quota_max: 2,
            nomination_secs: 30,
            bid_timer_secs: 12,
        };
        let room = Room::new("DRAIN", config);
        let room_id = room.id;
        let seats: Vec<Participant> = ["Scout Alpha", "Strategist Beta", "Manager Gamma"]
            .iter()
            .map(|name| Participant::new(&room, *name, ParticipantKind::Autonomous))
            .collect();
        ledger.insert_room(room, seats);
        ledger.insert_items(catalog());

        let engine = Arc::new(AuctionService::new(Arc::clone(&ledger), Arc::clone(&clock)));
        let provider = Arc::new(HeuristicProvider::with_seed(
            AgentConfig::default(),
            EngineConfig::default(),
            seed,
        ));
        let agents = Arc::new(AgentService::new(
            Arc::clone(&engine),
            Arc::clone(&ledger),
            provider,
        ));
        engine.start_room(room_id).await.unwrap();
        Sim {
            ledger,
            clock,
            engine,
            agents,
            room: room_id,
        }
    }

    impl Sim {
        async fn check_invariants(&self) {
            let state = self.ledger.auction_state(self.room).await.unwrap();
            assert!(invariant_phase_consistency(&state), "torn state: {state:?}");
            assert!(invariant_high_bid_bounds(&state));
            let allocations = self.ledger.allocations(self.room).await.unwrap();
            assert!(invariant_single_allocation(&allocations));
            let participants = self.ledger.participants(self.room).await.unwrap();
            let room = self.ledger.room(self.room).await.unwrap();
            assert!(invariant_participant_balances(&participants, &room.config));
        }

        /// Chronological bids appended after `mark`.
        async fn bids_since(&self, mark: usize) -> Vec<gavel_types::Bid> {
            let mut bids = self.ledger.recent_bids(self.room, usize::MAX).await.unwrap();
            bids.reverse();
            bids.split_off(mark)
        }
    }

    /// Agents alone drive the room to completion; every settled round leaves
    /// the ledger consistent and every round's history obeys the increment
    /// rule.
    #[tokio::test]
    async fn agents_drain_a_room() {
        let sx = sim(0xD1CE).await;
        let engine_config = EngineConfig::default();
        let mut consecutive_unsold = 0usize;
        // History length just before the current round opened; the slice
        // from here covers the round's opening bid and every raise.
        let mut round_mark = 0usize;

        for _ in 0..10_000 {
            let view = sx.engine.room_view(sx.room).await.unwrap();
            if view.room.status == RoomStatus::Completed {
                break;
            }
            match view.state.phase {
                Phase::Idle => {
                    let drained = view.participants.iter().all(|p| p.slots_remaining == 0);
                    if drained || consecutive_unsold >= 10 {
                        sx.engine.complete_room(sx.room).await.unwrap();
                        continue;
                    }
                    round_mark = sx
                        .ledger
                        .recent_bids(sx.room, usize::MAX)
                        .await
                        .unwrap()
                        .len();
                    if sx.agents.decide_nomination(sx.room).await == TickOutcome::Skipped {
                        match sx.engine.open_next(sx.room).await {
                            Ok(_) => {}
                            Err(AuctionError::NoItemsRemaining) => {
                                sx.engine.complete_room(sx.room).await.unwrap();
                            }
                            Err(err) => panic!("open_next failed: {err}"),
                        }
                    }
                }
                Phase::Bidding => {
                    // A few decision ticks inside the window, then expiry.
                    for _ in 0..3 {
                        sx.agents.decide_bidding(sx.room).await;
                    }
                    sx.clock.advance(12_001 * 4);
                    let outcome = sx.engine.expire_and_finalize(sx.room).await.unwrap();
                    if outcome.sold {
                        consecutive_unsold = 0;
                    } else {
                        consecutive_unsold += 1;
                    }

                    let round = sx.bids_since(round_mark).await;
                    assert!(invariant_bid_monotonicity(&engine_config, &round));
                    sx.check_invariants().await;
                }
                Phase::Finalizing => unreachable!("finalizing never escapes the ledger"),
            }
        }

        let room = sx.ledger.room(sx.room).await.unwrap();
        assert_eq!(room.status, RoomStatus::Completed, "room never completed");

        // Sales happened, and every charge is accounted for.
        let allocations = sx.ledger.allocations(sx.room).await.unwrap();
        assert!(!allocations.is_empty(), "no item ever sold");
        let participants = sx.ledger.participants(sx.room).await.unwrap();
        for seat in &participants {
            let spent: u64 = allocations
                .iter()
                .filter(|a| a.participant == seat.id)
                .map(|a| a.price.hundredths())
                .sum();
            let won = allocations
                .iter()
                .filter(|a| a.participant == seat.id)
                .count() as u8;
            assert_eq!(
                seat.budget_remaining,
                Amount::from_units(20) - Amount::from_hundredths(spent)
            );
            assert_eq!(seat.slots_remaining, 3 - won);
            let quota_won = allocations
                .iter()
                .filter(|a| a.participant == seat.id && a.quota_limited)
                .count() as u8;
            assert_eq!(seat.quota_count, quota_won);
            assert!(seat.quota_count <= 2);
        }

        // Allocated and unsold items partition the catalog.
        let unsold = sx.ledger.unsold_items(sx.room).await.unwrap();
        assert_eq!(allocations.len() + unsold.len(), catalog().len());
    }

    /// Two different seeds both drain cleanly; the engine, not the policy,
    /// owns correctness.
    #[tokio::test]
    async fn drain_is_seed_independent() {
        for seed in [7, 99] {
            let sx = sim(seed).await;
            let mut consecutive_unsold = 0usize;
            for _ in 0..10_000 {
                let view = sx.engine.room_view(sx.room).await.unwrap();
                if view.room.status == RoomStatus::Completed {
                    break;
                }
                match view.state.phase {
                    Phase::Idle => {
                        let drained =
                            view.participants.iter().all(|p| p.slots_remaining == 0);
                        if drained || consecutive_unsold >= 10 {
                            sx.engine.complete_room(sx.room).await.unwrap();
                            continue;
                        }
                        if sx.agents.decide_nomination(sx.room).await == TickOutcome::Skipped {
                            match sx.engine.open_next(sx.room).await {
                                Ok(_) => {}
                                Err(AuctionError::NoItemsRemaining) => {
                                    sx.engine.complete_room(sx.room).await.unwrap();
                                }
                                Err(err) => panic!("open_next failed: {err}"),
                            }
                        }
                    }
                    Phase::Bidding => {
                        for _ in 0..2 {
                            sx.agents.decide_bidding(sx.room).await;
                        }
                        sx.clock.advance(12_001 * 3);
                        let outcome = sx.engine.expire_and_finalize(sx.room).await.unwrap();
                        if outcome.sold {
                            consecutive_unsold = 0;
                        } else {
                            consecutive_unsold += 1;
                        }
                        sx.check_invariants().await;
                    }
                    Phase::Finalizing => unreachable!(),
                }
            }
            let room = sx.ledger.room(sx.room).await.unwrap();
            assert_eq!(room.status, RoomStatus::Completed, "seed {seed} stalled");
        }
    }
}
