//! Command-by-command engine scenarios across a whole room lifecycle.

#[cfg(test)]
mod tests {
    use gavel_engine::adapters::memory_ledger::InMemoryLedger;
    use gavel_engine::domain::invariants::{
        invariant_bid_monotonicity, invariant_high_bid_bounds, invariant_participant_balances,
        invariant_phase_consistency, invariant_single_allocation,
    };
    use gavel_engine::ports::outbound::{LedgerStore, MockTimeSource};
    use gavel_engine::{AuctionApi, AuctionError, AuctionService, EngineConfig};
    use gavel_types::{
        Amount, Item, ItemId, Participant, ParticipantId, ParticipantKind, Room, RoomConfig,
        RoomId,
    };
    use std::sync::Arc;

    struct Harness {
        ledger: Arc<InMemoryLedger>,
        clock: Arc<MockTimeSource>,
        engine: Arc<AuctionService<InMemoryLedger, MockTimeSource>>,
        room: RoomId,
        seats: Vec<ParticipantId>,
        items: Vec<ItemId>,
    }

    impl Harness {
        async fn check_invariants(&self) {
            let config = EngineConfig::default();
            let state = self.ledger.auction_state(self.room).await.unwrap();
            assert!(invariant_phase_consistency(&state), "torn state: {state:?}");
            assert!(invariant_high_bid_bounds(&state), "high bid under base");
            let allocations = self.ledger.allocations(self.room).await.unwrap();
            assert!(invariant_single_allocation(&allocations));
            let participants = self.ledger.participants(self.room).await.unwrap();
            let room = self.ledger.room(self.room).await.unwrap();
            assert!(invariant_participant_balances(&participants, &room.config));
            let bids = self.ledger.recent_bids(self.room, usize::MAX).await.unwrap();
            let chronological: Vec<_> = bids.into_iter().rev().collect();
            assert!(invariant_bid_monotonicity(&config, &chronological));
        }
    }

    async fn harness(room_config: RoomConfig, items: Vec<Item>) -> Harness {
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(MockTimeSource::new(10_000_000));
        let room = Room::new("FLOW", room_config);
        let room_id = room.id;
        let seats: Vec<Participant> = ["North", "East", "South", "West"]
            .iter()
            .map(|name| Participant::new(&room, *name, ParticipantKind::Human))
            .collect();
        let seat_ids = seats.iter().map(|p| p.id).collect();
        let item_ids = items.iter().map(|i| i.id).collect();
        ledger.insert_room(room, seats);
        ledger.insert_items(items);

        let engine = Arc::new(AuctionService::new(Arc::clone(&ledger), Arc::clone(&clock)));
        engine.start_room(room_id).await.unwrap();
        Harness {
            ledger,
            clock,
            engine,
            room: room_id,
            seats: seat_ids,
            items: item_ids,
        }
    }

    fn default_items() -> Vec<Item> {
        vec![
            Item::new("Opener", "batter", Amount::from_units(2)).marquee(),
            Item::new("Keeper", "wicketkeeper", Amount::from_units(1)),
            Item::new("Import", "pacer", Amount::from_hundredths(150)).quota_limited(),
        ]
    }

    /// The canonical increment walk: nominate at 2.0, raise to 2.2, have 2.3
    /// rejected (minimum is 2.4), land 2.4 with the deadline extended.
    #[tokio::test]
    async fn increment_walk_with_deadline_extension() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        let opened = hx
            .engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(2))
            .await
            .unwrap();
        hx.check_invariants().await;

        let first = hx
            .engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(220))
            .await
            .unwrap();
        assert_eq!(first.min_next_bid, Amount::from_hundredths(240));
        hx.check_invariants().await;

        let rejected = hx
            .engine
            .place_bid(hx.room, hx.seats[2], Amount::from_hundredths(230))
            .await
            .unwrap_err();
        assert_eq!(
            rejected,
            AuctionError::BidTooLow {
                offered: Amount::from_hundredths(230),
                minimum: Amount::from_hundredths(240),
            }
        );

        hx.clock.advance(3_000);
        let second = hx
            .engine
            .place_bid(hx.room, hx.seats[2], Amount::from_hundredths(240))
            .await
            .unwrap();
        assert_eq!(second.high_bid, Amount::from_hundredths(240));
        assert_eq!(second.deadline, opened.deadline + 3_000);
        hx.check_invariants().await;
    }

    /// Above the 5.0 threshold the mandatory raise widens to 0.5.
    #[tokio::test]
    async fn increment_widens_above_threshold() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        hx.engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(5))
            .await
            .unwrap();

        let err = hx
            .engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(540))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuctionError::BidTooLow {
                offered: Amount::from_hundredths(540),
                minimum: Amount::from_hundredths(550),
            }
        );
        assert!(hx
            .engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(550))
            .await
            .is_ok());
    }

    /// A seat down to its last slot may spend its whole budget, but not a
    /// hundredth more.
    #[tokio::test]
    async fn reserve_floor_scenario() {
        let hx = harness(RoomConfig::default(), default_items()).await;

        // Drain a seat to budget 5 with one slot left.
        let poor = hx.seats[1];
        hx.ledger
            .set_participant_resources(hx.room, poor, Amount::from_units(5), 1, 0)
            .unwrap();

        // Open a round at 4.6 so the minimum raise (4.8) sits under 5.0.
        hx.engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_hundredths(460))
            .await
            .unwrap();

        // The whole budget is spendable on the last slot.
        let accepted = hx
            .engine
            .place_bid(hx.room, poor, Amount::from_units(5))
            .await
            .unwrap();
        assert_eq!(accepted.high_bid, Amount::from_units(5));

        // But a raise past the budget is a budget error, not an increment
        // error, for a fresh round at 4.9.
        hx.clock.advance(13_000);
        hx.engine.expire_and_finalize(hx.room).await.unwrap();
        hx.ledger
            .set_participant_resources(hx.room, poor, Amount::from_units(5), 1, 0)
            .unwrap();
        hx.engine
            .nominate(hx.room, hx.items[1], hx.seats[2], Amount::from_hundredths(490))
            .await
            .unwrap();
        let err = hx
            .engine
            .place_bid(hx.room, poor, Amount::from_hundredths(510))
            .await
            .unwrap_err();
        assert!(matches!(err, AuctionError::BudgetExceeded { .. }));
    }

    /// Budget, slots, then quota: the evaluator's order is observable.
    #[tokio::test]
    async fn constraint_order_is_deterministic() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        hx.engine
            .nominate(hx.room, hx.items[2], hx.seats[0], Amount::from_hundredths(150))
            .await
            .unwrap();

        // Quota-full seat with budget and slots hits the quota rule.
        let full = hx.seats[3];
        hx.ledger
            .set_participant_resources(hx.room, full, Amount::from_units(50), 5, 8)
            .unwrap();
        let err = hx
            .engine
            .place_bid(hx.room, full, Amount::from_hundredths(170))
            .await
            .unwrap_err();
        assert_eq!(err, AuctionError::QuotaExceeded { held: 8, max: 8 });
    }

    /// One full round: sale debits exactly the winner, once.
    #[tokio::test]
    async fn settlement_debits_winner_once() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        hx.engine
            .nominate(hx.room, hx.items[2], hx.seats[0], Amount::from_hundredths(150))
            .await
            .unwrap();
        hx.engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(170))
            .await
            .unwrap();
        hx.clock.advance(12_000);

        let outcome = hx.engine.expire_and_finalize(hx.room).await.unwrap();
        assert!(outcome.sold);
        assert_eq!(outcome.winner, Some(hx.seats[1]));
        hx.check_invariants().await;

        let winner = hx.ledger.participant(hx.room, hx.seats[1]).await.unwrap();
        assert_eq!(winner.budget_remaining, Amount::from_hundredths(9_830));
        assert_eq!(winner.slots_remaining, 14);
        // The import counts against the winner's quota.
        assert_eq!(winner.quota_count, 1);

        for loser in [hx.seats[0], hx.seats[2], hx.seats[3]] {
            let seat = hx.ledger.participant(hx.room, loser).await.unwrap();
            assert_eq!(seat.budget_remaining, Amount::from_units(100));
            assert_eq!(seat.slots_remaining, 15);
        }
    }

    /// Every completed round yields exactly one of: an allocation, or an
    /// unsold mark. Never both, never neither.
    #[tokio::test]
    async fn round_outcome_partition() {
        let hx = harness(RoomConfig::default(), default_items()).await;

        // Sold round.
        hx.engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(2))
            .await
            .unwrap();
        hx.clock.advance(12_000);
        let sold = hx.engine.expire_and_finalize(hx.room).await.unwrap();
        assert!(sold.sold);
        assert_eq!(hx.ledger.allocations(hx.room).await.unwrap().len(), 1);

        // Unsold round via auto-open with no raises.
        let receipt = hx.engine.open_next(hx.room).await.unwrap();
        assert!(receipt.high_bidder.is_none());
        hx.clock.advance(12_000);
        let unsold = hx.engine.expire_and_finalize(hx.room).await.unwrap();
        assert!(!unsold.sold);
        assert_eq!(hx.ledger.allocations(hx.room).await.unwrap().len(), 1);
        hx.check_invariants().await;

        // The unsold item is still nominable; the sold one is not.
        assert_eq!(
            hx.ledger.unsold_items(hx.room).await.unwrap().len(),
            default_items().len() - 1
        );
    }

    /// Pending commands that outlive the deadline are rejected regardless of
    /// when they were computed.
    #[tokio::test]
    async fn late_bid_rejected_at_the_boundary() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        let opened = hx
            .engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(2))
            .await
            .unwrap();

        // Land exactly on the deadline: expiry is inclusive.
        hx.clock.set(opened.deadline);
        let err = hx
            .engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(220))
            .await
            .unwrap_err();
        assert_eq!(err, AuctionError::WindowExpired);
    }

    #[tokio::test]
    async fn open_next_exhausts_catalog() {
        let items = vec![Item::new("Solo", "batter", Amount::from_units(1))];
        let hx = harness(RoomConfig::default(), items).await;

        hx.engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(1))
            .await
            .unwrap();
        hx.clock.advance(12_000);
        hx.engine.expire_and_finalize(hx.room).await.unwrap();

        let err = hx.engine.open_next(hx.room).await.unwrap_err();
        assert_eq!(err, AuctionError::NoItemsRemaining);
    }

    #[tokio::test]
    async fn recent_bids_track_the_round() {
        let hx = harness(RoomConfig::default(), default_items()).await;
        hx.engine
            .nominate(hx.room, hx.items[0], hx.seats[0], Amount::from_units(2))
            .await
            .unwrap();
        hx.engine
            .place_bid(hx.room, hx.seats[1], Amount::from_hundredths(220))
            .await
            .unwrap();
        hx.engine
            .place_bid(hx.room, hx.seats[2], Amount::from_hundredths(240))
            .await
            .unwrap();

        let bids = hx.engine.recent_bids(hx.room, 2).await.unwrap();
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].amount, Amount::from_hundredths(240));
        assert_eq!(bids[1].amount, Amount::from_hundredths(220));
    }
}
