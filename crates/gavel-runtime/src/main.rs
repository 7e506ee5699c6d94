//! Demo binary: one room of autonomous seats, driven to completion.

use gavel_agent::AgentConfig;
use gavel_engine::ports::outbound::{LedgerStore, SystemTimeSource};
use gavel_engine::AuctionApi;
use gavel_runtime::catalog::{demo_catalog, demo_room};
use gavel_runtime::{Runtime, RoomScheduler};
use gavel_types::{Amount, RoomConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Short timers so the demo finishes in minutes, not hours.
    let room_config = RoomConfig {
        purse: Amount::from_units(40),
        squad_min: 2,
        squad_max: 3,
        quota_max: 2,
        nomination_secs: 10,
        bid_timer_secs: 4,
    };
    let agent_config = AgentConfig {
        nomination_delay_ms: (400, 900),
        bid_lead_ms: (500, 1_500),
        ..AgentConfig::default()
    };

    let runtime = Runtime::new(agent_config.clone());
    let (room, seats) = demo_room(room_config, 4);
    let room_id = room.id;
    runtime.ledger.insert_room(room, seats);
    runtime.ledger.insert_items(demo_catalog());

    runtime.engine.start_room(room_id).await?;

    let scheduler = RoomScheduler::new(
        Arc::clone(&runtime.engine),
        Arc::clone(&runtime.agents),
        Arc::new(SystemTimeSource),
        agent_config,
        room_id,
    );
    scheduler.run().await;

    // Final standings.
    let view = runtime.engine.room_view(room_id).await?;
    let allocations = runtime.ledger.allocations(room_id).await?;
    println!("room {} finished with {} sales", view.room.code, allocations.len());
    for seat in &view.participants {
        let won: Vec<_> = allocations
            .iter()
            .filter(|a| a.participant == seat.id)
            .collect();
        println!(
            "  {:<18} budget left {:>6}  slots left {}  items {}",
            seat.name,
            seat.budget_remaining.to_string(),
            seat.slots_remaining,
            won.len()
        );
    }
    Ok(())
}
