//! Service construction.

use gavel_agent::{AgentConfig, AgentService, HeuristicProvider};
use gavel_engine::adapters::memory_ledger::InMemoryLedger;
use gavel_engine::ports::outbound::SystemTimeSource;
use gavel_engine::{AuctionService, EngineConfig};
use std::sync::Arc;

/// The wired engine type used by the runtime.
pub type Engine = AuctionService<InMemoryLedger, SystemTimeSource>;

/// The wired agent service type used by the runtime.
pub type Agents = AgentService<Engine, InMemoryLedger, HeuristicProvider>;

/// Fully wired services over one in-memory ledger.
pub struct Runtime {
    pub ledger: Arc<InMemoryLedger>,
    pub engine: Arc<Engine>,
    pub agents: Arc<Agents>,
    pub agent_config: AgentConfig,
}

impl Runtime {
    pub fn new(agent_config: AgentConfig) -> Self {
        Self::with_seed(agent_config, None)
    }

    /// Seeded heuristics for reproducible simulations.
    pub fn with_seed(agent_config: AgentConfig, seed: Option<u64>) -> Self {
        let engine_config = EngineConfig::default();
        let ledger = Arc::new(InMemoryLedger::new());
        let clock = Arc::new(SystemTimeSource);
        let engine = Arc::new(AuctionService::with_config(
            engine_config.clone(),
            Arc::clone(&ledger),
            clock,
        ));
        let provider = Arc::new(match seed {
            Some(seed) => {
                HeuristicProvider::with_seed(agent_config.clone(), engine_config.clone(), seed)
            }
            None => HeuristicProvider::new(agent_config.clone(), engine_config.clone()),
        });
        let agents = Arc::new(AgentService::with_engine_config(
            engine_config,
            Arc::clone(&engine),
            Arc::clone(&ledger),
            provider,
        ));
        Self {
            ledger,
            engine,
            agents,
            agent_config,
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}
