//! # Autonomous Participant Decision Engine
//!
//! Produces nominate/bid/skip decisions for autonomous seats. The engine is
//! a policy layer only: every decision it emits is validated by the same
//! constraint evaluator and increment rule as a human command, and it
//! submits through the same `AuctionApi`, never a privileged code path.
//!
//! ## Failure Posture
//!
//! A failing decision backend can never corrupt auction state. Provider
//! errors, lost races, and rejected submissions all degrade to "no action
//! this tick" and are logged, not surfaced as bidding errors.
//!
//! ## Pluggable Reasoning
//!
//! The `DecisionProvider` port returns a structured decision with a
//! rationale string; `HeuristicProvider` is the production default, and a
//! generative backend can replace it without the agent service noticing.

pub mod config;
pub mod heuristic;
pub mod provider;
pub mod service;

pub use config::AgentConfig;
pub use heuristic::HeuristicProvider;
pub use provider::{
    BiddingContext, Decision, DecisionAction, DecisionProvider, NominationContext, ProviderError,
};
pub use service::{AgentService, TickOutcome};
