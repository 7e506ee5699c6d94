//! # Auction Transaction Engine
//!
//! The phase state machine that governs nomination, bidding, and sale
//! finalization for a single auction room, including concurrent-bid
//! arbitration and multi-dimensional eligibility enforcement.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One `AuctionState` row per room | `adapters/memory_ledger.rs` - `create_auction_state()` |
//! | `idle` has no round fields | `gavel_types::AuctionState::with_round_settled()` |
//! | `high_bid` strictly increases while bidding | `service.rs` - increment check before CAS |
//! | At most one `Allocation` per item per room | `service.rs` - sold check; `commit_sale()` transaction |
//! | Balances move only on settlement | `ports/outbound.rs` - `commit_sale()` is the sole writer |
//!
//! ## Conditional-Write Discipline
//!
//! Every mutating command reads `AuctionState`, computes its effect, and
//! writes back conditioned on `version` being unchanged since the read. Two
//! bidders racing to raise the same stale high bid cannot both succeed; the
//! loser receives `Superseded` and must recompute against the new state.
//!
//! ```text
//! [idle] ──nominate/open_next──→ [bidding] ──expire_and_finalize──→ [idle]
//!                                    │ ↺ place_bid (extends deadline)
//! ```
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ports/inbound.rs   - AuctionApi trait (the command surface)
//! ports/outbound.rs  - LedgerStore, TimeSource traits
//! service.rs         - AuctionService: the state machine
//! domain/            - constraints, increment rule, errors, receipts,
//!                      invariant predicates
//! adapters/          - in-memory ledger (versioned CAS arena)
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::EngineConfig;
pub use domain::*;
pub use ports::inbound::AuctionApi;
pub use ports::outbound::{LedgerStore, StoreError, TimeSource};
pub use service::AuctionService;
