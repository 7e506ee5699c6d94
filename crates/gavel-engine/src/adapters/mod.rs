//! Outer-layer adapters implementing the outbound ports.

pub mod memory_ledger;

pub use memory_ledger::InMemoryLedger;
