//! Inner-layer domain logic: pure rules with no storage or clock access.

pub mod constraints;
pub mod errors;
pub mod increment;
pub mod invariants;
pub mod receipts;

pub use constraints::{evaluate_bid, max_affordable_bid, slot_reserve_floor};
pub use errors::{AuctionError, AuctionResult};
pub use increment::{min_increment, min_next_bid};
pub use receipts::{BidReceipt, NominationReceipt, RoomView};
