//! The bid increment rule.
//!
//! A step function of the current high bid: small raises while the price is
//! low, larger mandatory raises once it crosses the threshold.

use crate::config::EngineConfig;
use gavel_types::Amount;

/// Minimum raise over `high_bid` for the next acceptable bid.
pub fn min_increment(config: &EngineConfig, high_bid: Amount) -> Amount {
    if high_bid < config.increment_threshold {
        config.small_increment
    } else {
        config.large_increment
    }
}

/// Lowest amount the next bid may carry.
pub fn min_next_bid(config: &EngineConfig, high_bid: Amount) -> Amount {
    high_bid + min_increment(config, high_bid)
}
