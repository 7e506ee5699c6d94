//! Agent configuration.

/// Behavioral knobs for autonomous seats.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Baseline chance an interested, eligible seat actually raises.
    pub bid_probability: f64,
    /// Chance a high-interest seat jumps past the minimum raise on a
    /// marquee item.
    pub marquee_jump_probability: f64,
    /// Human-realism delay before an idle-room nomination, milliseconds
    /// (min, max).
    pub nomination_delay_ms: (u64, u64),
    /// How long before the deadline a bid tick fires, milliseconds
    /// (min, max).
    pub bid_lead_ms: (u64, u64),
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bid_probability: 0.6,
            marquee_jump_probability: 0.15,
            nomination_delay_ms: (1_000, 2_000),
            bid_lead_ms: (2_000, 6_000),
        }
    }
}
