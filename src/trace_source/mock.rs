//! Mock trace source for testing and development
//!
//! Provides a small hardcoded token-swap trace: two lanes of nested calls
//! with an ETH payment and a token payment flowing back.

use super::{TraceSource, models::Phase, models::TraceEvent};
use crate::Result;
use async_trait::async_trait;

/// Display name reported by the mock trace
pub const MOCK_TRACE_NAME: &str = "mock_swap.json";

/// Mock trace source providing hardcoded sample events
pub struct MockTraceSource;

impl Default for MockTraceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTraceSource {
    pub fn new() -> Self {
        Self
    }

    /// The sample event sequence
    ///
    /// Lane 1 runs an outer `swap` call with a nested `deposit`; lane 2 runs
    /// a single `settle` call. The deposit carries an ETH amount, the settle
    /// a token amount.
    pub fn sample_events() -> Vec<TraceEvent> {
        vec![
            TraceEvent::new(Phase::Begin, 1, 0).with_name("swap"),
            TraceEvent::new(Phase::Begin, 1, 5)
                .with_name("deposit")
                .with_arg("amount", "2500000000000000000")
                .with_arg("token_symbol", "ETH"),
            TraceEvent::new(Phase::Begin, 2, 8).with_name("settle"),
            TraceEvent::new(Phase::End, 1, 10),
            TraceEvent::new(Phase::Other, 2, 12)
                .with_name("payout")
                .with_arg("amount", "417.25")
                .with_arg("token_symbol", "DAI")
                .with_arg("token_name", "Dai Stablecoin"),
            TraceEvent::new(Phase::End, 2, 15),
            TraceEvent::new(Phase::End, 1, 20),
        ]
    }
}

#[async_trait]
impl TraceSource for MockTraceSource {
    fn display_name(&self) -> String {
        MOCK_TRACE_NAME.to_string()
    }

    async fn load(&self) -> Result<Vec<TraceEvent>> {
        Ok(Self::sample_events())
    }
}
