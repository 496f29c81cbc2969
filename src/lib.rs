//! Contract Trace Visualizer
//!
//! A CLI tool for reconstructing smart contract call traces into state
//! transition graphs.
//!
//! This library provides functionality for:
//! - Loading Chrome-trace-format call traces from files or mock data
//! - Reconstructing nested function-call intervals per execution lane
//! - Extracting value-transfer records from trace events
//! - Correlating storage reports into per-contract state transition graphs
//! - Managing the data of multiple open trace sessions

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod session;
pub mod state_machine;
pub mod trace_source;

pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
pub fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "contract-trace-viz");
    }
}
