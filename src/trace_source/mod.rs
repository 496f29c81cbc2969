//! Trace source module - Abstraction for obtaining contract call traces
//!
//! This module provides a trait-based abstraction for loading the event
//! sequence of a trace session from different backends (JSON trace files,
//! mock data).

use crate::{Config, Result};
use async_trait::async_trait;
use std::path::Path;

pub mod file;
pub mod mock;
pub mod models;

// Re-export models
use crate::cli::TraceSourceType;
pub use models::{FieldBag, Function, Phase, TraceEvent, Transfer};

/// Trace source trait for loading a session's event sequence
///
/// Implementations provide different backends:
/// - `JsonFileTraceSource`: Reads Chrome-trace-format JSON files
/// - `MockTraceSource`: Provides hardcoded sample data
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Display name of the trace, used to derive the correlation feed path
    fn display_name(&self) -> String;

    /// Load the full event sequence, ordered by arrival
    ///
    /// The returned sequence is finite and consumed in a single pass per
    /// ingestion.
    async fn load(&self) -> Result<Vec<TraceEvent>>;
}

/// Create a trace source instance based on type and configuration
pub fn create_trace_source(
    source_type: TraceSourceType,
    trace_path: &Path,
    _config: &Config,
) -> Result<Box<dyn TraceSource>> {
    match source_type {
        TraceSourceType::File => Ok(Box::new(file::JsonFileTraceSource::new(trace_path))),
        TraceSourceType::Mock => Ok(Box::new(mock::MockTraceSource::new())),
    }
}
