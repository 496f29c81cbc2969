//! Ingestion module - Single-pass reconstruction of trace-derived views
//!
//! A trace is ingested in one linear scan over its event sequence. The scan
//! drives two consumers at once: the interval reconstructor (nested
//! function-call intervals per lane) and the transfer extractor
//! (value-transfer records). The correlation feed is ingested separately, see
//! [`feed`].

use crate::Result;
use crate::trace_source::{Function, TraceEvent, Transfer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub mod feed;
pub mod intervals;
pub mod transfers;

pub use feed::{ChangeRecord, load_feed};
pub use intervals::IntervalReconstructor;
pub use transfers::TransferExtractor;

/// Cooperative cancellation token for an in-progress scan
///
/// Checked between events; traces can be large and a caller may want to
/// abandon an ingestion without waiting for it to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Result of one trace scan
#[derive(Debug)]
pub struct TraceScan {
    /// Finalized functions, sorted by global index
    pub functions: Vec<Function>,

    /// Transfers in arrival order
    pub transfers: Vec<Transfer>,

    /// Number of distinct lanes observed
    pub depth: usize,

    /// Earliest and latest timestamps seen, if any event arrived
    pub time_bounds: Option<(i64, i64)>,
}

/// Run the single ingestion pass over a session's event sequence
///
/// The sequence is consumed exactly once. Fails with
/// [`crate::Error::MalformedTrace`] on an End event for a lane with no open
/// interval and with [`crate::Error::Cancelled`] when the token fires.
pub fn scan_events(
    events: impl IntoIterator<Item = TraceEvent>,
    base_currency: &str,
    cancel: &CancelToken,
) -> Result<TraceScan> {
    let mut reconstructor = IntervalReconstructor::new();
    let mut extractor = TransferExtractor::new(base_currency);
    let mut time_bounds: Option<(i64, i64)> = None;

    for (position, event) in events.into_iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(crate::Error::Cancelled);
        }

        reconstructor.on_event(position, &event)?;
        extractor.on_event(&event);

        time_bounds = Some(match time_bounds {
            Some((lo, hi)) => (lo.min(event.ts), hi.max(event.ts)),
            None => (event.ts, event.ts),
        });
    }

    let (functions, depth) = reconstructor.finish();
    let transfers = extractor.finish();

    tracing::debug!(
        "Scan complete: {} functions, {} transfers, depth {}",
        functions.len(),
        transfers.len(),
        depth
    );

    Ok(TraceScan {
        functions,
        transfers,
        depth,
        time_bounds,
    })
}
