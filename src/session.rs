//! Session store - Per-trace ownership of reconstructed data
//!
//! One trace session owns its function list, transfer list and state graph
//! map. The store tracks which session is current, mediates the lifecycle
//! notifications delivered by the hosting environment (opened, selected,
//! closed, visible-range-changed) and purges a session's data on close.
//!
//! All mutation is expected on one logical thread of control, reacting to
//! lifecycle notifications in arrival order; accessors return read-only
//! views. The shared [`Palette`] serializes its own mutation internally.

use crate::ingest::{self, CancelToken, load_feed};
use crate::state_machine::{GraphBuilder, Palette, State, StateGraph};
use crate::trace_source::{Function, TraceEvent, Transfer};
use crate::{Config, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Divisor from the visible time window to the arrow scale hint
const ARROW_SCALE_DIVISOR: i64 = 50;

/// Factor from the raw lane count to the depth display hint
const DEPTH_SCALE: f64 = 1.7;

/// Opaque key identifying a trace session
///
/// The wrapped string is the trace's display name, which also drives the
/// correlation feed path derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pass-through notification for a state selected in a rendering view
///
/// Carries no computed data; the engine only relays it between collaborators.
#[derive(Debug, Clone)]
pub struct NodeSelected {
    pub session: SessionId,
    pub state: Option<State>,
}

/// Everything one open session owns
#[derive(Debug, Default)]
struct SessionData {
    functions: Vec<Function>,
    transfers: Vec<Transfer>,
    graphs: HashMap<String, StateGraph>,
    depth: usize,
    time_bounds: Option<(i64, i64)>,

    /// Collaborator-assigned display rows per function index
    rows: HashMap<usize, i64>,

    /// Why the correlation feed failed for this session, if it did
    feed_error: Option<String>,
}

/// Store of all open sessions and the current-session pointer
pub struct SessionStore {
    config: Config,
    palette: Arc<Palette>,
    sessions: HashMap<SessionId, SessionData>,
    current: Option<SessionId>,
    arrow_scale: i64,
}

impl SessionStore {
    pub fn new(config: Config, palette: Arc<Palette>) -> Self {
        Self {
            config,
            palette,
            sessions: HashMap::new(),
            current: None,
            arrow_scale: 0,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Handle an opened notification: ingest the session's event sequence
    ///
    /// Runs the single trace scan (intervals + transfers), then the
    /// correlation pass against the feed path derived from the session name.
    /// A feed failure (unreadable file, malformed record, unresolved
    /// reference) is recorded on the session and aborts only graph building;
    /// the session still opens with its functions and transfers. A
    /// [`crate::Error::MalformedTrace`] or cancellation fails the open and
    /// leaves the store untouched.
    pub fn open(
        &mut self,
        id: SessionId,
        events: impl IntoIterator<Item = TraceEvent>,
        cancel: &CancelToken,
    ) -> Result<()> {
        let feed_path = self.config.feed_path_for(id.as_str());
        self.open_with_feed(id, events, feed_path, cancel)
    }

    /// Like [`Self::open`], with an explicit feed path
    pub fn open_with_feed(
        &mut self,
        id: SessionId,
        events: impl IntoIterator<Item = TraceEvent>,
        feed_path: PathBuf,
        cancel: &CancelToken,
    ) -> Result<()> {
        tracing::info!("Opening session {}", id);
        let scan = ingest::scan_events(events, &self.config.feed.base_currency, cancel)?;

        let mut data = SessionData {
            functions: scan.functions,
            transfers: scan.transfers,
            depth: scan.depth,
            time_bounds: scan.time_bounds,
            ..SessionData::default()
        };

        // Graphs are committed atomically: either the whole feed correlates
        // or the session keeps an empty graph map plus the failure reason.
        let correlated = load_feed(&feed_path).and_then(|records| {
            GraphBuilder::new(&self.palette, &data.functions).build(&records)
        });
        match correlated {
            Ok(graphs) => data.graphs = graphs,
            Err(e) => {
                tracing::warn!("Correlation feed failed for session {}: {}", id, e);
                data.feed_error = Some(e.to_string());
            }
        }

        self.sessions.insert(id.clone(), data);
        self.current = Some(id);
        self.recompute_arrow_scale();
        Ok(())
    }

    /// Handle a selected notification; a no-op when already current
    pub fn select(&mut self, id: SessionId) {
        if self.current.as_ref() == Some(&id) {
            return;
        }
        tracing::debug!("Selecting session {}", id);
        self.current = Some(id);
        self.recompute_arrow_scale();
    }

    /// Handle a closed notification: purge everything the session owned
    pub fn close(&mut self, id: &SessionId) {
        tracing::info!("Closing session {}", id);
        self.sessions.remove(id);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
    }

    /// The current session, if one is selected
    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    /// Handle an externally signaled change of the visible time window
    pub fn visible_range_changed(&mut self, start: i64, end: i64) {
        self.arrow_scale = (end - start) / ARROW_SCALE_DIVISOR;
    }

    /// Arrow length hint for the currently visible time window
    pub fn arrow_scale(&self) -> i64 {
        self.arrow_scale
    }

    /// Reconstructed functions of the current session, sorted by index
    pub fn functions(&self) -> &[Function] {
        self.current_data().map_or(&[], |d| &d.functions)
    }

    /// Transfers of the current session, in arrival order
    pub fn transfers(&self) -> &[Transfer] {
        self.current_data().map_or(&[], |d| &d.transfers)
    }

    /// State graphs of the current session, sorted by name
    pub fn graphs(&self) -> Vec<&StateGraph> {
        let mut graphs: Vec<&StateGraph> = self
            .current_data()
            .map(|d| d.graphs.values().collect())
            .unwrap_or_default();
        graphs.sort_by_key(|g| g.name().to_string());
        graphs
    }

    /// Look up one of the current session's graphs by name
    pub fn graph(&self, name: &str) -> Option<&StateGraph> {
        self.current_data().and_then(|d| d.graphs.get(name))
    }

    /// Row-height hint: the current session's lane count, display-scaled
    pub fn depth(&self) -> u32 {
        let raw = self.current_data().map_or(0, |d| d.depth);
        (raw as f64 * DEPTH_SCALE).round() as u32
    }

    /// Why the current session's feed failed, if it did
    pub fn feed_error(&self) -> Option<&str> {
        self.current_data().and_then(|d| d.feed_error.as_deref())
    }

    /// Remember the collaborator's display row for a function index
    pub fn register_function_row(&mut self, function_index: usize, row: i64) {
        if let Some(data) = self
            .current
            .as_ref()
            .and_then(|id| self.sessions.get_mut(id))
        {
            data.rows.insert(function_index, row);
        }
    }

    /// The display row registered for a function index, if any
    pub fn row_for_function(&self, function_index: usize) -> Option<i64> {
        self.current_data()
            .and_then(|d| d.rows.get(&function_index).copied())
    }

    fn current_data(&self) -> Option<&SessionData> {
        self.current.as_ref().and_then(|id| self.sessions.get(id))
    }

    fn recompute_arrow_scale(&mut self) {
        let (start, end) = self
            .current_data()
            .and_then(|d| d.time_bounds)
            .unwrap_or((0, 0));
        self.arrow_scale = (end - start) / ARROW_SCALE_DIVISOR;
    }
}
