//! Interval reconstruction
//!
//! Turns a flat Begin/End event sequence into nested function-call intervals.
//! Each lane keeps its own stack of open intervals; a Begin pushes, an End
//! pops the most recent open interval on that lane (LIFO, enforcing proper
//! nesting). Indices are assigned from a single counter shared across lanes,
//! so the final list reflects Begin-event arrival order.

use crate::trace_source::{Function, Phase, TraceEvent};
use crate::{Error, Result};
use std::collections::HashMap;

/// Stack-based Begin/End matcher for one trace session
///
/// Policy for an End event on a lane with no open interval: this is a
/// protocol violation and fails with [`Error::MalformedTrace`] carrying the
/// event position. It is never matched against another lane's intervals.
#[derive(Debug, Default)]
pub struct IntervalReconstructor {
    /// Open intervals per lane; lanes stay in the map once observed so the
    /// final depth count includes lanes whose intervals all closed
    open: HashMap<i64, Vec<Function>>,
    closed: Vec<Function>,
    next_index: usize,
}

impl IntervalReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next event; `position` is its ordinal in the sequence
    pub fn on_event(&mut self, position: usize, event: &TraceEvent) -> Result<()> {
        match event.phase {
            Phase::Begin => {
                let function = Function::new(self.next_index, event.lane, event.ts);
                self.next_index += 1;
                self.open.entry(event.lane).or_default().push(function);
            }
            Phase::End => {
                let stack = self.open.entry(event.lane).or_default();
                let Some(mut function) = stack.pop() else {
                    return Err(Error::malformed_trace(
                        position,
                        format!("End event on lane {} with no open interval", event.lane),
                    ));
                };
                function.end = Some(event.ts);
                self.closed.push(function);
            }
            Phase::Other => {}
        }
        Ok(())
    }

    /// Finalize the reconstruction
    ///
    /// Returns the functions sorted by global index (a contiguous range
    /// `[0, N)` for N Begin events) and the number of distinct lanes
    /// observed. Intervals whose End never arrived are included with
    /// `end == None`.
    pub fn finish(mut self) -> (Vec<Function>, usize) {
        let depth = self.open.len();

        for (_, stack) in self.open.drain() {
            self.closed.extend(stack);
        }
        self.closed.sort_by_key(|f| f.index);

        (self.closed, depth)
    }
}
