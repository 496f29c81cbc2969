//! Core data models for contract call traces
//!
//! This module defines the data structures representing trace events,
//! reconstructed function intervals, and value transfers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered bag of named event/record fields
///
/// Iteration order matches the order the fields appeared in the source JSON
/// (serde_json's `preserve_order` feature), which tooltip rendering relies on.
pub type FieldBag = serde_json::Map<String, serde_json::Value>;

/// Phase tag of a trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Function entry ("B" in Chrome trace format)
    Begin,
    /// Function exit ("E")
    End,
    /// Any other phase; ignored by interval reconstruction
    Other,
}

impl Phase {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "B" => Phase::Begin,
            "E" => Phase::End,
            _ => Phase::Other,
        }
    }
}

/// A single trace event
///
/// Events are immutable once constructed and are consumed in a single pass
/// per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Phase tag
    pub phase: Phase,

    /// Execution lane (thread/stack id scoping Begin/End matching)
    pub lane: i64,

    /// Timestamp in the source unit (seconds)
    pub ts: i64,

    /// Event name, if the source provides one
    pub name: Option<String>,

    /// Open map of named fields (the Chrome trace "args" object)
    #[serde(default)]
    pub args: FieldBag,
}

impl TraceEvent {
    pub fn new(phase: Phase, lane: i64, ts: i64) -> Self {
        Self {
            phase,
            lane,
            ts,
            name: None,
            args: FieldBag::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Get an arg rendered as a plain string
    ///
    /// JSON strings are returned unquoted; other value types use their JSON
    /// rendering.
    pub fn arg_str(&self, key: &str) -> Option<String> {
        self.args.get(key).map(format_value)
    }
}

/// Render a JSON value the way it would appear in a formatted field
pub(crate) fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A reconstructed function-call interval
///
/// Created on a Begin event and finalized when the matching End event is
/// seen; after reconstruction it is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    /// Global index, assigned in Begin-event arrival order across all lanes
    pub index: usize,

    /// Lane the function executed on
    pub lane: i64,

    /// Begin timestamp
    pub start: i64,

    /// End timestamp; `None` for a function whose End event never arrived
    pub end: Option<i64>,
}

impl Function {
    pub fn new(index: usize, lane: i64, start: i64) -> Self {
        Self {
            index,
            lane,
            start,
            end: None,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "fn#{} lane {} [{}, {}]", self.index, self.lane, self.start, end),
            None => write!(f, "fn#{} lane {} [{}, ...]", self.index, self.lane, self.start),
        }
    }
}

/// A value transfer extracted from a trace event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transfer {
    /// Sending lane
    pub sender: i64,

    /// Receiving lane (the lane of the originating event)
    pub receiver: i64,

    /// Timestamp in milliseconds (source seconds * 1000)
    pub time: i64,

    /// Transferred amount, kept as a decimal-preserving string
    pub amount: String,

    /// Token symbol ("ETH", "USDC", ...)
    pub kind: String,

    /// Token display name
    pub token_name: String,
}

impl Transfer {
    /// A transfer whose kind is not the base currency stays on one lane
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_tag() {
        assert_eq!(Phase::from_tag("B"), Phase::Begin);
        assert_eq!(Phase::from_tag("E"), Phase::End);
        assert_eq!(Phase::from_tag("X"), Phase::Other);
        assert_eq!(Phase::from_tag(""), Phase::Other);
    }

    #[test]
    fn test_arg_str_formatting() {
        let event = TraceEvent::new(Phase::Other, 1, 0)
            .with_arg("amount", "1000.5")
            .with_arg("step", 42);

        assert_eq!(event.arg_str("amount").as_deref(), Some("1000.5"));
        assert_eq!(event.arg_str("step").as_deref(), Some("42"));
        assert_eq!(event.arg_str("missing"), None);
    }

    #[test]
    fn test_args_preserve_insertion_order() {
        let event = TraceEvent::new(Phase::Other, 1, 0)
            .with_arg("zeta", 1)
            .with_arg("alpha", 2)
            .with_arg("mid", 3);

        let keys: Vec<&String> = event.args.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_function_display() {
        let mut func = Function::new(0, 1, 5);
        assert_eq!(func.to_string(), "fn#0 lane 1 [5, ...]");
        func.end = Some(10);
        assert_eq!(func.to_string(), "fn#0 lane 1 [5, 10]");
    }
}
