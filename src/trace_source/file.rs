//! JSON file trace source
//!
//! Reads Chrome-trace-format files: either a bare array of events or an
//! object with a top-level `traceEvents` array.

use super::{TraceSource, models};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Trace source backed by a Chrome-trace-format JSON file
pub struct JsonFileTraceSource {
    path: PathBuf,
}

impl JsonFileTraceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Raw event shape as it appears in the file
#[derive(Debug, Deserialize)]
struct RawTraceEvent {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    ph: Option<String>,

    #[serde(default)]
    ts: Option<serde_json::Number>,

    #[serde(default)]
    tid: Option<i64>,

    #[serde(default)]
    args: Option<models::FieldBag>,
}

/// The two accepted top-level file shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTraceFile {
    Wrapped {
        #[serde(rename = "traceEvents")]
        trace_events: Vec<RawTraceEvent>,
    },
    Bare(Vec<RawTraceEvent>),
}

impl From<RawTraceEvent> for models::TraceEvent {
    fn from(raw: RawTraceEvent) -> Self {
        let phase = raw
            .ph
            .as_deref()
            .map(models::Phase::from_tag)
            .unwrap_or(models::Phase::Other);
        let ts = raw
            .ts
            .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
            .unwrap_or(0);

        Self {
            phase,
            lane: raw.tid.unwrap_or(0),
            ts,
            name: raw.name,
            args: raw.args.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl TraceSource for JsonFileTraceSource {
    fn display_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("trace")
            .to_string()
    }

    async fn load(&self) -> Result<Vec<models::TraceEvent>> {
        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::trace_source(format!("Failed to read trace file {:?}: {}", self.path, e))
        })?;

        let raw: RawTraceFile = serde_json::from_str(&contents).map_err(|e| {
            Error::trace_source(format!("Failed to parse trace file {:?}: {}", self.path, e))
        })?;

        let raw_events = match raw {
            RawTraceFile::Wrapped { trace_events } => trace_events,
            RawTraceFile::Bare(events) => events,
        };

        tracing::debug!("Loaded {} events from {:?}", raw_events.len(), self.path);
        Ok(raw_events.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_source::Phase;

    fn parse(json: &str) -> Vec<models::TraceEvent> {
        let raw: RawTraceFile = serde_json::from_str(json).unwrap();
        let raw_events = match raw {
            RawTraceFile::Wrapped { trace_events } => trace_events,
            RawTraceFile::Bare(events) => events,
        };
        raw_events.into_iter().map(Into::into).collect()
    }

    #[test]
    fn test_parse_bare_array() {
        let events = parse(
            r#"[
                {"name": "transfer", "ph": "B", "ts": 10, "tid": 1, "args": {}},
                {"name": "transfer", "ph": "E", "ts": 20, "tid": 1}
            ]"#,
        );

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].phase, Phase::Begin);
        assert_eq!(events[0].lane, 1);
        assert_eq!(events[0].ts, 10);
        assert_eq!(events[1].phase, Phase::End);
    }

    #[test]
    fn test_parse_wrapped_object() {
        let events = parse(
            r#"{"traceEvents": [
                {"ph": "i", "ts": 5, "tid": 2, "args": {"amount": "100"}}
            ]}"#,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Other);
        assert_eq!(events[0].arg_str("amount").as_deref(), Some("100"));
    }

    #[test]
    fn test_missing_fields_default() {
        let events = parse(r#"[{}]"#);

        assert_eq!(events[0].phase, Phase::Other);
        assert_eq!(events[0].lane, 0);
        assert_eq!(events[0].ts, 0);
        assert!(events[0].args.is_empty());
    }
}
