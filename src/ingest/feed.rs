//! Correlation feed loading
//!
//! The feed is a JSON object whose `sequential_changes` array lists state
//! changes in chronological order across all contracts. Each record is an
//! open field bag; the builder requires `address`, `key`, `node_idx` and
//! `step_idx`, everything else is carried along for tooltips.

use crate::trace_source::{FieldBag, models::format_value};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level key holding the ordered change records
#[derive(Debug, Deserialize)]
struct StorageReport {
    sequential_changes: Vec<FieldBag>,
}

/// One record of the correlation feed
///
/// Feed order is the only source of chronology across contracts, so records
/// must be processed in the order they are returned here.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    fields: FieldBag,
}

impl ChangeRecord {
    pub fn new(fields: FieldBag) -> Self {
        Self { fields }
    }

    /// Contract address this change belongs to
    pub fn address(&self) -> Option<String> {
        self.string_field("address")
    }

    /// Storage key that changed; becomes the state name
    pub fn key(&self) -> Option<String> {
        self.string_field("key")
    }

    /// Index into the reconstructed function list
    pub fn node_idx(&self) -> Option<usize> {
        self.fields
            .get("node_idx")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
    }

    /// Ordinal used for color selection
    pub fn step_idx(&self) -> Option<u64> {
        self.fields.get("step_idx").and_then(|v| v.as_u64())
    }

    /// Optional transition label supplied by the feed
    pub fn label(&self) -> Option<String> {
        self.string_field("label")
    }

    /// All fields in feed order, rendered as strings
    pub fn fields(&self) -> impl Iterator<Item = (&str, String)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_str(), format_value(v)))
    }

    fn string_field(&self, key: &str) -> Option<String> {
        self.fields.get(key).map(format_value)
    }
}

/// Load and parse a correlation feed file
///
/// Any IO or top-level parse problem fails the whole load with
/// [`Error::Feed`]; there is no partial feed.
pub fn load_feed(path: &Path) -> Result<Vec<ChangeRecord>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Feed {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_feed(&contents).map_err(|e| Error::Feed {
        file: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse feed contents into ordered change records
pub fn parse_feed(contents: &str) -> serde_json::Result<Vec<ChangeRecord>> {
    let report: StorageReport = serde_json::from_str(contents)?;
    Ok(report
        .sequential_changes
        .into_iter()
        .map(ChangeRecord::new)
        .collect())
}
