//! Transition representation

use serde::{Deserialize, Serialize};

/// A transition between two states of one graph
///
/// Recorded when a contract returns to a previously seen state: the edge
/// runs from the earlier node to the re-visiting node. `from` and `to` are
/// state indices within the owning graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: usize,
    pub to: usize,

    /// Event label, only present when the feed supplies one
    pub label: Option<String>,
}

impl Transition {
    pub fn new(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            label: None,
        }
    }

    pub fn with_label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }

    /// Get display label for the transition
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| "transition".to_string())
    }
}
