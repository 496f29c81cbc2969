//! State representation

use crate::state_machine::palette::RgbaColor;
use serde::{Deserialize, Serialize};

/// A state in a contract's state graph
///
/// The active interval comes from the function the state was correlated
/// with; `end` is `None` when that function never closed. Equality is by
/// name only — this is the mechanism re-visit detection relies on, and it is
/// only ever applied within one graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub color: RgbaColor,
    pub start: i64,
    pub end: Option<i64>,
    pub tooltip: String,

    /// Position within the owning graph, assigned on insertion
    pub index: usize,
}

impl State {
    pub fn new(name: impl Into<String>, color: RgbaColor, start: i64, end: Option<i64>) -> Self {
        Self {
            name: name.into(),
            color,
            start,
            end,
            tooltip: String::new(),
            index: 0,
        }
    }

    pub fn with_tooltip(mut self, tooltip: String) -> Self {
        self.tooltip = tooltip;
        self
    }

    /// Get a short display string
    pub fn display_short(&self) -> String {
        match self.end {
            Some(end) => format!("{} [{}, {}]", self.name, self.start, end),
            None => format!("{} [{}, ...]", self.name, self.start),
        }
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for State {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::palette::{CYAN, ORANGE};

    #[test]
    fn test_equality_is_name_only() {
        let a = State::new("Locked", CYAN, 0, Some(10));
        let b = State::new("Locked", ORANGE, 500, None).with_tooltip("other".to_string());
        let c = State::new("Unlocked", CYAN, 0, Some(10));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_short() {
        let state = State::new("Locked", CYAN, 0, Some(20));
        assert_eq!(state.display_short(), "Locked [0, 20]");

        let open = State::new("Locked", CYAN, 5, None);
        assert_eq!(open.display_short(), "Locked [5, ...]");
    }
}
