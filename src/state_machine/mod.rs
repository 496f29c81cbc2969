//! State machine module - Build and query per-contract state graphs

pub mod builder;
pub mod graph;
pub mod palette;
pub mod state;
pub mod transition;

// Re-export key types
pub use builder::{GraphBuilder, shorten};
pub use graph::{GraphStats, StateGraph};
pub use palette::{Palette, RgbaColor};
pub use state::State;
pub use transition::Transition;
