//! Stable color assignment
//!
//! Colors are assigned from a fixed palette in first-seen order of keys and
//! memorized, so a key keeps its color for the lifetime of the palette.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Hex rendering for DOT/HTML output
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const CYAN: RgbaColor = RgbaColor::new(102, 197, 204);
pub const ORANGE: RgbaColor = RgbaColor::new(246, 207, 113);
pub const RED: RgbaColor = RgbaColor::new(248, 156, 116);
pub const LIGHT_PURPLE: RgbaColor = RgbaColor::new(220, 176, 242);
pub const GREEN: RgbaColor = RgbaColor::new(135, 197, 95);
pub const BLUE: RgbaColor = RgbaColor::new(158, 185, 243);
pub const PINK: RgbaColor = RgbaColor::new(254, 136, 177);
pub const YELLOW: RgbaColor = RgbaColor::new(201, 219, 116);
pub const LIGHT_GREEN: RgbaColor = RgbaColor::new(139, 224, 164);
pub const PURPLE: RgbaColor = RgbaColor::new(180, 151, 231);
pub const BROWN: RgbaColor = RgbaColor::new(211, 180, 132);
pub const GRAY: RgbaColor = RgbaColor::new(179, 179, 179);

/// The fixed palette, in assignment order
pub const PALETTE: [RgbaColor; 12] = [
    CYAN,
    ORANGE,
    RED,
    LIGHT_PURPLE,
    GREEN,
    BLUE,
    PINK,
    YELLOW,
    LIGHT_GREEN,
    PURPLE,
    BROWN,
    GRAY,
];

#[derive(Debug, Default)]
struct PaletteCursor {
    assigned: HashMap<u64, RgbaColor>,
    next: usize,
}

/// Memorizing color assigner
///
/// One instance is shared across all sessions; pass it explicitly to the
/// components that need it. `color_for` is total over all keys and
/// idempotent per key. The interior mutex makes the first-time assignment
/// (cursor bump plus memorization) atomic under concurrent callers.
#[derive(Debug, Default)]
pub struct Palette {
    cursor: Mutex<PaletteCursor>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the color for a key, assigning one on first sight
    ///
    /// The n-th distinct key ever seen maps to `PALETTE[(n-1) % 12]`.
    pub fn color_for(&self, key: u64) -> RgbaColor {
        let mut cursor = self.cursor.lock().expect("palette mutex poisoned");
        if let Some(&color) = cursor.assigned.get(&key) {
            return color;
        }
        let color = PALETTE[cursor.next % PALETTE.len()];
        cursor.next += 1;
        cursor.assigned.insert(key, color);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order_assignment() {
        let palette = Palette::new();
        assert_eq!(palette.color_for(42), PALETTE[0]);
        assert_eq!(palette.color_for(7), PALETTE[1]);
        assert_eq!(palette.color_for(1000), PALETTE[2]);
    }

    #[test]
    fn test_idempotent_per_key() {
        let palette = Palette::new();
        let first = palette.color_for(9);
        palette.color_for(1);
        palette.color_for(2);
        assert_eq!(palette.color_for(9), first);
    }

    #[test]
    fn test_wraps_around_palette() {
        let palette = Palette::new();
        for key in 0..PALETTE.len() as u64 {
            palette.color_for(key);
        }
        // The 13th distinct key reuses the first color
        assert_eq!(palette.color_for(999), PALETTE[0]);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(CYAN.to_hex(), "#66c5cc");
        assert_eq!(GRAY.to_hex(), "#b3b3b3");
    }
}
