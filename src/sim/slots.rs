//! Pocket layout of a single-zero wheel
//!
//! Index 0 sits at wheel angle 0; indices increase with angle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::consts::SLOT_COUNT;

/// Pocket colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotColor {
    Red,
    Black,
    Green,
}

impl SlotColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotColor::Red => "RED",
            SlotColor::Black => "BLACK",
            SlotColor::Green => "GREEN",
        }
    }

    /// Colour used by the result banner
    pub fn display_hex(&self) -> &'static str {
        match self {
            SlotColor::Red => "#ff4444",
            SlotColor::Black => "#ffffff",
            SlotColor::Green => "#44ff44",
        }
    }
}

/// One pocket on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotEntry {
    pub number: u8,
    pub color: SlotColor,
}

impl fmt::Display for SlotEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.color.as_str())
    }
}

const fn red(number: u8) -> SlotEntry {
    SlotEntry { number, color: SlotColor::Red }
}

const fn black(number: u8) -> SlotEntry {
    SlotEntry { number, color: SlotColor::Black }
}

/// European wheel order starting at zero
pub const SLOT_TABLE: [SlotEntry; SLOT_COUNT] = [
    SlotEntry { number: 0, color: SlotColor::Green },
    red(32), black(15), red(19), black(4), red(21), black(2),
    red(25), black(17), red(34), black(6), red(27), black(13),
    red(36), black(11), red(30), black(8), red(23), black(10),
    red(5), black(24), red(16), black(33), red(1), black(20),
    red(14), black(31), red(9), black(22), red(18), black(29),
    red(7), black(28), red(12), black(35), red(3), black(26),
];

/// Pocket at `index`, wrapping past the end of the table
#[inline]
pub fn slot_at(index: usize) -> SlotEntry {
    SLOT_TABLE[index % SLOT_COUNT]
}
