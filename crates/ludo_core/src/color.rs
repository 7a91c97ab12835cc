//! Team colors and their fixed ordinals on the shared ring.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// One of the four team colors.
///
/// The declaration order is the ordinal order used by the ring rotation:
/// each color's start square sits `13 * ordinal` squares after Red's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Ordinal 0.
    Red,
    /// Ordinal 1.
    Green,
    /// Ordinal 2.
    Yellow,
    /// Ordinal 3.
    Blue,
}

impl Color {
    /// All colors in ordinal order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Fixed ordinal (0-3) of this color among the team colors.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Yellow => 2,
            Self::Blue => 3,
        }
    }

    /// Single-letter initial used in coin names.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Green => 'G',
            Self::Yellow => 'Y',
            Self::Blue => 'B',
        }
    }

    /// Upper-case name used in state dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Blue => "BLUE",
        }
    }

    /// Look up a color by its coin-name initial.
    pub fn from_initial(initial: char) -> Result<Self, GameError> {
        Self::ALL
            .into_iter()
            .find(|c| c.initial() == initial)
            .ok_or_else(|| GameError::UnknownColor(initial.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| GameError::UnknownColor(s.to_string()))
    }
}
