//! A single playing piece and its position.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{self, FINISH, YARD};
use crate::color::Color;
use crate::error::{GameError, Result};

/// Number of coins each player owns.
pub const COINS_PER_PLAYER: u8 = 4;

/// Identity of a coin: its color and its index within the player.
///
/// The string form `"<ColorInitial><index>"` (e.g. `R0`) is the canonical
/// external name used by the protocol and state dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinId {
    /// Owning color.
    pub color: Color,
    /// Index within the owning player (0-3).
    pub index: u8,
}

impl CoinId {
    /// Create a coin identity, validating the index.
    pub fn new(color: Color, index: u8) -> Result<Self> {
        if index >= COINS_PER_PLAYER {
            return Err(GameError::UnknownCoin(format!("{}{}", color.initial(), index)));
        }
        Ok(Self { color, index })
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.initial(), self.index)
    }
}

impl FromStr for CoinId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let unknown = || GameError::UnknownCoin(s.to_string());
        let mut chars = s.chars();
        let initial = chars.next().ok_or_else(unknown)?;
        let color = Color::from_initial(initial).map_err(|_| unknown())?;
        // Exactly one digit: no sign, no leading zeros
        let index = match chars.as_str().as_bytes() {
            [digit @ b'0'..=b'9'] => digit - b'0',
            _ => return Err(unknown()),
        };
        Self::new(color, index).map_err(|_| unknown())
    }
}

/// A coin and its position.
///
/// The relative position is only changed through [`Coin::advance`] and
/// [`Coin::reset_to_yard`], both of which keep the absolute position in
/// sync. A coin that reached [`FINISH`] never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Coin {
    id: CoinId,
    relative: u8,
    absolute: i8,
}

impl Coin {
    /// Create a coin in the yard.
    #[must_use]
    pub fn new(id: CoinId) -> Self {
        Self {
            id,
            relative: YARD,
            absolute: board::YARD_ABS,
        }
    }

    /// Create a coin at a given relative position.
    ///
    /// # Errors
    /// Returns an error if the index or position is out of range.
    pub fn at(color: Color, index: u8, relative: u8) -> Result<Self> {
        if relative > FINISH {
            return Err(GameError::PositionOutOfRange(relative));
        }
        let id = CoinId::new(color, index)?;
        Ok(Self {
            id,
            relative,
            absolute: board::rel_to_abs(color, relative),
        })
    }

    /// Identity of this coin.
    #[must_use]
    pub const fn id(&self) -> CoinId {
        self.id
    }

    /// Owning color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.id.color
    }

    /// Index within the owning player.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.id.index
    }

    /// Progress in the owner's frame (0-57).
    #[must_use]
    pub const fn relative(&self) -> u8 {
        self.relative
    }

    /// Position on the shared ring, or one of the yard/home sentinels.
    #[must_use]
    pub const fn absolute(&self) -> i8 {
        self.absolute
    }

    /// Whether the coin is in the yard.
    #[must_use]
    pub const fn is_jailed(&self) -> bool {
        self.relative == YARD
    }

    /// Whether the coin reached the terminal square.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.relative == FINISH
    }

    /// Convert a relative position in this coin's frame to an absolute one.
    #[must_use]
    pub fn rel_to_abs(&self, relative: u8) -> i8 {
        board::rel_to_abs(self.id.color, relative)
    }

    /// Move forward by `steps`, clamped at [`FINISH`].
    ///
    /// No-op on a finished coin. Returns the new relative position.
    pub fn advance(&mut self, steps: u8) -> u8 {
        if self.is_finished() {
            return self.relative;
        }
        self.relative = self.relative.saturating_add(steps).min(FINISH);
        self.absolute = self.rel_to_abs(self.relative);
        self.relative
    }

    /// Send the coin back to the yard after a capture.
    ///
    /// No-op on a finished coin.
    pub fn reset_to_yard(&mut self) {
        if self.is_finished() {
            return;
        }
        self.relative = YARD;
        self.absolute = board::YARD_ABS;
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}
