//! Move tokens exchanged with the opponent process.
//!
//! A move is written `"<coin>_<die>"`, e.g. `R0_6` moves Red's coin 0 by
//! a rolled six. The literal [`NO_MOVE`] stands for "no move" and is
//! dropped before anything is applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::DIE_FACES;
use crate::coin::CoinId;
use crate::error::{GameError, Result};

/// Token meaning "no legal move".
pub const NO_MOVE: &str = "NA";

/// A single coin move for one die value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The coin being moved.
    pub coin: CoinId,
    /// The die value consumed by the move.
    pub die: u8,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(coin: CoinId, die: u8) -> Self {
        Self { coin, die }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.coin, self.die)
    }
}

impl FromStr for Move {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self> {
        let malformed = |reason: &str| GameError::MalformedMove {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let (coin, die) = token
            .trim()
            .split_once('_')
            .ok_or_else(|| malformed("missing '_' separator"))?;
        let die = match die.as_bytes() {
            [digit @ b'0'..=b'9'] => digit - b'0',
            _ => return Err(malformed("die is not a single digit")),
        };
        if !DIE_FACES.contains(&die) {
            return Err(malformed("die out of range"));
        }
        let coin: CoinId = coin.parse()?;
        Ok(Self { coin, die })
    }
}

/// Parse a list of move tokens, skipping [`NO_MOVE`] and blank entries.
///
/// # Errors
/// Fails on the first malformed token.
pub fn parse_moves<'a, I>(tokens: I) -> Result<Vec<Move>>
where
    I: IntoIterator<Item = &'a str>,
{
    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty() && *t != NO_MOVE)
        .map(str::parse::<Move>)
        .collect()
}
