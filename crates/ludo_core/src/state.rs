//! Match state: both players, coin lookup, text dumps and snapshots.
//!
//! # Dump format
//!
//! ```text
//! Players: RED, YELLOW
//! Coins: R0_0, R1_12, R2_0, R3_57, Y0_4, Y1_0, Y2_0, Y3_0
//! ```
//!
//! The first color is the side this engine plays. Only relative positions
//! are stored; absolute positions are derived again on load.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::coin::{Coin, CoinId, COINS_PER_PLAYER};
use crate::color::Color;
use crate::error::{GameError, Result};
use crate::moves::Move;
use crate::player::Player;
use crate::strategy::DiceStrategy;

const PLAYERS_PREFIX: &str = "Players:";
const COINS_PREFIX: &str = "Coins:";

/// The two players of a match.
///
/// Serialize-only: a board is restored through [`MatchState::load`], which
/// re-derives every absolute position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchState {
    me: Player,
    opponent: Player,
}

impl MatchState {
    /// Fresh match with every coin in the yard.
    #[must_use]
    pub fn new(me: Color, opponent: Color) -> Self {
        debug_assert_ne!(me, opponent, "players must have different colors");
        Self {
            me: Player::new(me),
            opponent: Player::new(opponent),
        }
    }

    /// Build a match from two existing players.
    ///
    /// # Errors
    /// Returns an error if both players share a color.
    pub fn from_players(me: Player, opponent: Player) -> Result<Self> {
        if me.color() == opponent.color() {
            return Err(GameError::MalformedState(format!(
                "both players are {}",
                me.color()
            )));
        }
        Ok(Self { me, opponent })
    }

    /// The side this engine plays.
    #[must_use]
    pub const fn me(&self) -> &Player {
        &self.me
    }

    /// The remote side.
    #[must_use]
    pub const fn opponent(&self) -> &Player {
        &self.opponent
    }

    /// Look up any coin in the match by identity.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownCoin`] for colors not in this match.
    pub fn coin(&self, id: CoinId) -> Result<&Coin> {
        if id.color == self.me.color() {
            self.me.coin(id)
        } else if id.color == self.opponent.color() {
            self.opponent.coin(id)
        } else {
            Err(GameError::UnknownCoin(id.to_string()))
        }
    }

    /// Look up a coin by its canonical name, e.g. `R0`.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownCoin`] if the name is not a coin of this match.
    pub fn coin_by_name(&self, name: &str) -> Result<&Coin> {
        self.coin(name.parse()?)
    }

    /// Choose and commit this side's moves for a roll.
    pub fn play_turn(&mut self, dice: &[u8], strategy: DiceStrategy) -> Vec<Move> {
        strategy.play(&mut self.me, &mut self.opponent, dice)
    }

    /// Apply moves reported by the opponent. Captures hit this side's coins.
    ///
    /// # Errors
    /// Returns an error if a move names a coin the opponent does not own.
    pub fn apply_opponent_moves(&mut self, moves: &[Move]) -> Result<Vec<CoinId>> {
        self.opponent.apply_moves(moves, &mut self.me)
    }

    /// Apply moves for this side without running the heuristic.
    ///
    /// # Errors
    /// Returns an error if a move names a coin this side does not own.
    pub fn apply_own_moves(&mut self, moves: &[Move]) -> Result<Vec<CoinId>> {
        self.me.apply_moves(moves, &mut self.opponent)
    }

    /// Every coin, this side's first.
    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.me.coins().iter().chain(self.opponent.coins())
    }

    /// Serialize to the two-line text format.
    #[must_use]
    pub fn dump(&self) -> String {
        let coins: Vec<String> = self
            .coins()
            .map(|c| format!("{}_{}", c.id(), c.relative()))
            .collect();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{PLAYERS_PREFIX} {}, {}",
            self.me.color(),
            self.opponent.color()
        );
        let _ = write!(out, "{COINS_PREFIX} {}", coins.join(", "));
        out
    }

    /// Parse the two-line text format produced by [`MatchState::dump`].
    ///
    /// # Errors
    /// Returns [`GameError::MalformedState`] if a line is missing or
    /// malformed, a coin is listed twice or missing, or a position is out
    /// of range.
    pub fn load(text: &str) -> Result<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let malformed = |msg: &str| GameError::MalformedState(msg.to_string());

        let players = lines
            .next()
            .and_then(|l| l.strip_prefix(PLAYERS_PREFIX))
            .ok_or_else(|| malformed("missing 'Players:' line"))?;
        let colors = players
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Color>>>()?;
        let [me, opponent] = colors[..] else {
            return Err(malformed("expected exactly two player colors"));
        };
        if me == opponent {
            return Err(malformed("both players have the same color"));
        }

        let coins = lines
            .next()
            .and_then(|l| l.strip_prefix(COINS_PREFIX))
            .ok_or_else(|| malformed("missing 'Coins:' line"))?;

        let mut my_positions = [0; COINS_PER_PLAYER as usize];
        let mut their_positions = [0; COINS_PER_PLAYER as usize];
        let mut seen = HashSet::new();
        for entry in coins.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, relative) = entry
                .rsplit_once('_')
                .ok_or_else(|| malformed(&format!("bad coin entry '{entry}'")))?;
            let id: CoinId = name.parse()?;
            let relative: u8 = relative
                .parse()
                .map_err(|_| malformed(&format!("bad position in '{entry}'")))?;
            if !seen.insert(id) {
                return Err(malformed(&format!("coin {id} listed twice")));
            }
            let positions = if id.color == me {
                &mut my_positions
            } else if id.color == opponent {
                &mut their_positions
            } else {
                return Err(GameError::UnknownCoin(id.to_string()));
            };
            positions[id.index as usize] = relative;
        }
        if seen.len() != 2 * COINS_PER_PLAYER as usize {
            return Err(malformed("not every coin is listed"));
        }

        Ok(Self {
            me: Player::with_positions(me, my_positions)?,
            opponent: Player::with_positions(opponent, their_positions)?,
        })
    }

    /// Immutable copy of every coin position, for observers.
    #[must_use]
    pub fn snapshot(&self, turn: u64) -> BoardSnapshot {
        BoardSnapshot {
            turn,
            players: [self.me.color(), self.opponent.color()],
            coins: self
                .coins()
                .map(|c| CoinSnapshot {
                    name: c.id().to_string(),
                    relative: c.relative(),
                    absolute: c.absolute(),
                })
                .collect(),
        }
    }
}

/// Read-only view of the board after a committed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Number of turns the engine has processed so far.
    pub turn: u64,
    /// This side's color, then the opponent's.
    pub players: [Color; 2],
    /// Every coin, this side's first.
    pub coins: Vec<CoinSnapshot>,
}

/// Position of one coin inside a [`BoardSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    /// Canonical coin name.
    pub name: String,
    /// Relative position.
    pub relative: u8,
    /// Absolute position.
    pub absolute: i8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_fresh_match() {
        let state = MatchState::new(Color::Red, Color::Yellow);
        assert_eq!(
            state.dump(),
            "Players: RED, YELLOW\n\
             Coins: R0_0, R1_0, R2_0, R3_0, Y0_0, Y1_0, Y2_0, Y3_0"
        );
    }

    #[test]
    fn test_load_restores_positions() {
        let text = "Players: YELLOW, RED\n\
                    Coins: Y0_4, Y1_0, Y2_52, Y3_57, R0_30, R1_0, R2_0, R3_1\n";
        let state = MatchState::load(text).unwrap();
        assert_eq!(state.me().color(), Color::Yellow);
        assert_eq!(state.coin_by_name("Y2").unwrap().relative(), 52);
        assert_eq!(state.coin_by_name("R0").unwrap().absolute(), 30);
        assert_eq!(state.coin_by_name("Y0").unwrap().absolute(), 30);
        assert_eq!(MatchState::load(&state.dump()).unwrap(), state);
    }

    #[test]
    fn test_load_derives_absolute_positions() {
        let text = "Players: GREEN, BLUE\n\
                    Coins: G0_1, G1_13, G2_51, G3_55, B0_0, B1_26, B2_40, B3_57\n";
        let state = MatchState::load(text).unwrap();
        for coin in state.coins() {
            assert_eq!(
                coin.absolute(),
                crate::board::rel_to_abs(coin.id().color, coin.relative()),
                "{}",
                coin.id()
            );
        }
        assert_eq!(state.coin_by_name("G3").unwrap().absolute(), crate::board::HOME_ABS);
    }

    #[test]
    fn test_load_rejects_bad_dumps() {
        assert!(MatchState::load("").is_err());
        assert!(MatchState::load("Players: RED\nCoins:").is_err());
        assert!(MatchState::load("Players: RED, RED\nCoins:").is_err());
        // Missing coins
        assert!(MatchState::load("Players: RED, YELLOW\nCoins: R0_1").is_err());
        // Foreign color
        assert!(MatchState::load(
            "Players: RED, YELLOW\nCoins: R0_0, R1_0, R2_0, R3_0, Y0_0, Y1_0, Y2_0, G3_0"
        )
        .is_err());
        // Out of range position
        assert!(MatchState::load(
            "Players: RED, YELLOW\nCoins: R0_58, R1_0, R2_0, R3_0, Y0_0, Y1_0, Y2_0, Y3_0"
        )
        .is_err());
    }

    #[test]
    fn test_coin_lookup_unknown_color() {
        let state = MatchState::new(Color::Red, Color::Yellow);
        assert!(matches!(
            state.coin_by_name("G0"),
            Err(GameError::UnknownCoin(_))
        ));
        assert!(state.coin_by_name("garbage").is_err());
    }

    #[test]
    fn test_opponent_moves_capture_my_coins() {
        let mut state = MatchState::load(
            "Players: RED, YELLOW\nCoins: R0_18, R1_0, R2_0, R3_0, Y0_41, Y1_0, Y2_0, Y3_0",
        )
        .unwrap();
        // Yellow 41 + 3 = 44, abs 18
        let moves = crate::moves::parse_moves(["Y0_3"]).unwrap();
        let captured = state.apply_opponent_moves(&moves).unwrap();
        assert_eq!(captured.len(), 1);
        assert!(state.me().coins()[0].is_jailed());
    }

    #[test]
    fn test_snapshot_lists_all_coins() {
        let state = MatchState::new(Color::Yellow, Color::Red);
        let snap = state.snapshot(3);
        assert_eq!(snap.turn, 3);
        assert_eq!(snap.players, [Color::Yellow, Color::Red]);
        assert_eq!(snap.coins.len(), 8);
        assert_eq!(snap.coins[0].name, "Y0");
        assert_eq!(snap.coins[4].name, "R0");
    }
}
