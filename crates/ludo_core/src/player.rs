//! A player's four coins: legal-move queries, threat detection and the
//! move-selection heuristic.
//!
//! All queries are pure and linear in the number of coins. The only
//! mutating entry points are [`Player::get_multiple_moves`] and
//! [`Player::make_moves`], which also capture opponent coins.
//!
//! # Move selection
//!
//! [`Player::get_move`] walks a fixed priority list and returns the first
//! rule that yields a move:
//!
//! 1. **Finish** a coin that lands exactly on the final square.
//! 2. **Open** the lowest-indexed jailed coin on a 1 or a 6.
//! 3. **Kill** the most progressed opponent coin reachable.
//! 4. **Defend** the most progressed own coin under threat.
//! 5. **Advance** the most progressed non-stacking coin, falling back to the
//!    runner-up when that lands on a strictly less threatened square.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{self, DIE_FACES, FINISH, HOME_COLUMN_START};
use crate::coin::{Coin, CoinId, COINS_PER_PLAYER};
use crate::color::Color;
use crate::error::{GameError, Result};
use crate::moves::{parse_moves, Move};

/// Die value that opens a coin but only moves it onto the start square.
const OPENING_SIX: u8 = 6;

/// Which priority rule produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveReason {
    /// Lands exactly on the final square.
    Finish,
    /// Brings a coin out of the yard.
    Open,
    /// Captures an opponent coin.
    Kill,
    /// Moves a threatened coin away.
    Defend,
    /// Plain progress.
    Advance,
}

impl fmt::Display for MoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Finish => "finish",
            Self::Open => "open",
            Self::Kill => "kill",
            Self::Defend => "defend",
            Self::Advance => "advance",
        };
        f.write_str(s)
    }
}

/// One side of the match and its four coins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Player {
    color: Color,
    coins: [Coin; COINS_PER_PLAYER as usize],
}

impl Player {
    /// Create a player with all coins in the yard.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            color,
            coins: [0, 1, 2, 3].map(|index| Coin::new(CoinId { color, index })),
        }
    }

    /// Create a player with the given relative position for each coin.
    ///
    /// # Errors
    /// Returns an error if any position is past the final square.
    pub fn with_positions(color: Color, positions: [u8; COINS_PER_PLAYER as usize]) -> Result<Self> {
        let mut player = Self::new(color);
        for (index, relative) in positions.into_iter().enumerate() {
            player.coins[index] = Coin::at(color, index as u8, relative)?;
        }
        Ok(player)
    }

    /// This player's color.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// All coins, ordered by index.
    #[must_use]
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Look up one of this player's coins.
    ///
    /// # Errors
    /// Returns [`GameError::UnknownCoin`] if the coin belongs to another color.
    pub fn coin(&self, id: CoinId) -> Result<&Coin> {
        self.slot(id).map(|i| &self.coins[i])
    }

    fn slot(&self, id: CoinId) -> Result<usize> {
        if id.color != self.color || id.index >= COINS_PER_PLAYER {
            return Err(GameError::UnknownCoin(id.to_string()));
        }
        Ok(id.index as usize)
    }

    /// How much of the game this player has completed, in percent.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.coins
            .iter()
            .map(|c| 25.0 * f64::from(c.relative()) / f64::from(FINISH))
            .sum()
    }

    /// Coins still in the yard.
    #[must_use]
    pub fn in_jail(&self) -> Vec<&Coin> {
        self.coins.iter().filter(|c| c.is_jailed()).collect()
    }

    /// Coins that reached the final square.
    #[must_use]
    pub fn finished(&self) -> Vec<&Coin> {
        self.coins.iter().filter(|c| c.is_finished()).collect()
    }

    /// Coins inside the home column but not yet finished.
    #[must_use]
    pub fn on_home_column(&self) -> Vec<&Coin> {
        self.coins
            .iter()
            .filter(|c| (HOME_COLUMN_START..FINISH).contains(&c.relative()))
            .collect()
    }

    /// Coins on the board that can move `die` squares without overshooting.
    #[must_use]
    pub fn movable_coins(&self, die: u8) -> Vec<&Coin> {
        self.coins
            .iter()
            .filter(|c| !c.is_finished() && !c.is_jailed() && c.relative() + die <= FINISH)
            .collect()
    }

    /// Movable coins that would not stack on an own coin off a safe square.
    #[must_use]
    pub fn non_stacking_moves(&self, die: u8) -> Vec<&Coin> {
        self.movable_coins(die)
            .into_iter()
            .filter(|mover| {
                let landing = mover.relative() + die;
                board::is_safe(landing)
                    || !self
                        .coins
                        .iter()
                        .any(|other| other.index() != mover.index() && other.relative() == landing)
            })
            .collect()
    }

    /// Coins that land exactly on the final square with `die`.
    #[must_use]
    pub fn can_finish(&self, die: u8) -> Vec<&Coin> {
        self.coins
            .iter()
            .filter(|c| c.relative() + die == FINISH)
            .collect()
    }

    /// Number of opponent ring coins that could reach `relative` (in this
    /// player's frame) with a single die.
    ///
    /// Safe squares are never threatened.
    #[must_use]
    pub fn threat(&self, relative: u8, opponent: &Player) -> usize {
        if board::is_safe(relative) {
            return 0;
        }
        let target = board::rel_to_abs(self.color, relative);
        if target <= board::YARD_ABS {
            return 0;
        }
        opponent
            .coins
            .iter()
            .filter(|c| board::on_ring(c.relative()))
            .filter(|c| DIE_FACES.any(|d| c.rel_to_abs(c.relative() + d) == target))
            .count()
    }

    /// Own coins currently under threat, least progressed first.
    #[must_use]
    pub fn in_danger(&self, opponent: &Player) -> Vec<&Coin> {
        let mut coins: Vec<&Coin> = self
            .coins
            .iter()
            .filter(|c| self.threat(c.relative(), opponent) > 0)
            .collect();
        coins.sort_by_key(|c| c.relative());
        coins
    }

    /// `(killer, victim)` pairs available with `die`, sorted so the least
    /// progressed victim comes first.
    #[must_use]
    pub fn can_kill<'a>(&'a self, die: u8, opponent: &'a Player) -> Vec<(&'a Coin, &'a Coin)> {
        let mut kills = Vec::new();
        for killer in self.movable_coins(die) {
            let landing = killer.relative() + die;
            if board::is_safe(landing) {
                continue;
            }
            let spot = killer.rel_to_abs(landing);
            kills.extend(
                opponent
                    .coins
                    .iter()
                    .filter(|victim| victim.absolute() == spot)
                    .map(|victim| (killer, victim)),
            );
        }
        kills.sort_by_key(|(_, victim)| victim.relative());
        kills
    }

    /// Pick a move for `die`, or `None` when nothing can move.
    #[must_use]
    pub fn get_move(&self, die: u8, opponent: &Player) -> Option<Move> {
        self.choose_move(die, opponent).map(|(mv, _)| mv)
    }

    /// Like [`Player::get_move`], also reporting which rule fired.
    #[must_use]
    pub fn choose_move(&self, die: u8, opponent: &Player) -> Option<(Move, MoveReason)> {
        let pick = |coin: &Coin, reason| Some((Move::new(coin.id(), die), reason));

        if let Some(coin) = self.can_finish(die).first() {
            return pick(*coin, MoveReason::Finish);
        }

        if die == 1 || die == OPENING_SIX {
            if let Some(coin) = self.in_jail().first() {
                return pick(*coin, MoveReason::Open);
            }
        }

        if let Some((killer, _)) = self.can_kill(die, opponent).last() {
            return pick(*killer, MoveReason::Kill);
        }

        if let Some(coin) = self.in_danger(opponent).last() {
            return pick(*coin, MoveReason::Defend);
        }

        let mut candidates = self.non_stacking_moves(die);
        candidates.sort_by_key(|c| c.relative());
        match candidates.as_slice() {
            [] => None,
            [only] => pick(*only, MoveReason::Advance),
            [.., runner_up, farthest] => {
                let farthest_threat = self.threat(farthest.relative() + die, opponent);
                let runner_up_threat = self.threat(runner_up.relative() + die, opponent);
                if runner_up_threat < farthest_threat {
                    pick(*runner_up, MoveReason::Advance)
                } else {
                    pick(*farthest, MoveReason::Advance)
                }
            }
        }
    }

    /// Choose and immediately commit a move for each die, in order.
    ///
    /// Later dice see the board left by earlier ones. Returns the moves
    /// actually made.
    pub fn get_multiple_moves(&mut self, dice: &[u8], opponent: &mut Player) -> Vec<Move> {
        let mut made = Vec::with_capacity(dice.len());
        for &die in dice {
            let Some((mv, reason)) = self.choose_move(die, opponent) else {
                tracing::debug!(color = %self.color, die, "No move available");
                continue;
            };
            tracing::debug!(color = %self.color, die, %mv, %reason, "Chose move");
            self.commit(mv.coin.index as usize, die, opponent);
            made.push(mv);
        }
        made
    }

    /// Parse and apply move tokens such as `R0_6`, skipping `NA`.
    ///
    /// Tokens are trusted: no legality check is made beyond parsing and
    /// coin ownership. Returns the opponent coins captured along the way.
    ///
    /// # Errors
    /// Returns an error if any token is malformed or names a coin this
    /// player does not own. Nothing is applied in that case.
    pub fn make_moves<'a, I>(&mut self, tokens: I, opponent: &mut Player) -> Result<Vec<CoinId>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let moves = parse_moves(tokens)?;
        self.apply_moves(&moves, opponent)
    }

    /// Apply already parsed moves. See [`Player::make_moves`].
    ///
    /// # Errors
    /// Returns [`GameError::UnknownCoin`] if a move names a coin this player
    /// does not own. Nothing is applied in that case.
    pub fn apply_moves(&mut self, moves: &[Move], opponent: &mut Player) -> Result<Vec<CoinId>> {
        let slots = moves
            .iter()
            .map(|mv| self.slot(mv.coin))
            .collect::<Result<Vec<_>>>()?;

        let mut captured = Vec::new();
        for (slot, mv) in slots.into_iter().zip(moves) {
            captured.extend(self.commit(slot, mv.die, opponent));
        }
        Ok(captured)
    }

    /// Move one coin and capture whatever opponent coins share its square.
    fn commit(&mut self, slot: usize, die: u8, opponent: &mut Player) -> Vec<CoinId> {
        let coin = &mut self.coins[slot];
        let steps = if coin.is_jailed() && die == OPENING_SIX { 1 } else { die };
        let landing = coin.advance(steps);
        let spot = coin.absolute();

        if board::is_safe(landing) || spot <= board::YARD_ABS {
            return Vec::new();
        }

        let mut captured = Vec::new();
        for victim in opponent.coins.iter_mut().filter(|c| c.absolute() == spot) {
            tracing::debug!(killer = %coin.id(), victim = %victim.id(), spot, "Captured coin");
            victim.reset_to_yard();
            captured.push(victim.id());
        }
        captured
    }
}
