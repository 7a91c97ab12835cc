//! How a multi-die roll is turned into moves.
//!
//! A roll can carry several dice (a six grants another die). The heuristic
//! in [`Player::get_move`](crate::player::Player::get_move) handles one die
//! at a time, so the order in which dice are consumed matters.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::MAX_DICE_PER_ROLL;
use crate::error::GameError;
use crate::moves::Move;
use crate::player::Player;

/// Dice consumption strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiceStrategy {
    /// Consume dice in the order they were rolled.
    #[default]
    InOrder,
    /// Try every distinct ordering on a scratch copy of the board and play
    /// the first one that makes the most moves.
    BestPermutation,
}

impl DiceStrategy {
    /// Choose and commit moves for `dice`, mutating both players.
    pub fn play(self, player: &mut Player, opponent: &mut Player, dice: &[u8]) -> Vec<Move> {
        match self {
            Self::InOrder => player.get_multiple_moves(dice, opponent),
            Self::BestPermutation => {
                let order = best_order(player, opponent, dice);
                tracing::debug!(?dice, ?order, "Chose dice order");
                player.get_multiple_moves(&order, opponent)
            }
        }
    }
}

impl fmt::Display for DiceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InOrder => f.write_str("in-order"),
            Self::BestPermutation => f.write_str("best-permutation"),
        }
    }
}

impl FromStr for DiceStrategy {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "in-order" => Ok(Self::InOrder),
            "best-permutation" => Ok(Self::BestPermutation),
            other => Err(GameError::UnknownStrategy(other.to_string())),
        }
    }
}

/// The dice ordering that applies the most moves; ties keep the earliest.
///
/// Rolls longer than [`MAX_DICE_PER_ROLL`] are not searched and keep their
/// received order.
fn best_order(player: &Player, opponent: &Player, dice: &[u8]) -> Vec<u8> {
    if dice.len() > MAX_DICE_PER_ROLL {
        tracing::warn!(?dice, "Too many dice to search, keeping received order");
        return dice.to_vec();
    }
    let mut best: Option<(usize, Vec<u8>)> = None;
    for order in distinct_permutations(dice) {
        let mut scratch = player.clone();
        let mut scratch_opponent = opponent.clone();
        let applied = scratch.get_multiple_moves(&order, &mut scratch_opponent).len();
        if best.as_ref().map_or(true, |(most, _)| applied > *most) {
            best = Some((applied, order));
        }
    }
    best.map(|(_, order)| order).unwrap_or_default()
}

/// All orderings of `dice` without repeats, starting with the given order.
///
/// Equal values are tried once per position, so every ordering is produced
/// exactly once.
pub fn distinct_permutations(dice: &[u8]) -> Vec<Vec<u8>> {
    fn helper(dice: &[u8], used: &mut Vec<bool>, partial: &mut Vec<u8>, res: &mut Vec<Vec<u8>>) {
        if partial.len() == dice.len() {
            res.push(partial.clone());
            return;
        }
        let mut tried = HashSet::new();
        for i in 0..dice.len() {
            if used[i] || !tried.insert(dice[i]) {
                continue;
            }
            used[i] = true;
            partial.push(dice[i]);
            helper(dice, used, partial, res);
            partial.pop();
            used[i] = false;
        }
    }

    let mut res = Vec::new();
    helper(dice, &mut vec![false; dice.len()], &mut Vec::new(), &mut res);
    res
}
