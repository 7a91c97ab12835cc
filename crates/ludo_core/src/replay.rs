//! Match records for replaying and debugging games.
//!
//! A record stores the starting state dump and every applied batch of
//! moves, tagged with the side that made them. Re-applying the batches to
//! the starting state deterministically reproduces the final board.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GameError, Result};
use crate::moves::Move;
use crate::state::MatchState;

/// Record file format version for compatibility.
pub const RECORD_VERSION: u32 = 2;

/// Which side made a recorded batch of moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// The side this engine plays.
    Me,
    /// The remote side.
    Opponent,
}

/// Roll behind a recorded batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordedRoll {
    /// Not parsed. Opponent rolls are never read.
    Unseen,
    /// Dice values, in the order they were rolled.
    Dice(Vec<u8>),
    /// The roll was forfeited and no dice were played.
    Forfeit,
}

/// One applied batch of moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Engine turn counter when the batch was applied.
    pub turn: u64,
    /// Who moved.
    pub side: Side,
    /// Roll the moves were made with.
    pub roll: RecordedRoll,
    /// Moves applied, in order.
    pub moves: Vec<Move>,
}

/// Complete match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Record format version.
    pub version: u32,
    /// State dump the match started from.
    pub initial_state: String,
    /// Applied batches in order.
    pub turns: Vec<TurnRecord>,
}

impl MatchRecord {
    /// Start a record from the given state.
    #[must_use]
    pub fn new(initial: &MatchState) -> Self {
        Self {
            version: RECORD_VERSION,
            initial_state: initial.dump(),
            turns: Vec::new(),
        }
    }

    /// Append an applied batch.
    pub fn record(&mut self, turn: u64, side: Side, roll: RecordedRoll, moves: Vec<Move>) {
        self.turns.push(TurnRecord {
            turn,
            side,
            roll,
            moves,
        });
    }

    /// Re-apply every batch to the initial state.
    ///
    /// # Errors
    /// Returns an error if the initial state cannot be parsed or a recorded
    /// move names a coin of the wrong side.
    pub fn replay(&self) -> Result<MatchState> {
        let mut state = MatchState::load(&self.initial_state)?;
        for turn in &self.turns {
            match turn.side {
                Side::Me => state.apply_own_moves(&turn.moves)?,
                Side::Opponent => state.apply_opponent_moves(&turn.moves)?,
            };
        }
        Ok(state)
    }

    /// Number of forfeited turns on our side.
    #[must_use]
    pub fn forfeit_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.roll == RecordedRoll::Forfeit)
            .count()
    }

    /// Total number of recorded moves.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.turns.iter().map(|t| t.moves.len()).sum()
    }

    /// Save the record to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::Record(format!("Failed to serialize record: {}", e)))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::Record(format!("Failed to write record file: {}", e)))?;
        Ok(())
    }

    /// Load a record from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or deserialization fails, or the
    /// version does not match.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::Record(format!("Failed to read record file: {}", e)))?;
        let record: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::Record(format!("Failed to deserialize record: {}", e)))?;

        if record.version != RECORD_VERSION {
            return Err(GameError::Record(format!(
                "Record version mismatch: expected {}, got {}",
                RECORD_VERSION, record.version
            )));
        }

        Ok(record)
    }
}
