//! # Ludo Core
//!
//! Deterministic rules engine for two-player Ludo.
//!
//! This crate contains **only** game logic:
//! - No protocol IO (the headless crate owns stdin/stdout)
//! - No randomness (dice come from the opponent process)
//! - No rendering
//!
//! ## Crate Structure
//!
//! - [`board`] - Ring geometry, safe squares, relative/absolute transform
//! - [`coin`] - Coin identity and bounded position updates
//! - [`player`] - Move queries, threat detection and move selection
//! - [`strategy`] - How multi-die rolls are consumed
//! - [`state`] - Match state, text dumps and observer snapshots
//! - [`replay`] - Match records for replay and debugging

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod board;
pub mod coin;
pub mod color;
pub mod error;
pub mod moves;
pub mod player;
pub mod replay;
pub mod state;
pub mod strategy;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::board::{is_safe, rel_to_abs, FINISH, HOME_ABS, YARD, YARD_ABS};
    pub use crate::coin::{Coin, CoinId};
    pub use crate::color::Color;
    pub use crate::error::{GameError, Result};
    pub use crate::moves::{parse_moves, Move, NO_MOVE};
    pub use crate::player::{MoveReason, Player};
    pub use crate::replay::{MatchRecord, RecordedRoll, Side};
    pub use crate::state::{BoardSnapshot, MatchState};
    pub use crate::strategy::DiceStrategy;
}
