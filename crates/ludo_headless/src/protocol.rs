//! Line protocol spoken with the opponent process.
//!
//! Every message is a single line of text. Lines from the opponent arrive
//! on stdin, our lines go to stdout.
//!
//! # Protocol Flow
//!
//! 1. Opponent sends the handshake: `<playerId> <timeLimit> <gameMode> <drawBoard>`
//! 2. On our turn we write `<THROW>` and read back the roll line
//! 3. We answer with `NA` or move tokens joined by `<next>`
//! 4. Opponent sends either `REPEAT` (we roll again) or its own roll line
//!    followed by its move list, which may end in `REPEAT`
//!
//! # Example Session (slot 1)
//!
//! ```text
//! -> 1 60 0 0
//! <- <THROW>
//! -> You rolled: 6 3
//! <- R0_6<next>R0_3
//! -> Opponent rolled: 5
//! -> NA
//! <- <THROW>
//! ```

use ludo_core::board::{DIE_FACES, MAX_DICE_PER_ROLL};
use ludo_core::color::Color;
use ludo_core::error::GameError;
use ludo_core::moves::{parse_moves, Move, NO_MOVE};
use thiserror::Error;

/// Written to ask the opponent process for a roll.
pub const THROW_TOKEN: &str = "<THROW>";

/// Separator between move tokens on one line.
pub const MOVE_SEPARATOR: &str = "<next>";

/// Signals a bonus turn for whoever just moved.
pub const REPEAT: &str = "REPEAT";

/// Marks a forfeited roll.
pub const DUCK: &str = "DUCK";

/// Index of the first die value in a roll line.
const FIRST_DIE_TOKEN: usize = 2;

/// Errors raised while talking to the opponent process.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Reading or writing a line failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The opponent closed its end of the stream.
    #[error("Input stream closed")]
    StreamClosed,

    /// The first line was not four integers with a known player slot.
    #[error("Malformed handshake '{line}': {reason}")]
    MalformedHandshake {
        /// Line as received.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A die value in the roll line was not an integer in 1-6, or the line
    /// carried more dice than one roll can.
    #[error("Malformed roll line '{0}'")]
    MalformedRoll(String),

    /// Rules engine rejected the input.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Which side of the match this process plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    /// Plays red, moves first.
    First,
    /// Plays yellow, moves second.
    Second,
}

impl PlayerSlot {
    /// Our color and the opponent's.
    #[must_use]
    pub const fn colors(self) -> (Color, Color) {
        match self {
            Self::First => (Color::Red, Color::Yellow),
            Self::Second => (Color::Yellow, Color::Red),
        }
    }
}

/// First line sent by the opponent process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handshake {
    /// Side we play.
    pub slot: PlayerSlot,
    /// Per-move time limit. Logged, not enforced.
    pub time_limit: i64,
    /// Game mode. Logged, not interpreted.
    pub game_mode: i64,
    /// Whether the board should be drawn.
    pub draw_board: bool,
}

impl Handshake {
    /// Parse `<playerId> <timeLimit> <gameMode> <drawBoard>`.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let malformed = |reason: &str| ProtocolError::MalformedHandshake {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let fields = line
            .split_whitespace()
            .map(str::parse::<i64>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| malformed(&e.to_string()))?;
        let [player_id, time_limit, game_mode, draw_board] = fields[..] else {
            return Err(malformed("expected four integers"));
        };

        let slot = match player_id {
            1 => PlayerSlot::First,
            2 => PlayerSlot::Second,
            other => return Err(malformed(&format!("unknown player id {other}"))),
        };

        Ok(Self {
            slot,
            time_limit,
            game_mode,
            draw_board: draw_board != 0,
        })
    }
}

/// What the opponent process reported for our roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// Dice values, in the order they were rolled.
    Roll(Vec<u8>),
    /// The roll was forfeited.
    Forfeit,
}

impl RollOutcome {
    /// Parse a roll line. Any line containing `DUCK` is a forfeit.
    ///
    /// At most [`MAX_DICE_PER_ROLL`] dice are accepted.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        if line.contains(DUCK) {
            return Ok(Self::Forfeit);
        }
        let dice = line
            .split_whitespace()
            .skip(FIRST_DIE_TOKEN)
            .map(|token| {
                token
                    .parse::<u8>()
                    .ok()
                    .filter(|die| DIE_FACES.contains(die))
                    .ok_or_else(|| ProtocolError::MalformedRoll(line.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if dice.len() > MAX_DICE_PER_ROLL {
            return Err(ProtocolError::MalformedRoll(line.to_string()));
        }
        Ok(Self::Roll(dice))
    }
}

/// First line the opponent sends after our move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentSignal {
    /// We get another turn.
    Repeat,
    /// The opponent takes its turn; its move list follows.
    Turn,
}

impl OpponentSignal {
    /// Classify a signal line.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        if line.trim() == REPEAT {
            Self::Repeat
        } else {
            Self::Turn
        }
    }
}

/// Opponent move list, with the bonus-turn marker split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentMoves {
    /// Moves to apply, `NA` tokens removed.
    pub moves: Vec<Move>,
    /// The opponent plays again after these moves.
    pub repeat: bool,
}

impl OpponentMoves {
    /// Parse a move-list line such as `Y0_6<next>Y0_2<next>REPEAT`.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut tokens: Vec<&str> = line
            .split(MOVE_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        let repeat = tokens.last() == Some(&REPEAT);
        if repeat {
            tokens.pop();
        }
        Ok(Self {
            moves: parse_moves(tokens)?,
            repeat,
        })
    }
}

/// Encode our moves as one output line.
#[must_use]
pub fn encode_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return NO_MOVE.to_string();
    }
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(MOVE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_parse() {
        let hs = Handshake::parse("1 60 0 1").unwrap();
        assert_eq!(hs.slot, PlayerSlot::First);
        assert_eq!(hs.time_limit, 60);
        assert!(hs.draw_board);
        assert_eq!(hs.slot.colors(), (Color::Red, Color::Yellow));

        let hs = Handshake::parse("  2 30 1 0 ").unwrap();
        assert_eq!(hs.slot.colors(), (Color::Yellow, Color::Red));
        assert!(!hs.draw_board);
    }

    #[test]
    fn test_handshake_rejects_bad_input() {
        for line in ["", "1 60 0", "1 60 0 0 0", "one 60 0 0", "3 60 0 0"] {
            assert!(
                matches!(
                    Handshake::parse(line),
                    Err(ProtocolError::MalformedHandshake { .. })
                ),
                "accepted {line:?}"
            );
        }
    }

    #[test]
    fn test_roll_parse() {
        assert_eq!(
            RollOutcome::parse("You rolled: 6 6 2").unwrap(),
            RollOutcome::Roll(vec![6, 6, 2])
        );
        assert_eq!(
            RollOutcome::parse("You rolled:").unwrap(),
            RollOutcome::Roll(vec![])
        );
        assert_eq!(
            RollOutcome::parse("Three sixes, DUCK").unwrap(),
            RollOutcome::Forfeit
        );
    }

    #[test]
    fn test_roll_rejects_bad_dice() {
        for line in [
            "You rolled: x",
            "You rolled: 7",
            "You rolled: 0",
            "You rolled: -1",
            "You rolled: 6 6 6 2",
        ] {
            assert!(matches!(
                RollOutcome::parse(line),
                Err(ProtocolError::MalformedRoll(_))
            ));
        }
    }

    #[test]
    fn test_roll_dice_count_limit() {
        assert_eq!(
            RollOutcome::parse("You rolled: 6 6 5").unwrap(),
            RollOutcome::Roll(vec![6, 6, 5])
        );
        let long = format!("You rolled: {}", "6 ".repeat(10_000));
        assert!(matches!(
            RollOutcome::parse(&long),
            Err(ProtocolError::MalformedRoll(_))
        ));
    }

    #[test]
    fn test_opponent_signal() {
        assert_eq!(OpponentSignal::parse("REPEAT"), OpponentSignal::Repeat);
        assert_eq!(OpponentSignal::parse(" REPEAT "), OpponentSignal::Repeat);
        assert_eq!(OpponentSignal::parse("Rolled 4"), OpponentSignal::Turn);
    }

    #[test]
    fn test_opponent_moves_trailing_repeat() {
        let parsed = OpponentMoves::parse("Y0_6<next>Y0_2<next>REPEAT").unwrap();
        assert!(parsed.repeat);
        assert_eq!(parsed.moves.len(), 2);

        let parsed = OpponentMoves::parse("NA").unwrap();
        assert!(!parsed.repeat);
        assert!(parsed.moves.is_empty());
    }

    #[test]
    fn test_opponent_moves_malformed_token() {
        assert!(matches!(
            OpponentMoves::parse("Y0_6<next>garbage"),
            Err(ProtocolError::Game(GameError::MalformedMove { .. }))
        ));
    }

    #[test]
    fn test_encode_moves() {
        assert_eq!(encode_moves(&[]), "NA");
        let moves = parse_moves(["R0_6", "R0_3"]).unwrap();
        assert_eq!(encode_moves(&moves), "R0_6<next>R0_3");
    }
}
