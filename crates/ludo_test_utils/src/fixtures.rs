//! Test fixtures and helpers.
//!
//! Pre-built players and match states for consistent testing.

use ludo_core::color::Color;
use ludo_core::moves::Move;
use ludo_core::player::Player;
use ludo_core::state::MatchState;

/// Create a player with the given relative positions.
///
/// # Panics
///
/// Panics if a position is past the final square.
#[must_use]
pub fn player(color: Color, positions: [u8; 4]) -> Player {
    Player::with_positions(color, positions).expect("fixture positions must be in range")
}

/// Red (engine side) against Yellow with the given positions.
///
/// # Panics
///
/// Panics if a position is past the final square.
#[must_use]
pub fn red_vs_yellow(red: [u8; 4], yellow: [u8; 4]) -> MatchState {
    MatchState::from_players(player(Color::Red, red), player(Color::Yellow, yellow))
        .expect("fixture colors differ")
}

/// Relative position at which `color` sits on the same ring square as
/// `relative` in `other`'s frame, if that square is on `color`'s ring.
#[must_use]
pub fn same_square(other: Color, relative: u8, color: Color) -> Option<u8> {
    let target = ludo_core::board::rel_to_abs(other, relative);
    (1..=ludo_core::board::LAST_RING_SQUARE)
        .find(|&r| ludo_core::board::rel_to_abs(color, r) == target)
}

/// Parse a move token.
///
/// # Panics
///
/// Panics if the token is malformed.
#[must_use]
pub fn mv(token: &str) -> Move {
    token.parse().expect("fixture move token must parse")
}

/// Render moves the way the protocol writes them.
#[must_use]
pub fn tokens(moves: &[Move]) -> Vec<String> {
    moves.iter().map(ToString::to_string).collect()
}
