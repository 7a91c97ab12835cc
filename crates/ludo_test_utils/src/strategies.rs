//! Property-based testing strategies.

use ludo_core::board::{DIE_FACES, FINISH};
use ludo_core::color::Color;
use ludo_core::player::Player;
use ludo_core::state::MatchState;
use proptest::prelude::*;

/// Any of the four team colors.
pub fn arb_color() -> impl Strategy<Value = Color> {
    prop::sample::select(Color::ALL.to_vec())
}

/// Any relative position, yard to finish.
pub fn arb_relative() -> impl Strategy<Value = u8> {
    0..=FINISH
}

/// A single die value.
pub fn arb_die() -> impl Strategy<Value = u8> {
    DIE_FACES
}

/// A roll of one to three dice.
pub fn arb_dice() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(arb_die(), 1..=3)
}

/// A player of `color` with arbitrary coin positions.
pub fn arb_player(color: Color) -> impl Strategy<Value = Player> {
    prop::array::uniform4(arb_relative()).prop_map(move |positions| {
        Player::with_positions(color, positions).expect("positions generated in range")
    })
}

/// A match between two distinct colors with arbitrary positions.
pub fn arb_match() -> impl Strategy<Value = MatchState> {
    (arb_color(), 1..4u8)
        .prop_flat_map(|(me, offset)| {
            let opponent = Color::ALL[((me.ordinal() + offset) % 4) as usize];
            (arb_player(me), arb_player(opponent))
        })
        .prop_map(|(me, opponent)| {
            MatchState::from_players(me, opponent).expect("colors generated distinct")
        })
}
