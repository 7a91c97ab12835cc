//! Board geometry: the shared ring, home columns and safe squares.
//!
//! Every coin tracks its progress in its own player's frame (the
//! *relative* position). Comparing coins of different colors requires
//! rotating that frame onto the shared 52-square ring (the *absolute*
//! position).
//!
//! | Relative | Meaning | Absolute |
//! |---|---|---|
//! | 0 | yard | 0 |
//! | 1-51 | outer ring | 1-52, rotated by `13 * ordinal` |
//! | 52-56 | home column | -1 |
//! | 57 | finished | -1 |

use crate::color::Color;

/// Relative position of a coin still in the yard.
pub const YARD: u8 = 0;

/// Last relative position on the shared ring.
pub const LAST_RING_SQUARE: u8 = 51;

/// First relative position of the home column.
pub const HOME_COLUMN_START: u8 = 52;

/// Terminal relative position. A coin here never moves again.
pub const FINISH: u8 = 57;

/// Number of squares on the shared ring.
pub const RING_SIZE: i8 = 52;

/// Offset between neighbouring colors' start squares.
pub const START_OFFSET: i8 = 13;

/// Absolute position reported for coins in the yard.
pub const YARD_ABS: i8 = 0;

/// Absolute position reported for coins in any home column.
///
/// Never compared as equal for capture purposes.
pub const HOME_ABS: i8 = -1;

/// Start squares and star squares, in relative coordinates.
pub const SAFE_RING_SQUARES: [u8; 8] = [1, 9, 14, 22, 27, 35, 40, 48];

/// Smallest and largest legal die values.
pub const DIE_FACES: std::ops::RangeInclusive<u8> = 1..=6;

/// Most dice one roll can carry: two sixes and a third die.
pub const MAX_DICE_PER_ROLL: usize = 3;

/// Whether a relative position can never be a capture target.
#[must_use]
pub fn is_safe(relative: u8) -> bool {
    SAFE_RING_SQUARES.contains(&relative) || (HOME_COLUMN_START..=FINISH).contains(&relative)
}

/// Whether a relative position lies on the shared outer ring.
#[must_use]
pub fn on_ring(relative: u8) -> bool {
    (1..=LAST_RING_SQUARE).contains(&relative)
}

/// Rotate a relative position in `color`'s frame onto the shared ring.
///
/// Total: yard maps to [`YARD_ABS`], anything past the ring maps to
/// [`HOME_ABS`].
#[must_use]
pub fn rel_to_abs(color: Color, relative: u8) -> i8 {
    if relative == YARD {
        YARD_ABS
    } else if relative >= HOME_COLUMN_START {
        HOME_ABS
    } else {
        // 0-based for the modulo, back to 1-based after
        (relative as i8 - 1 + START_OFFSET * color.ordinal() as i8) % RING_SIZE + 1
    }
}
