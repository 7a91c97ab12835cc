//! Error types for the rules engine.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all rules-engine errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// A move token did not have the `<coin>_<die>` shape.
    #[error("Malformed move token '{token}': {reason}")]
    MalformedMove {
        /// The offending token.
        token: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A coin name that does not belong to the player it was applied to.
    #[error("Unknown coin: {0}")]
    UnknownCoin(String),

    /// A color name or initial outside the four team colors.
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    /// A die value outside 1-6.
    #[error("Invalid die value: {0}")]
    InvalidDie(u8),

    /// A relative position outside 0-57.
    #[error("Relative position out of range: {0}")]
    PositionOutOfRange(u8),

    /// A state dump that does not follow the two-line format.
    #[error("Malformed state dump: {0}")]
    MalformedState(String),

    /// Dice strategy name that matches no known strategy.
    #[error("Unknown dice strategy: {0}")]
    UnknownStrategy(String),

    /// Match record could not be written, read or decoded.
    #[error("Match record error: {0}")]
    Record(String),
}
