//! Headless Ludo bot speaking a line protocol on stdin/stdout.
//!
//! The opponent process sends a handshake, rolls and its own moves as text
//! lines; the engine answers with move tokens. This crate provides:
//!
//! - **Protocol**: parsing of handshake, roll and move-list lines
//! - **Engine**: the turn state machine driving [`ludo_core`]
//! - **Inspection**: per-die analysis of a dumped position
//!
//! # Protocol
//!
//! - **stdin**: handshake, roll lines, opponent signals and move lists
//! - **stdout**: `<THROW>` requests and our move tokens
//! - **stderr**: logs (human-readable)
//!
//! See [`protocol`] module for the line formats.
//!
//! # Example
//!
//! ```bash
//! # Play as slot 1
//! printf '1 60 0 0\nYou rolled: 6 3\n' | cargo run -p ludo_headless
//!
//! # Explain the moves available in a dumped position
//! cargo run -p ludo_headless -- inspect --state crash_state.txt
//! ```

pub mod config;
pub mod engine;
pub mod inspect;
pub mod io;
pub mod protocol;

pub use config::{ConfigError, EngineConfig};
pub use engine::{MatchEngine, TurnState};
pub use inspect::{analyze_position, PositionReport};
pub use io::LineIo;
pub use protocol::{Handshake, PlayerSlot, ProtocolError};
