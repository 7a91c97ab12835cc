//! Turn state machine driving one side of a match over the line protocol.
//!
//! The engine alternates strictly between our turns and the opponent's:
//!
//! ```text
//!            REPEAT
//!   +--------------------+
//!   v                    |
//! MyTurn ---------> AwaitOpponentSignal <--------+
//!   ^                    |                      |
//!   |   move list        | move list + REPEAT   |
//!   +--------------------+                      |
//!                        v                      |
//!                  OpponentRepeating -----------+
//! ```
//!
//! There is no terminal state. The match ends when the opponent closes
//! the stream.

use std::io::{BufRead, Write};
use std::sync::mpsc::Sender;

use ludo_core::moves::Move;
use ludo_core::replay::{MatchRecord, RecordedRoll, Side};
use ludo_core::state::{BoardSnapshot, MatchState};
use ludo_core::strategy::DiceStrategy;

use crate::io::LineIo;
use crate::protocol::{
    encode_moves, Handshake, OpponentMoves, OpponentSignal, PlayerSlot, ProtocolError,
    RollOutcome, THROW_TOKEN,
};

/// Where the engine is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Ask for a roll, then move.
    MyTurn,
    /// Wait for `REPEAT` or the opponent's turn.
    AwaitOpponentSignal,
    /// The opponent earned a bonus turn and plays again.
    OpponentRepeating,
}

impl TurnState {
    /// Starting state for a player slot.
    #[must_use]
    pub const fn initial(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::First => Self::MyTurn,
            PlayerSlot::Second => Self::AwaitOpponentSignal,
        }
    }
}

/// Plays one side of a match against a remote opponent.
pub struct MatchEngine<R, W> {
    state: MatchState,
    io: LineIo<R, W>,
    strategy: DiceStrategy,
    turn_state: TurnState,
    turn: u64,
    observer: Option<Sender<BoardSnapshot>>,
    record: Option<MatchRecord>,
}

impl<R: BufRead, W: Write> MatchEngine<R, W> {
    /// Create an engine over an existing match state.
    pub fn new(state: MatchState, turn_state: TurnState, io: LineIo<R, W>) -> Self {
        Self {
            state,
            io,
            strategy: DiceStrategy::default(),
            turn_state,
            turn: 0,
            observer: None,
            record: None,
        }
    }

    /// Create a fresh match for the slot named in the handshake.
    pub fn from_handshake(handshake: &Handshake, io: LineIo<R, W>) -> Self {
        let (me, opponent) = handshake.slot.colors();
        tracing::info!(
            me = %me,
            opponent = %opponent,
            time_limit = handshake.time_limit,
            game_mode = handshake.game_mode,
            draw_board = handshake.draw_board,
            "Handshake accepted"
        );
        Self::new(
            MatchState::new(me, opponent),
            TurnState::initial(handshake.slot),
            io,
        )
    }

    /// Use `strategy` to consume multi-die rolls.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DiceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Publish a snapshot to `observer` after every applied batch.
    #[must_use]
    pub fn with_observer(mut self, observer: Sender<BoardSnapshot>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Record every applied batch from the current state onward.
    #[must_use]
    pub fn with_recording(mut self) -> Self {
        self.record = Some(MatchRecord::new(&self.state));
        self
    }

    /// Current match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Current position in the turn cycle.
    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    /// Number of batches applied so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Match record, when recording is enabled.
    pub fn record(&self) -> Option<&MatchRecord> {
        self.record.as_ref()
    }

    /// Output written so far.
    pub fn output(&self) -> &W {
        self.io.writer()
    }

    /// Two-line text dump of the board.
    pub fn dump_state(&self) -> String {
        self.state.dump()
    }

    /// Replace the board with a previously dumped one.
    ///
    /// A running record restarts from the loaded board.
    pub fn load_state(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.state = MatchState::load(text)?;
        if self.record.is_some() {
            self.record = Some(MatchRecord::new(&self.state));
        }
        Ok(())
    }

    /// Advance exactly one state and return the new one.
    ///
    /// # Errors
    /// Returns [`ProtocolError::StreamClosed`] when input ends, or any
    /// malformed-input or IO error. The board is left untouched by a
    /// rejected line.
    pub fn step(&mut self) -> Result<TurnState, ProtocolError> {
        let next = match self.turn_state {
            TurnState::MyTurn => self.play_my_turn()?,
            TurnState::AwaitOpponentSignal => self.await_opponent()?,
            TurnState::OpponentRepeating => TurnState::AwaitOpponentSignal,
        };
        self.turn_state = next;
        Ok(next)
    }

    /// Step until the input closes or an error occurs.
    ///
    /// # Errors
    /// Returns the first error other than the stream closing.
    pub fn run(&mut self) -> Result<(), ProtocolError> {
        loop {
            match self.step() {
                Ok(_) => {}
                Err(ProtocolError::StreamClosed) => {
                    tracing::info!(turn = self.turn, "Input closed, match over");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn play_my_turn(&mut self) -> Result<TurnState, ProtocolError> {
        self.io.write_line(THROW_TOKEN)?;
        let line = self.io.read_line()?;
        let (dice, roll) = match RollOutcome::parse(&line)? {
            RollOutcome::Roll(dice) => (dice.clone(), RecordedRoll::Dice(dice)),
            RollOutcome::Forfeit => {
                tracing::info!("Roll forfeited");
                (Vec::new(), RecordedRoll::Forfeit)
            }
        };

        let moves = self.state.play_turn(&dice, self.strategy);
        let encoded = encode_moves(&moves);
        self.io.write_line(&encoded)?;

        self.turn += 1;
        tracing::info!(
            turn = self.turn,
            ?dice,
            moves = %encoded,
            progress = self.state.me().progress(),
            "Played turn"
        );
        self.committed(Side::Me, roll, moves);
        Ok(TurnState::AwaitOpponentSignal)
    }

    fn await_opponent(&mut self) -> Result<TurnState, ProtocolError> {
        if OpponentSignal::parse(&self.io.read_line()?) == OpponentSignal::Repeat {
            tracing::debug!("Bonus turn");
            return Ok(TurnState::MyTurn);
        }

        let line = self.io.read_line()?;
        let OpponentMoves { moves, repeat } = OpponentMoves::parse(&line)?;
        let captured = self.state.apply_opponent_moves(&moves)?;

        self.turn += 1;
        tracing::info!(turn = self.turn, moves = %line, repeat, "Opponent moved");
        if !captured.is_empty() {
            tracing::info!(?captured, "Lost coins to capture");
        }
        self.committed(Side::Opponent, RecordedRoll::Unseen, moves);

        Ok(if repeat {
            TurnState::OpponentRepeating
        } else {
            TurnState::MyTurn
        })
    }

    fn committed(&mut self, side: Side, roll: RecordedRoll, moves: Vec<Move>) {
        if let Some(record) = &mut self.record {
            record.record(self.turn, side, roll, moves);
        }
        if let Some(observer) = &self.observer {
            // Fire and forget
            let _ = observer.send(self.state.snapshot(self.turn));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ludo_core::coin::Coin;
    use ludo_core::error::GameError;
    use std::sync::mpsc;

    fn engine(slot: PlayerSlot, input: &'static str) -> MatchEngine<&'static [u8], Vec<u8>> {
        let (me, opponent) = slot.colors();
        MatchEngine::new(
            MatchState::new(me, opponent),
            TurnState::initial(slot),
            LineIo::new(input.as_bytes(), Vec::new()),
        )
    }

    fn output(engine: &MatchEngine<&'static [u8], Vec<u8>>) -> String {
        String::from_utf8(engine.output().clone()).unwrap()
    }

    #[test]
    fn test_my_turn_writes_throw_then_moves() {
        let mut e = engine(PlayerSlot::First, "You rolled: 6 3\n");
        assert_eq!(e.step().unwrap(), TurnState::AwaitOpponentSignal);
        assert_eq!(output(&e), "<THROW>\nR0_6<next>R0_3\n");
        assert_eq!(e.state().coin_by_name("R0").unwrap().relative(), 4);
        assert_eq!(e.turn(), 1);
    }

    #[test]
    fn test_no_legal_move_writes_na() {
        let mut e = engine(PlayerSlot::First, "You rolled: 4\n");
        e.step().unwrap();
        assert_eq!(output(&e), "<THROW>\nNA\n");
    }

    #[test]
    fn test_forfeit_is_recorded_apart_from_empty_roll() {
        let mut e = engine(
            PlayerSlot::First,
            "Three sixes, DUCK
REPEAT
You rolled:
",
        )
        .with_recording();
        e.run().unwrap();

        let record = e.record().unwrap();
        assert_eq!(record.turns.len(), 2);
        assert_eq!(record.turns[0].roll, RecordedRoll::Forfeit);
        assert_eq!(record.turns[1].roll, RecordedRoll::Dice(Vec::new()));
        assert!(record.turns.iter().all(|t| t.moves.is_empty()));
        assert_eq!(record.forfeit_count(), 1);
    }

    #[test]
    fn test_duck_forfeits_turn() {
        let mut e = engine(PlayerSlot::First, "DUCK\n");
        assert_eq!(e.step().unwrap(), TurnState::AwaitOpponentSignal);
        assert_eq!(output(&e), "<THROW>\nNA\n");
    }

    #[test]
    fn test_repeat_gives_us_a_bonus_turn() {
        let mut e = engine(PlayerSlot::First, "You rolled: 6\nREPEAT\nYou rolled: 2\n");
        e.step().unwrap();
        assert_eq!(e.step().unwrap(), TurnState::MyTurn);
        e.step().unwrap();
        assert_eq!(output(&e), "<THROW>\nR0_6\n<THROW>\nR0_2\n");
    }

    #[test]
    fn test_opponent_turn_is_applied() {
        let mut e = engine(
            PlayerSlot::First,
            "You rolled: 5\nOpponent rolled: 6 2\nY0_6<next>Y0_2\n",
        );
        e.step().unwrap();
        assert_eq!(e.step().unwrap(), TurnState::MyTurn);
        assert_eq!(e.state().coin_by_name("Y0").unwrap().relative(), 3);
    }

    #[test]
    fn test_trailing_repeat_suppresses_one_turn() {
        let mut e = engine(
            PlayerSlot::First,
            "You rolled: 5\nOpponent rolled: 6\nY0_6<next>REPEAT\nOpponent rolled: 4\nY0_4\n",
        );
        e.step().unwrap();
        assert_eq!(e.step().unwrap(), TurnState::OpponentRepeating);
        assert_eq!(e.step().unwrap(), TurnState::AwaitOpponentSignal);
        assert_eq!(e.step().unwrap(), TurnState::MyTurn);
        assert_eq!(e.state().coin_by_name("Y0").unwrap().relative(), 5);
        // Only the first turn asked for a roll
        assert_eq!(output(&e).matches(THROW_TOKEN).count(), 1);
    }

    #[test]
    fn test_second_slot_waits_for_opponent() {
        let mut e = engine(PlayerSlot::Second, "Opponent rolled: 6\nR0_6\nYou rolled: 6\n");
        assert_eq!(e.turn_state(), TurnState::AwaitOpponentSignal);
        assert_eq!(e.step().unwrap(), TurnState::MyTurn);
        assert_eq!(e.state().coin_by_name("R0").unwrap().relative(), 1);
        e.step().unwrap();
        assert_eq!(output(&e), "<THROW>\nY0_6\n");
    }

    #[test]
    fn test_malformed_roll_is_fatal() {
        let mut e = engine(PlayerSlot::First, "You rolled: six\n");
        assert!(matches!(e.step(), Err(ProtocolError::MalformedRoll(_))));
    }

    #[test]
    fn test_unknown_coin_is_fatal() {
        // We are yellow; the opponent may not move yellow coins
        let mut e = engine(PlayerSlot::Second, "Opponent rolled: 6\nY0_6\n");
        assert!(matches!(
            e.step(),
            Err(ProtocolError::Game(GameError::UnknownCoin(_)))
        ));
        assert!(e.state().coins().all(Coin::is_jailed));
    }

    #[test]
    fn test_run_ends_cleanly_on_eof() {
        let mut e = engine(PlayerSlot::First, "You rolled: 6\nREPEAT\nYou rolled: 1\n");
        e.run().unwrap();
        assert_eq!(e.turn(), 2);
    }

    #[test]
    fn test_run_stops_on_error() {
        let mut e = engine(PlayerSlot::First, "You rolled: 6\nOpponent\nG0_6\n");
        assert!(e.run().is_err());
    }

    #[test]
    fn test_observer_receives_snapshots() {
        let (tx, rx) = mpsc::channel();
        let mut e = engine(
            PlayerSlot::First,
            "You rolled: 6\nOpponent rolled: 1\nY1_1\n",
        )
        .with_observer(tx);
        e.step().unwrap();
        e.step().unwrap();

        let snapshots: Vec<BoardSnapshot> = rx.try_iter().collect();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].turn, 1);
        assert_eq!(snapshots[0].coins[0].relative, 1);
        assert_eq!(snapshots[1].coins[5].name, "Y1");
        assert_eq!(snapshots[1].coins[5].relative, 1);
    }

    #[test]
    fn test_dropped_observer_is_ignored() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut e = engine(PlayerSlot::First, "You rolled: 6\n").with_observer(tx);
        assert!(e.step().is_ok());
    }

    #[test]
    fn test_recording_replays_to_live_state() {
        let mut e = engine(
            PlayerSlot::First,
            "You rolled: 6 4\nOpponent rolled: 6 5\nY0_6<next>Y0_5\nYou rolled: 3\n",
        )
        .with_recording();
        e.run().unwrap();

        let record = e.record().unwrap();
        assert_eq!(record.turns.len(), 3);
        assert_eq!(record.turns[0].roll, RecordedRoll::Dice(vec![6, 4]));
        assert_eq!(record.turns[1].roll, RecordedRoll::Unseen);
        assert_eq!(&record.replay().unwrap(), e.state());
    }

    #[test]
    fn test_dump_and_load_state() {
        let mut e = engine(PlayerSlot::First, "");
        e.load_state("Players: RED, YELLOW\nCoins: R0_5, R1_0, R2_0, R3_0, Y0_0, Y1_0, Y2_0, Y3_0")
            .unwrap();
        assert_eq!(e.state().coin_by_name("R0").unwrap().relative(), 5);
        let dump = e.dump_state();
        let mut other = engine(PlayerSlot::First, "");
        other.load_state(&dump).unwrap();
        assert_eq!(other.state(), e.state());
        assert!(e.load_state("Players: RED").is_err());
    }
}
