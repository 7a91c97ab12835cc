//! End-to-end matches over in-memory streams.

use std::io::Write;

use ludo_core::prelude::*;
use ludo_headless::protocol::OpponentMoves;
use ludo_headless::{EngineConfig, Handshake, LineIo, MatchEngine, PlayerSlot, TurnState};
use ludo_test_utils::fixtures::{red_vs_yellow, same_square};

/// Read the handshake from `input` and build the engine the binary would.
fn start(input: &'static str) -> MatchEngine<&'static [u8], Vec<u8>> {
    let mut io = LineIo::new(input.as_bytes(), Vec::new());
    let handshake = Handshake::parse(&io.read_line().unwrap()).unwrap();
    MatchEngine::from_handshake(&handshake, io)
}

fn output_lines(engine: &MatchEngine<&'static [u8], Vec<u8>>) -> Vec<String> {
    String::from_utf8(engine.output().clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn slot_one_full_exchange() {
    let mut engine = start(
        "1 60 0 0\n\
         You rolled: 6 3\n\
         Opponent rolled: 6 1\n\
         Y0_6<next>Y0_1\n\
         You rolled: 1\n\
         REPEAT\n\
         You rolled: DUCK\n\
         Opponent rolled: 2\n\
         NA\n",
    );
    engine.run().unwrap();

    // The last request for a roll goes unanswered when input ends
    assert_eq!(
        output_lines(&engine),
        vec!["<THROW>", "R0_6<next>R0_3", "<THROW>", "R1_1", "<THROW>", "NA", "<THROW>"]
    );
    assert_eq!(engine.state().coin_by_name("R0").unwrap().relative(), 4);
    assert_eq!(engine.state().coin_by_name("R1").unwrap().relative(), 1);
    assert_eq!(engine.state().coin_by_name("Y0").unwrap().relative(), 2);
    assert_eq!(engine.turn_state(), TurnState::MyTurn);
}

#[test]
fn slot_two_plays_yellow_after_red() {
    let mut engine = start("2 60 0 0\nOpponent rolled: 6 5\nR0_6<next>R0_5\nYou rolled: 6 2\n");
    assert_eq!(engine.turn_state(), TurnState::AwaitOpponentSignal);
    engine.run().unwrap();

    assert_eq!(output_lines(&engine), vec!["<THROW>", "Y0_6<next>Y0_2"]);
    assert_eq!(engine.state().me().color(), Color::Yellow);
    assert_eq!(engine.state().coin_by_name("R0").unwrap().relative(), 6);
}

#[test]
fn opponent_capture_sends_our_coin_home() {
    // Red R0 at 18 (abs 18); Yellow at 41 (abs 15) rolls a 3
    let state = red_vs_yellow([18, 0, 0, 0], [41, 0, 0, 0]);
    let io = LineIo::new("Opponent rolled: 3\nY0_3\n".as_bytes(), Vec::new());
    let mut engine = MatchEngine::new(state, TurnState::AwaitOpponentSignal, io);

    engine.step().unwrap();

    assert!(engine.state().me().coins()[0].is_jailed());
    assert_eq!(engine.state().opponent().coins()[0].absolute(), 18);
}

#[test]
fn our_capture_is_reported_in_moves() {
    let victim = same_square(Color::Red, 18, Color::Yellow).unwrap();
    let state = red_vs_yellow([15, 0, 0, 0], [victim, 0, 0, 0]);
    let io = LineIo::new("You rolled: 3\n".as_bytes(), Vec::new());
    let mut engine = MatchEngine::new(state, TurnState::MyTurn, io);

    engine.step().unwrap();

    assert_eq!(
        String::from_utf8(engine.output().clone()).unwrap(),
        "<THROW>\nR0_3\n"
    );
    assert!(engine.state().opponent().coins()[0].is_jailed());
}

#[test]
fn best_permutation_uses_every_die() {
    // In order the 3 is wasted before the 6 opens a coin
    let input = "1 60 0 0\nYou rolled: 3 6\n";

    let mut in_order = start(input);
    in_order.run().unwrap();
    assert_eq!(output_lines(&in_order)[1], "R0_6");

    let mut best = start(input).with_strategy(DiceStrategy::BestPermutation);
    best.run().unwrap();
    assert_eq!(output_lines(&best)[1], "R0_6<next>R0_3");
}

#[test]
fn fatal_error_leaves_state_dumpable() {
    let mut engine = start("1 60 0 0\nYou rolled: 6\nOpponent rolled: 6\nB0_6\n");
    assert!(engine.run().is_err());

    let restored = MatchState::load(&engine.dump_state()).unwrap();
    assert_eq!(&restored, engine.state());
    assert_eq!(restored.coin_by_name("R0").unwrap().relative(), 1);
}

#[test]
fn record_survives_save_and_load() {
    let mut engine = start(
        "1 60 0 0\n\
         You rolled: 6 4\n\
         Opponent rolled: 6\n\
         Y2_6<next>REPEAT\n\
         Opponent rolled: 5\n\
         Y2_5\n\
         You rolled: 2\n",
    )
    .with_recording();
    engine.run().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.bin");
    engine.record().unwrap().save(&path).unwrap();

    let loaded = MatchRecord::load(&path).unwrap();
    assert_eq!(loaded.turns.len(), 4);
    assert_eq!(loaded.turns[1].side, Side::Opponent);
    assert_eq!(&loaded.replay().unwrap(), engine.state());
}

#[test]
fn config_file_drives_engine_options() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "(strategy: best_permutation, snapshots: true)").unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.strategy, DiceStrategy::BestPermutation);
    assert!(config.snapshots);
    assert!(config.record_path.is_none());
}

#[test]
fn move_list_round_trips_through_protocol() {
    let parsed = OpponentMoves::parse("Y1_6<next>Y1_4<next>NA").unwrap();
    assert!(!parsed.repeat);
    assert_eq!(parsed.moves.len(), 2);

    let handshake = Handshake::parse("2 10 0 1").unwrap();
    assert_eq!(handshake.slot, PlayerSlot::Second);
    assert!(handshake.draw_board);
}
