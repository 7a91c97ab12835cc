//! Headless Ludo bot.
//!
//! Plays one side of a two-player match against an opponent process that
//! talks the line protocol on stdin/stdout.
//!
//! # Usage
//!
//! ```bash
//! # Play a match (default command)
//! opponent | cargo run -p ludo_headless
//!
//! # Play with a config file and record the match
//! cargo run -p ludo_headless -- -c bot.ron play --record match.bin
//!
//! # Explain the choices available in a dumped position
//! cargo run -p ludo_headless -- inspect --state crash_state.txt
//!
//! # Re-apply a recorded match and check the final board
//! cargo run -p ludo_headless -- replay --file match.bin --expect final.txt
//! ```
//!
//! # Protocol
//!
//! Input (stdin): handshake, rolls and opponent moves, one per line
//! Output (stdout): `<THROW>` and move tokens, one per line
//! Logs (stderr): Debug information

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ludo_core::replay::MatchRecord;
use ludo_core::state::{BoardSnapshot, MatchState};
use ludo_core::strategy::DiceStrategy;
use ludo_headless::{
    analyze_position, EngineConfig, Handshake, LineIo, MatchEngine, ProtocolError,
};

#[derive(Parser)]
#[command(name = "ludo_headless")]
#[command(about = "Headless Ludo bot speaking the line protocol")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration file (RON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match on stdin/stdout
    Play {
        /// Dice strategy: in-order or best-permutation
        #[arg(short, long)]
        strategy: Option<DiceStrategy>,

        /// Save a match record to this file when the match ends
        #[arg(short, long)]
        record: Option<String>,

        /// Log a board snapshot after every turn
        #[arg(long)]
        snapshots: bool,
    },

    /// Show kill options, threats and chosen moves for a dumped position
    Inspect {
        /// State dump file
        #[arg(short, long)]
        state: PathBuf,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Replay a recorded match
    Replay {
        /// Record file path
        #[arg(short, long)]
        file: PathBuf,

        /// State dump the replay must end on
        #[arg(long)]
        expect: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Failed to load config");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    match cli.command {
        Some(Commands::Play {
            strategy,
            record,
            snapshots,
        }) => {
            config.apply_overrides(strategy, record, snapshots);
            cmd_play(&config);
        }
        Some(Commands::Inspect { state, json }) => {
            cmd_inspect(state, json);
        }
        Some(Commands::Replay { file, expect }) => {
            cmd_replay(file, expect);
        }
        None => {
            // Default: play on stdin/stdout
            cmd_play(&config);
        }
    }
}

/// Play one match on stdin/stdout
fn cmd_play(config: &EngineConfig) {
    tracing::info!(strategy = %config.strategy, "Waiting for handshake");

    let mut io = LineIo::new(std::io::stdin().lock(), std::io::stdout().lock());
    let handshake = match io.read_line().and_then(|line| Handshake::parse(&line)) {
        Ok(handshake) => handshake,
        Err(ProtocolError::StreamClosed) => {
            tracing::info!("Input closed before handshake");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "Handshake failed");
            std::process::exit(1);
        }
    };

    let mut engine = MatchEngine::from_handshake(&handshake, io).with_strategy(config.strategy);
    if config.record_path.is_some() {
        engine = engine.with_recording();
    }

    let observer = if config.snapshots || handshake.draw_board {
        let (tx, rx) = mpsc::channel();
        engine = engine.with_observer(tx);
        Some(thread::spawn(move || log_snapshots(&rx)))
    } else {
        None
    };

    let result = engine.run();

    if let (Some(path), Some(record)) = (&config.record_path, engine.record()) {
        match record.save(path) {
            Ok(()) => tracing::info!(path = %path, moves = record.move_count(), "Saved match record"),
            Err(e) => tracing::error!(error = %e, path = %path, "Failed to save match record"),
        }
    }

    let failed = match &result {
        Ok(()) => false,
        Err(e) => {
            let dump = engine.dump_state();
            tracing::error!(error = %e, state = %dump, "Fatal error");
            if let Some(path) = &config.dump_on_error {
                if let Err(write_err) = std::fs::write(path, format!("{dump}\n")) {
                    tracing::error!(error = %write_err, path = %path, "Failed to write state dump");
                }
            }
            true
        }
    };

    // Dropping the engine closes the snapshot channel
    drop(engine);
    if let Some(handle) = observer {
        let _ = handle.join();
    }

    if failed {
        std::process::exit(1);
    }
}

/// Log every snapshot as JSON until the engine hangs up
fn log_snapshots(rx: &Receiver<BoardSnapshot>) {
    for snapshot in rx {
        match serde_json::to_string(&snapshot) {
            Ok(json) => tracing::info!(turn = snapshot.turn, board = %json, "Snapshot"),
            Err(e) => tracing::warn!(error = %e, "Failed to encode snapshot"),
        }
    }
}

/// Print a per-die analysis of a dumped position
fn cmd_inspect(path: PathBuf, json: bool) {
    let state = match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| MatchState::load(&text).map_err(|e| e.to_string()))
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to load state from {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let report = analyze_position(&state);
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Failed to encode report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", report.to_markdown());
    }
}

/// Re-apply a recorded match and print the final board
fn cmd_replay(file: PathBuf, expect: Option<PathBuf>) {
    tracing::info!("Replaying match: {}", file.display());

    let record = match MatchRecord::load(&file) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load record: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!("Loaded record:");
    eprintln!("  Turns: {}", record.turns.len());
    eprintln!("  Moves: {}", record.move_count());

    let state = match record.replay() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("FAIL: Error during replay: {}", e);
            std::process::exit(1);
        }
    };
    println!("{}", state.dump());

    let Some(expect) = expect else {
        return;
    };
    let expected = match std::fs::read_to_string(&expect)
        .map_err(|e| e.to_string())
        .and_then(|text| MatchState::load(&text).map_err(|e| e.to_string()))
    {
        Ok(expected) => expected,
        Err(e) => {
            eprintln!("Failed to load expected state: {}", e);
            std::process::exit(1);
        }
    };

    if expected == state {
        eprintln!("PASS: Replay matches {}", expect.display());
    } else {
        eprintln!("FAIL: Replay produced a different board!");
        eprintln!("  Expected: {}", expected.dump().replace('\n', " | "));
        eprintln!("  Actual:   {}", state.dump().replace('\n', " | "));
        std::process::exit(1);
    }
}
