//! go-board: command-line driver for the Go rules engine.
//!
//! ## Usage
//!
//! - `go-board` - Show a demo
//! - `go-board demo` - Play a short capture and ko sequence
//! - `go-board playouts` - Measure random playout throughput

use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use go_board::constants::{DEFAULT_KOMI, DEFAULT_WIDTH, PASS};
use go_board::{Board, Color, Point};

/// go-board: an incremental Go rules engine
#[derive(Parser)]
#[command(name = "go-board")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a short sequence with a capture and a ko
    Demo,
    /// Fill boards with random moves and report results and speed
    Playouts {
        /// Board width
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        size: usize,
        /// Number of games to play
        #[arg(long, default_value_t = 1000)]
        games: usize,
        /// Seed for the move generator; random if omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Points given to White
        #[arg(long, default_value_t = DEFAULT_KOMI)]
        komi: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.log_level);

    match cli.command {
        Some(Commands::Playouts {
            size,
            games,
            seed,
            komi,
        }) => run_playouts(size, games, seed, komi),
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn run_demo() -> anyhow::Result<()> {
    println!("go-board: incremental Go rules engine\n");

    let mut board = Board::with_width(9)?;
    for label in ["A1", "B1", "B2", "C2", "E5", "D1", "C1"] {
        let p = board.point(label)?;
        let color = board.color_to_play();
        let status = board.play(p);
        println!("{color:>5} {label:<3} {status:<4} hash {:#018x}", board.hash());
    }
    println!("\n{board}");
    println!(
        "ko point: {}",
        board.geometry().point_to_string(board.ko_point())
    );

    let retake = board.point("B1")?;
    println!("White retakes at B1: {}", board.play(retake));
    board.pass();
    board.play_labels(["F5"])?;
    println!("after a pass and F5, White at B1: {}", board.play(retake));
    println!("\n{board}");
    println!("moves: {}", board.move_sequence());
    println!(
        "final score: {:+.1} ({} wins)",
        board.final_score(),
        board.final_winner()
    );
    Ok(())
}

fn run_playouts(size: usize, games: usize, seed: Option<u64>, komi: f64) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut start = Board::with_width(size)?;
    start.set_komi(komi);
    let mut board = start.clone();

    info!(size, games, komi, "starting playouts");
    let started = Instant::now();
    let (mut black_wins, mut white_wins, mut total_moves) = (0usize, 0usize, 0usize);
    for _ in 0..games {
        board.copy_from(&start);
        play_random_game(&mut board, &mut rng);
        total_moves += board.turn();
        match board.playout_winner() {
            Color::Black => black_wins += 1,
            Color::White => white_wins += 1,
            _ => {}
        }
    }
    let seconds = started.elapsed().as_secs_f64();
    info!(seconds, total_moves, "playouts finished");

    println!("{games} playouts on {size}x{size}, komi {komi}");
    println!("Black wins: {black_wins}");
    println!("White wins: {white_wins}");
    if games > 0 {
        println!("Average length: {:.1} moves", total_moves as f64 / games as f64);
    }
    if seconds > 0.0 {
        println!("{:.0} playouts/second", games as f64 / seconds);
    }
    Ok(())
}

/// Plays uniformly random feasible moves until two passes in a row or the
/// game-length cutoff.
fn play_random_game(board: &mut Board, rng: &mut fastrand::Rng) {
    let max_moves = board.geometry().max_moves();
    while board.passes() < 2 && board.turn() < max_moves {
        play_random_move(board, rng);
    }
}

/// Plays the first feasible legal move found from a random starting
/// point in the vacant set, or passes.
fn play_random_move(board: &mut Board, rng: &mut fastrand::Rng) -> Point {
    let vacant = board.vacant_points().len();
    if vacant > 0 {
        let first = rng.usize(..vacant);
        for i in 0..vacant {
            let p = board.vacant_points().get((first + i) % vacant);
            if board.is_feasible(p) && board.play_fast(p).is_ok() {
                return p;
            }
        }
    }
    board.pass();
    PASS
}
