//! xiangqi-rules: Xiangqi rule engine driver.
//!
//! ## Usage
//!
//! - `xiangqi-rules` - Serve the XQP text protocol on stdin/stdout
//! - `xiangqi-rules demo` - Play a short scripted opening and print each step
//! - `xiangqi-rules perft --depth 3` - Count move paths from a position
//! - `xiangqi-rules selfplay --seed 42` - Play a random game
//!
//! Set `RUST_LOG=debug` to see rejected moves and detector decisions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use xiangqi_rules::board::{Board, Side};
use xiangqi_rules::constants::{DEFAULT_MAX_PLIES, REPETITION_LIMIT};
use xiangqi_rules::game::{Game, Rules};
use xiangqi_rules::notation::{board_from_fen, move_name, parse_move};
use xiangqi_rules::perft::split_perft;
use xiangqi_rules::playout::random_playout;
use xiangqi_rules::protocol::XqpEngine;

/// xiangqi-rules: Xiangqi move legality and game-termination engine
#[derive(Parser)]
#[command(name = "xiangqi-rules")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Occurrences of one position that draw the game
    #[arg(long, global = true, default_value_t = REPETITION_LIMIT)]
    repetition_limit: usize,

    /// Do not end the game on perpetual check
    #[arg(long, global = true)]
    no_perpetual_check: bool,

    /// Do not end the game on perpetual chase
    #[arg(long, global = true)]
    no_perpetual_chase: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the XQP text protocol on stdin/stdout
    Protocol,
    /// Play a short scripted game and print the board after each move
    Demo,
    /// Count leaf nodes of the legal-move tree
    Perft {
        /// Search depth in plies
        #[arg(short, long, default_value_t = 3)]
        depth: usize,
        /// Start position (FEN); the initial layout if omitted
        #[arg(long)]
        fen: Option<String>,
    },
    /// Play uniformly random legal moves until the game ends
    Selfplay {
        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Stop after this many plies
        #[arg(long, default_value_t = DEFAULT_MAX_PLIES)]
        max_plies: usize,
    },
}

impl Cli {
    fn rules(&self) -> Rules {
        Rules {
            repetition_limit: self.repetition_limit,
            detect_perpetual_check: !self.no_perpetual_check,
            detect_perpetual_chase: !self.no_perpetual_chase,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let rules = cli.rules();

    match cli.command {
        Some(Commands::Protocol) | None => {
            let mut engine = XqpEngine::new(rules);
            engine.run().context("protocol loop failed")?;
        }
        Some(Commands::Demo) => run_demo(rules)?,
        Some(Commands::Perft { depth, fen }) => run_perft(depth, fen.as_deref())?,
        Some(Commands::Selfplay { seed, max_plies }) => run_selfplay(rules, seed, max_plies),
    }
    Ok(())
}

/// A short opening that ends with a central cannon check.
fn run_demo(rules: Rules) -> Result<()> {
    println!("xiangqi-rules: rule engine demo\n");

    let mut game = Game::new(rules);
    println!("{}", game.board());
    println!("{}\n", game.board().to_labels());

    for text in [
        "h2e2", "h9g7", "h0g2", "i9h9", "i0h0", "b7e7", "e2e6",
    ] {
        let mv = parse_move(text)?;
        let mover = game.turn();
        let status = *game.play(mv).with_context(|| format!("demo move {text}"))?;
        println!("{mover} plays {}", move_name(mv));
        println!("{}", game.board());
        println!("FEN: {}", game.fen());
        println!("Status: {status}{}\n", if game.in_check() { " (check)" } else { "" });
        if status.is_over() {
            break;
        }
    }
    Ok(())
}

fn run_perft(depth: usize, fen: Option<&str>) -> Result<()> {
    let (board, side) = match fen {
        Some(fen) => board_from_fen(fen).context("invalid --fen")?,
        None => (Board::initial(), Side::Red),
    };

    let mut total = 0;
    for (mv, nodes) in split_perft(&board, side, depth) {
        println!("{}\t{nodes}", move_name(mv));
        total += nodes;
    }
    println!("\nperft({depth}) = {total}");
    Ok(())
}

fn run_selfplay(rules: Rules, seed: u64, max_plies: usize) {
    let mut game = Game::new(rules);
    let mut rng = fastrand::Rng::with_seed(seed);
    let report = random_playout(&mut game, max_plies, &mut rng);

    let moves: Vec<String> = report.moves.iter().map(|&mv| move_name(mv)).collect();
    println!("{}", moves.join(" "));
    println!("\n{}", game.board());
    println!("Plies: {}", report.plies);
    println!("Status: {}", report.status);
    println!("FEN: {}", report.fen);
}
