use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{Color, Stylize};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use chess_slider::{BreadthFirstSearch, Piece, PuzzleState};

/// Solve the 2x3 king/bishop/rook sliding puzzle.
#[derive(Parser)]
#[command(name = "chess-slider", about = "Find a shortest solution to the chess slider puzzle")]
struct Cli {
    /// Start from a board scrambled by this many random legal moves
    #[arg(long)]
    scramble: Option<usize>,

    /// Seed for the scramble, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print only the move list
    #[arg(long)]
    quiet: bool,

    /// Disable coloured pieces
    #[arg(long)]
    no_color: bool,
}

fn render(puzzle: &PuzzleState, color: bool) -> String {
    let mut out = String::new();
    for row in puzzle.board() {
        for &piece in row {
            let symbol = piece.symbol().to_string();
            if color {
                let styled = match piece {
                    Piece::King => symbol.with(Color::Yellow).bold(),
                    Piece::Bishop => symbol.with(Color::Cyan),
                    Piece::Rook => symbol.with(Color::Magenta),
                    Piece::Empty => symbol.with(Color::DarkGrey),
                };
                out.push_str(&format!("{} ", styled));
            } else {
                out.push_str(&format!("{} ", symbol));
            }
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let color = !cli.no_color;

    let mut puzzle = PuzzleState::new();
    if let Some(steps) = cli.scramble {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        puzzle.scramble(&mut rng, steps);
        info!("Scrambled start with {} random moves", steps);
    }
    let mut original = puzzle.clone();

    if !cli.quiet {
        println!("Initial Puzzle:\n{}", render(&puzzle, color));
    }

    let mut bfs = BreadthFirstSearch::new();
    let Some(output) = bfs.solve(&puzzle) else {
        println!("No solution found.");
        return Ok(());
    };
    let stats = bfs.stats();
    info!(
        "Search expanded {} states, visited {}",
        stats.expanded, stats.visited
    );
    println!("Found optimal solution with: {} moves", output.len());

    for (step, item) in output.into_iter().enumerate() {
        original
            .make_move(item)
            .with_context(|| format!("Replaying step {} of the solution", step + 1))?;
        if cli.quiet {
            println!("{}", item);
        } else {
            println!("{}. {}\n{}", step + 1, item, render(&original, color));
        }
    }

    Ok(())
}
