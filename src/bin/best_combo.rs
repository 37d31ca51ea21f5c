use anyhow::{bail, Context, Result};
use clap::Parser;
use qwirkle_bot::engine::{play_combo, Board};
use qwirkle_bot::heuristics::{ComboEvaluation, Strategy};
use qwirkle_bot::utils::{board_from_str_array, hand_from_str};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Strategy used to pick the combo
    #[clap(short, long, value_enum, default_value_t = Strategy::Smart)]
    strategy: Strategy,

    /// Tiles in hand, e.g. "Rs Bc G*"
    #[clap(long)]
    hand: String,

    /// Path to the board file (whitespace separated tiles, "." for an empty cell)
    board_file: PathBuf,
}

fn read_board_file(path: &Path) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    board_from_str_array(&lines).context("invalid board format")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let board = read_board_file(&args.board_file)?;
    let hand = hand_from_str(&args.hand).context("invalid hand")?;
    if hand.is_empty() {
        bail!("the hand holds no tiles");
    }
    info!(board_file = %args.board_file.display(), strategy = %args.strategy, "loaded board");

    println!("Initial board state:\n{}\n", board);
    let hand_text: Vec<String> = hand.iter().map(ToString::to_string).collect();
    println!("Hand: {}", hand_text.join(" "));
    println!("Searching with the {} strategy...\n", args.strategy);

    let Some(combo) = args.strategy.best_combo(&board, &hand) else {
        println!("No combo can be played. The hand should be exchanged.");
        return Ok(());
    };

    let evaluation = ComboEvaluation::evaluate(&mut board.clone(), &combo);
    println!("Best combo ({} tiles): {}", combo.len(), combo);
    println!("Evaluation: {}\n", evaluation);

    let mut final_board = board;
    play_combo(&mut final_board, &combo);
    let placed = final_board.last_played_positions(combo.len());
    println!(
        "Final board state:\n{}",
        final_board.to_string_with_highlight(placed)
    );
    Ok(())
}
