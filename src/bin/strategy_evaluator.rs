use clap::Parser;
use qwirkle_bot::bag::Bag;
use qwirkle_bot::game::{Game, Player};
use qwirkle_bot::heuristics::Strategy;
use std::collections::HashMap;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of seeded games to play
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// Seed of the first game; game `i` uses `seed + i`
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut all_scores: HashMap<Strategy, Vec<u32>> = HashMap::new();
    let mut wins: HashMap<Strategy, u32> = HashMap::new();

    println!("Starting strategy evaluation for {} games...", args.games);

    for game_idx in 0..args.games {
        let current_seed = args.seed + game_idx;

        // Alternate who opens so neither strategy keeps the first-move edge.
        let mut seating = Strategy::ALL.to_vec();
        if game_idx % 2 == 1 {
            seating.reverse();
        }
        let players = seating
            .iter()
            .map(|&strategy| Player::new(strategy.name(), strategy))
            .collect();

        let mut game = Game::new(players, Bag::new_with_seed(current_seed));
        let scores = game.play_to_end();
        info!(game = game_idx, seed = current_seed, turns = game.turns(), "game done");

        println!("\nGame {} (Seed: {}, Turns: {})", game_idx, current_seed, game.turns());
        for (strategy, score) in seating.iter().zip(&scores) {
            println!("  Strategy: {:<10}, Score: {}", strategy, score);
            all_scores.entry(*strategy).or_default().push(*score);
        }

        let best = scores.iter().copied().max().unwrap_or(0);
        let leaders: Vec<&Strategy> = seating
            .iter()
            .zip(&scores)
            .filter(|&(_, &score)| score == best)
            .map(|(strategy, _)| strategy)
            .collect();
        if let [winner] = leaders.as_slice() {
            *wins.entry(**winner).or_default() += 1;
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of games played: {}", args.games);
    println!("\n--- Average Scores ---");

    let mut sorted_avg_scores: Vec<(Strategy, f64)> = Vec::new();
    for (strategy, scores) in &all_scores {
        if scores.is_empty() {
            continue;
        }
        let total_score: u32 = scores.iter().sum();
        sorted_avg_scores.push((*strategy, total_score as f64 / scores.len() as f64));
    }

    // Sort by average score descending
    sorted_avg_scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (strategy, avg_score) in sorted_avg_scores {
        println!(
            "Strategy {:<10}: Average Score = {:.2}, Wins = {}",
            strategy,
            avg_score,
            wins.get(&strategy).copied().unwrap_or(0)
        );
    }
}
