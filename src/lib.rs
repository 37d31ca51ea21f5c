//! # Qwirkle Bot Library
//!
//! This library provides the game logic for Qwirkle and the move engine bots
//! use to play it: an exhaustive search over every legal combo of a hand, a
//! scoring engine and the strategies that pick a combo.
//!
//! It is used by two binaries:
//! - `best_combo`: Takes a board file and a hand, then prints the combo a
//!   strategy picks with its points and risk metrics.
//! - `strategy_evaluator`: Plays seeded bot-versus-bot games and reports the
//!   average score of every strategy.
//!
//! ## Modules
//! - `engine`: Tiles, the growable `Board`, line legality and rendering.
//! - `solver`: `Move`, `Combo` and `find_valid_combos`, the backtracking combo search.
//! - `heuristics`: Points, qwirkle chances caused, lines killed, and the
//!   greedy and multi-criteria strategies.
//! - `bag`: The seeded bag of 108 tiles.
//! - `game`: Headless turns between bot players.
//! - `utils`: Text notation parsers for tiles, hands and boards.
//! - `error`: The parser error type.

pub mod bag;
pub mod engine;
pub mod error;
pub mod game;
pub mod heuristics;
pub mod solver;
pub mod utils;
