//! Headless Qwirkle games between bot players.
use crate::bag::Bag;
use crate::engine::{is_valid_move_sequence, play_combo, Board, Position, Tile};
use crate::heuristics::{get_combo_points, Strategy};
use tracing::{debug, info};

/// Points a player earns for being the first to empty their hand.
pub const END_GAME_BONUS: u32 = 6;

/// A seat at the table: a bot strategy with its hand and score.
#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    strategy: Strategy,
    hand: Vec<Tile>,
    score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Player {
            name: name.into(),
            strategy,
            hand: Vec::new(),
            score: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn hand(&self) -> &[Tile] {
        &self.hand
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Removes one copy of each of `tiles` from the hand.
    pub fn remove_tiles_from_hand(&mut self, tiles: &[Tile]) {
        for tile in tiles {
            if let Some(index) = self.hand.iter().position(|held| held == tile) {
                self.hand.swap_remove(index);
            }
        }
    }

    pub fn out_of_tiles(&self) -> bool {
        self.hand.is_empty()
    }
}

/// What happened on one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A combo was played. `positions` are the cells it occupies on the board right after the turn.
    Played { points: u32, positions: Vec<Position> },
    /// No combo fit, so the hand went back into the bag for a fresh one.
    Exchanged,
    /// No combo fit and the bag was empty.
    Passed,
}

/// Manages the state and progression of a game between bot players.
///
/// Players take turns in seat order. On its turn a player's strategy picks a
/// combo; the combo is scored, committed and the hand refilled from the bag.
/// A player with no playable combo exchanges its hand, or passes once the bag
/// is empty.
///
/// The game is over when a player plays their last tile with the bag empty
/// (earning `END_GAME_BONUS`), or when every player in a row failed to play.
///
/// # Examples
/// ```
/// use qwirkle_bot::bag::Bag;
/// use qwirkle_bot::game::{Game, Player};
/// use qwirkle_bot::heuristics::Strategy;
///
/// let players = vec![
///     Player::new("greedy", Strategy::Points),
///     Player::new("smart", Strategy::Smart),
/// ];
/// let mut game = Game::new(players, Bag::new_with_seed(1));
/// assert!(game.play_turn().is_some());
/// assert!(!game.board().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    bag: Bag,
    players: Vec<Player>,
    current: usize,
    consecutive_idle_turns: usize,
    turns: u32,
    finished: bool,
}

impl Game {
    /// Starts a game on an empty board, dealing every player a hand from `bag` in seat order.
    ///
    /// # Panics
    /// Panics if `players` is empty.
    pub fn new(players: Vec<Player>, bag: Bag) -> Self {
        Self::new_with_board(Board::new(), players, bag)
    }

    /// Starts a game on a given board, dealing every player a hand from `bag` in seat order.
    ///
    /// # Panics
    /// Panics if `players` is empty.
    pub fn new_with_board(board: Board, mut players: Vec<Player>, mut bag: Bag) -> Self {
        assert!(!players.is_empty(), "a game needs at least one player");
        for player in players.iter_mut() {
            bag.draw_tiles(&mut player.hand);
        }
        Game {
            board,
            bag,
            players,
            current: 0,
            consecutive_idle_turns: 0,
            turns: 0,
            finished: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bag(&self) -> &Bag {
        &self.bag
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index of the player whose turn is next.
    pub fn current_player(&self) -> usize {
        self.current
    }

    /// Number of turns taken so far.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every player's score, in seat order.
    pub fn scores(&self) -> Vec<u32> {
        self.players.iter().map(Player::score).collect()
    }

    /// Plays the current player's turn.
    ///
    /// # Returns
    /// The turn's outcome, or `None` if the game is already over.
    pub fn play_turn(&mut self) -> Option<TurnOutcome> {
        if self.finished {
            return None;
        }

        let seat = self.current;
        let player = &self.players[seat];
        let combo = player.strategy.best_combo(&self.board, &player.hand);

        let outcome = match combo {
            Some(combo) => {
                debug_assert!(is_valid_move_sequence(&self.board, &combo));
                let points = get_combo_points(&mut self.board, &combo);
                play_combo(&mut self.board, &combo);
                let positions = self.board.last_played_positions(combo.len()).to_vec();

                let player = &mut self.players[seat];
                player.remove_tiles_from_hand(&combo.tiles());
                self.bag.draw_tiles(&mut player.hand);
                player.score += points;
                self.consecutive_idle_turns = 0;
                debug!(player = %player.name, %combo, points, "played combo");

                if player.out_of_tiles() {
                    player.score += END_GAME_BONUS;
                    info!(player = %player.name, "player went out");
                    self.finished = true;
                }
                TurnOutcome::Played { points, positions }
            }
            None => {
                self.consecutive_idle_turns += 1;
                let player = &mut self.players[seat];
                if self.bag.swap_all_tiles(&mut player.hand) {
                    debug!(player = %player.name, "exchanged hand");
                    TurnOutcome::Exchanged
                } else {
                    debug!(player = %player.name, "passed");
                    TurnOutcome::Passed
                }
            }
        };

        if self.consecutive_idle_turns >= self.players.len() {
            info!(turns = self.turns + 1, "no player can play, game over");
            self.finished = true;
        }

        self.turns += 1;
        self.current = (seat + 1) % self.players.len();
        Some(outcome)
    }

    /// Plays turns until the game is over.
    ///
    /// # Returns
    /// The final scores in seat order.
    pub fn play_to_end(&mut self) -> Vec<u32> {
        while self.play_turn().is_some() {}
        let scores = self.scores();
        info!(turns = self.turns, ?scores, "game finished");
        scores
    }
}
