use crate::engine::{is_valid_line, play_combo, Axis, Board, Position, Tile, MAX_LINE_LENGTH};
use crate::solver::{find_valid_combos, Combo};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Points for completing a line of `MAX_LINE_LENGTH` tiles.
pub const QWIRKLE_POINTS: u32 = 12;

/// Empty cells the killed-line probe walks past before giving up on a direction.
const MAX_PROBED_GAP: usize = 4;

/// Calculates the points a finished line of `line_len` tiles is worth.
///
/// A line scores one point per tile, except a qwirkle which always scores
/// `QWIRKLE_POINTS`. Single tiles are not lines and score nothing.
///
/// # Examples
/// ```
/// use qwirkle_bot::heuristics::get_tile_line_points;
/// assert_eq!(get_tile_line_points(1), 0);
/// assert_eq!(get_tile_line_points(4), 4);
/// assert_eq!(get_tile_line_points(6), 12);
/// ```
pub fn get_tile_line_points(line_len: usize) -> u32 {
    match line_len {
        0 | 1 => 0,
        MAX_LINE_LENGTH => QWIRKLE_POINTS,
        n => n as u32,
    }
}

/// Calculates the total points `combo` scores on `board`.
///
/// The combo is played onto the board, then every distinct line of two or more
/// tiles passing through a placed tile scores `get_tile_line_points`. A line
/// crossed by several placed tiles counts once; lines are told apart by the
/// cells they cover. The board is restored before returning.
///
/// # Arguments
/// * `board`: The board to score on. Left unchanged.
/// * `combo`: A combo known to be legal on `board`.
///
/// # Returns
/// The combo's points as a `u32`. A lone tile on an empty board scores 0.
pub fn get_combo_points(board: &mut Board, combo: &Combo) -> u32 {
    let board_state = board.get_state();

    play_combo(board, combo);
    let placed = board.last_played_positions(combo.len()).to_vec();

    let mut points = 0;
    let mut seen_lines: HashSet<Vec<Position>> = HashSet::new();
    for position in placed {
        for axis in Axis::ALL {
            let line = board.get_line_cells(position, axis);
            if line.len() > 1 && !seen_lines.contains(&line) {
                points += get_tile_line_points(line.len());
                seen_lines.insert(line);
            }
        }
    }

    board.restore_state(board_state);
    points
}

/// Counts the qwirkle chances `combo` leaves for the next player.
///
/// Moves are applied one at a time. Before each move, a line through its cell
/// that would reach 5 tiles adds a chance and a line that would reach 6 removes
/// one, if any are counted: the combo itself finished a line it had brought to
/// 5. Measuring move by move keeps a 5-tile line that a later move of the same
/// combo completes from being reported. The board is restored before returning.
pub fn get_qwirkle_chances_caused(board: &mut Board, combo: &Combo) -> u32 {
    let board_state = board.get_state();

    let mut chances: u32 = 0;
    for mv in combo.moves() {
        let horizontal = board.get_adjacent_horizontal_line(mv.tile, mv.position).len();
        let vertical = board.get_adjacent_vertical_line(mv.tile, mv.position).len();

        if horizontal == MAX_LINE_LENGTH {
            chances = chances.saturating_sub(1);
        }
        if vertical == MAX_LINE_LENGTH {
            chances = chances.saturating_sub(1);
        }
        if horizontal == MAX_LINE_LENGTH - 1 {
            chances += 1;
        }
        if vertical == MAX_LINE_LENGTH - 1 {
            chances += 1;
        }

        board.play_tile(mv.tile, mv.position);
    }

    board.restore_state(board_state);
    chances
}

/// Counts the future lines `combo` rules out.
///
/// After the combo is played, each placed tile looks left, right, up and down.
/// When the neighbouring cell is empty, the probe walks on past at most
/// `MAX_PROBED_GAP` empty cells for another tile. If it finds one, the placed
/// tile's line and the found tile's line are joined; a joined line that would
/// fit in `MAX_LINE_LENGTH` cells with the gap but breaks the line rule is a
/// connection this combo killed. A tile kills at most four lines, and two tiles
/// of one combo facing each other across a gap both count that connection.
/// The board is restored before returning.
pub fn get_possible_lines_killed(board: &mut Board, combo: &Combo) -> u32 {
    let board_state = board.get_state();

    play_combo(board, combo);
    let placed = board.last_played_positions(combo.len()).to_vec();

    let mut lines_killed = 0;
    for (mv, position) in combo.moves().iter().zip(placed) {
        for direction in Direction::ALL {
            if kills_line_towards(board, mv.tile, position, direction) {
                lines_killed += 1;
            }
        }
    }

    board.restore_state(board_state);
    lines_killed
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }
}

/// Probes from `position` towards `direction` for a killed line.
fn kills_line_towards(board: &Board, tile: Tile, position: Position, direction: Direction) -> bool {
    let axis = direction.axis();
    let (along, extent) = match axis {
        Axis::Horizontal => (position.col, board.cols()),
        Axis::Vertical => (position.row, board.rows()),
    };
    let cell = |index: usize| match axis {
        Axis::Horizontal => Position::new(position.row, index),
        Axis::Vertical => Position::new(index, position.col),
    };

    // Indices past the empty neighbour, nearest first. Index 0 is never probed
    // when walking backwards: it is always the empty border.
    let probed: Vec<usize> = match direction {
        Direction::Left | Direction::Up => {
            if along <= 1 || board.tile_at(cell(along - 1)).is_some() {
                return false;
            }
            (1..along - 1).rev().collect()
        }
        Direction::Right | Direction::Down => {
            if along + 1 >= extent || board.tile_at(cell(along + 1)).is_some() {
                return false;
            }
            (along + 2..extent).collect()
        }
    };

    for (gap, index) in (1..=MAX_PROBED_GAP).zip(probed) {
        let found_position = cell(index);
        if let Some(found) = board.tile_at(found_position) {
            let mut joined = board.get_adjacent_line(tile, position, axis);
            joined.extend(board.get_adjacent_line(found, found_position, axis));
            return joined.len() + gap <= MAX_LINE_LENGTH && !is_valid_line(&joined);
        }
    }
    false
}

/// The three metrics the multi-criteria strategy ranks combos by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComboEvaluation {
    pub points: u32,
    pub chances: u32,
    pub kills: u32,
}

impl ComboEvaluation {
    /// Computes all three metrics of `combo` on `board`. The board is left unchanged.
    pub fn evaluate(board: &mut Board, combo: &Combo) -> Self {
        ComboEvaluation {
            points: get_combo_points(board, combo),
            chances: get_qwirkle_chances_caused(board, combo),
            kills: get_possible_lines_killed(board, combo),
        }
    }

    /// Whether a candidate with these metrics should replace the `held` best.
    ///
    /// Fewer chances caused wins outright. With equal chances, more points wins.
    /// With equal chances and points, killing no more lines than `held` wins, so a
    /// full tie goes to the candidate.
    pub fn is_smarter_than(&self, held: &ComboEvaluation) -> bool {
        if self.chances != held.chances {
            return self.chances < held.chances;
        }
        if self.points != held.points {
            return self.points > held.points;
        }
        self.kills <= held.kills
    }
}

impl fmt::Display for ComboEvaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pts, {} chances caused, {} lines killed",
            self.points, self.chances, self.kills
        )
    }
}

/// Chooses a combo with the Greedy Points strategy.
///
/// This strategy runs the combo search and keeps the combo scoring the most
/// points. If several combos score the same maximum, the first one found wins.
///
/// # Arguments
/// * `board`: The current board. A scratch copy is searched; `board` is not touched.
/// * `hand`: The tiles available this turn.
///
/// # Returns
/// `Some(combo)` with the chosen combo, or `None` when the hand cannot play at all.
pub fn choose_combo_points(board: &Board, hand: &[Tile]) -> Option<Combo> {
    // PERFORMANCE: one scratch clone per call; search and scoring mutate and restore it.
    let mut scratch = board.clone();
    let combos = find_valid_combos(&mut scratch, hand);
    debug!(candidates = combos.len(), "points strategy searched hand");

    let mut best: Option<(Combo, u32)> = None;
    for combo in combos {
        let points = get_combo_points(&mut scratch, &combo);
        if best.as_ref().map_or(true, |(_, best_points)| points > *best_points) {
            best = Some((combo, points));
        }
    }

    best.map(|(combo, points)| {
        debug!(%combo, points, "points strategy chose combo");
        combo
    })
}

/// Chooses a combo with the multi-criteria Smart strategy.
///
/// This strategy runs the combo search and folds the candidates with
/// `ComboEvaluation::is_smarter_than`: fewest qwirkle chances caused first, then
/// most points, then fewest lines killed. The metrics of the held combo travel
/// with it, so each candidate is evaluated exactly once.
///
/// # Arguments
/// * `board`: The current board. A scratch copy is searched; `board` is not touched.
/// * `hand`: The tiles available this turn.
///
/// # Returns
/// `Some(combo)` with the chosen combo, or `None` when the hand cannot play at all.
pub fn choose_combo_smart(board: &Board, hand: &[Tile]) -> Option<Combo> {
    // PERFORMANCE: one scratch clone per call; search and scoring mutate and restore it.
    let mut scratch = board.clone();
    let combos = find_valid_combos(&mut scratch, hand);
    debug!(candidates = combos.len(), "smart strategy searched hand");

    let mut smartest: Option<(Combo, ComboEvaluation)> = None;
    for combo in combos {
        let evaluation = ComboEvaluation::evaluate(&mut scratch, &combo);
        let replace = smartest
            .as_ref()
            .map_or(true, |(_, held)| evaluation.is_smarter_than(held));
        if replace {
            smartest = Some((combo, evaluation));
        }
    }

    smartest.map(|(combo, evaluation)| {
        debug!(%combo, %evaluation, "smart strategy chose combo");
        combo
    })
}

/// The bot policies a player can use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Greedy by points (`choose_combo_points`).
    Points,
    /// Chances caused, then points, then lines killed (`choose_combo_smart`).
    Smart,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Points, Strategy::Smart];

    /// Picks this strategy's combo for `hand` on `board`, or `None` if nothing can be played.
    pub fn best_combo(&self, board: &Board, hand: &[Tile]) -> Option<Combo> {
        match self {
            Strategy::Points => choose_combo_points(board, hand),
            Strategy::Smart => choose_combo_smart(board, hand),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Points => "points",
            Strategy::Smart => "smart",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{is_valid_move_sequence, Color, Shape};
    use crate::utils::{board_from_str_array, hand_from_str};

    fn single_move(tile: &str, row: usize, col: usize) -> Combo {
        let mut combo = Combo::new();
        combo.add_move(tile.parse().unwrap(), Position::new(row, col));
        combo
    }

    fn five_reds() -> Board {
        board_from_str_array(&[
            ". .  .  .  .  .  . .",
            ". Rs Rc Rx Rd Rl . .",
            ". .  .  .  .  .  . .",
        ])
        .unwrap()
    }

    #[test]
    fn test_tile_line_points() {
        assert_eq!(get_tile_line_points(0), 0);
        assert_eq!(get_tile_line_points(1), 0);
        assert_eq!(get_tile_line_points(2), 2);
        assert_eq!(get_tile_line_points(5), 5);
        assert_eq!(get_tile_line_points(6), QWIRKLE_POINTS);
    }

    #[test]
    fn test_single_tile_on_empty_board_scores_zero() {
        let mut board = Board::new();
        let combo = single_move("Bs", 0, 0);
        assert_eq!(get_combo_points(&mut board, &combo), 0);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_qwirkle_scores_twelve() {
        let mut board = five_reds();
        let before = board.clone();
        let combo = single_move("R*", 1, 6);
        assert_eq!(get_combo_points(&mut board, &combo), 12);
        assert_eq!(board, before);
    }

    #[test]
    fn test_qwirkle_plus_cross_line() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .  .  .",
            ". Rs Rc Rx Rd Rl .  .",
            ". .  .  .  .  .  B* .",
            ". .  .  .  .  .  .  .",
        ])
        .unwrap();
        // R* completes the red row and joins B* below it.
        let combo = single_move("R*", 1, 6);
        assert_eq!(get_combo_points(&mut board, &combo), 12 + 2);
    }

    #[test]
    fn test_shared_line_counts_once() {
        let mut board = board_from_str_array(&[
            ". .  .",
            ". Bs .",
            ". .  .",
        ])
        .unwrap();
        let mut combo = Combo::new();
        combo.add_move("Bc".parse().unwrap(), Position::new(1, 2));
        // The grid grew on the right; the next cell is still column 3.
        combo.add_move("B*".parse().unwrap(), Position::new(1, 3));
        // One line of three, reached from both placed tiles.
        assert_eq!(get_combo_points(&mut board, &combo), 3);
    }

    #[test]
    fn test_equal_tile_values_in_distinct_lines_both_score() {
        let mut board = board_from_str_array(&[
            ". .  .  .",
            ". Bs .  .",
            ". .  .  .",
            ". .  .  .",
        ])
        .unwrap();
        let mut combo = Combo::new();
        combo.add_move("Bc".parse().unwrap(), Position::new(1, 2));
        combo.add_move("Bs".parse().unwrap(), Position::new(2, 2));
        // Row [Bs, Bc] and column [Bc, Bs] hold equal tiles but are different lines.
        assert_eq!(get_combo_points(&mut board, &combo), 4);
    }

    #[test]
    fn test_fifth_tile_causes_chance() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  . .",
            ". Rs Rc Rx Rd . .",
            ". .  .  .  .  . .",
        ])
        .unwrap();
        let combo = single_move("Rl", 1, 5);
        assert_eq!(get_qwirkle_chances_caused(&mut board, &combo), 1);
    }

    #[test]
    fn test_completed_qwirkle_cancels_chance() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  . .",
            ". Rs Rc Rx Rd . .",
            ". .  .  .  .  . .",
        ])
        .unwrap();
        let before = board.clone();
        let mut combo = Combo::new();
        combo.add_move("Rl".parse().unwrap(), Position::new(1, 5));
        combo.add_move("R*".parse().unwrap(), Position::new(1, 6));
        assert_eq!(get_qwirkle_chances_caused(&mut board, &combo), 0);
        assert_eq!(get_combo_points(&mut board, &combo), 12);
        assert_eq!(board, before);
    }

    #[test]
    fn test_sixth_tile_alone_causes_no_chance() {
        let mut board = five_reds();
        let combo = single_move("R*", 1, 6);
        assert_eq!(get_qwirkle_chances_caused(&mut board, &combo), 0);
    }

    #[test]
    fn test_line_killed_across_gap() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .  .",
            ". Bs .  .  .  Gd .",
            ". .  .  .  .  .  .",
        ])
        .unwrap();
        let before = board.clone();
        // Bc next to Bs leaves a two-cell gap to Gd: [Bs, Bc, Gd] cannot become a line.
        let combo = single_move("Bc", 1, 2);
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 1);
        assert_eq!(board, before);

        // [Rd, Bd, Gd] is still a valid diamond line, so nothing is killed.
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .  .",
            ". Rd .  .  .  Gd .",
            ". .  .  .  .  .  .",
        ])
        .unwrap();
        let combo = single_move("Bd", 1, 2);
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 0);
    }

    #[test]
    fn test_one_cell_gap_is_counted() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .",
            ". Bs .  .  Gd .",
            ". .  .  .  .  .",
        ])
        .unwrap();
        // [Bs, Bc, Gd] with one empty cell between Bc and Gd fits in four cells.
        let combo = single_move("Bc", 1, 2);
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 1);
    }

    #[test]
    fn test_tile_kills_in_several_directions() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .  .",
            ". .  .  Rl .  .  .",
            ". .  .  .  .  .  .",
            ". Gd .  .  .  Yx .",
            ". .  .  Bs .  .  .",
            ". .  .  .  .  .  .",
        ])
        .unwrap();
        // Bc rests on Bs; Gd to the left, Yx to the right and Rl above are all cut off.
        let combo = single_move("Bc", 3, 3);
        assert!(is_valid_move_sequence(&board, &combo));
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 3);
    }

    #[test]
    fn test_combo_tiles_facing_each_other_both_count() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .",
            ". .  .  .  .  .",
            ". Bs .  .  Gd .",
            ". .  .  .  .  .",
        ])
        .unwrap();
        let before = board.clone();
        let mut combo = Combo::new();
        combo.add_move("Bc".parse().unwrap(), Position::new(1, 1));
        combo.add_move("Rd".parse().unwrap(), Position::new(1, 4));
        assert!(is_valid_move_sequence(&board, &combo));

        // Bc looks right at Rd and Rd looks left at Bc: the one broken link is counted twice.
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 2);
        assert_eq!(board, before);
    }

    #[test]
    fn test_too_long_join_is_not_counted() {
        // Five tiles plus a three-cell gap cannot fit in one line.
        let mut board = board_from_str_array(&[
            ". .  .  .  .  .  .  .  .  .",
            ". Bs Bc .  .  .  .  Gd Gx .",
            ". .  .  .  .  .  .  .  .  .",
        ])
        .unwrap();
        let combo = single_move("B*", 1, 3);
        assert_eq!(get_possible_lines_killed(&mut board, &combo), 0);
    }

    #[test]
    fn test_smarter_than_ordering() {
        let held = ComboEvaluation {
            points: 5,
            chances: 1,
            kills: 1,
        };
        let fewer_chances = ComboEvaluation {
            points: 1,
            chances: 0,
            kills: 3,
        };
        let more_points = ComboEvaluation {
            points: 6,
            chances: 1,
            kills: 4,
        };
        let fewer_kills = ComboEvaluation {
            points: 5,
            chances: 1,
            kills: 0,
        };
        let more_chances = ComboEvaluation {
            points: 20,
            chances: 2,
            kills: 0,
        };
        let fewer_points = ComboEvaluation {
            points: 4,
            chances: 1,
            kills: 0,
        };
        assert!(fewer_chances.is_smarter_than(&held));
        assert!(more_points.is_smarter_than(&held));
        assert!(fewer_kills.is_smarter_than(&held));
        assert!(held.is_smarter_than(&held));
        assert!(!more_chances.is_smarter_than(&held));
        assert!(!fewer_points.is_smarter_than(&held));
    }

    #[test]
    fn test_strategies_on_empty_hand_return_none() {
        let board = five_reds();
        assert_eq!(choose_combo_points(&board, &[]), None);
        assert_eq!(choose_combo_smart(&board, &[]), None);
    }

    #[test]
    fn test_strategies_with_unplayable_hand_return_none() {
        let board = five_reds();
        // No star on the board and no red in hand: nothing fits anywhere.
        let hand = hand_from_str("B* G*").unwrap();
        for strategy in Strategy::ALL {
            assert_eq!(strategy.best_combo(&board, &hand), None);
        }
    }

    #[test]
    fn test_points_strategy_takes_the_qwirkle() {
        let board = five_reds();
        let hand = hand_from_str("Bs R* Gc").unwrap();
        let combo = choose_combo_points(&board, &hand).unwrap();
        assert_eq!(combo.tiles(), vec![Tile::new(Color::Red, Shape::Star)]);
        let mut scratch = board.clone();
        assert_eq!(get_combo_points(&mut scratch, &combo), 12);
    }

    #[test]
    fn test_smart_strategy_avoids_leaving_a_fifth_tile() {
        let board = board_from_str_array(&[
            ". .  .  .  .  . .",
            ". Rs Rc Rx Rd . .",
            ". .  .  .  .  . .",
        ])
        .unwrap();
        // Rl at a row end scores 5 but leaves a qwirkle open; above or below a red tile it scores 2.
        let hand = hand_from_str("Rl").unwrap();

        let greedy = choose_combo_points(&board, &hand).unwrap();
        let greedy_evaluation = ComboEvaluation::evaluate(&mut board.clone(), &greedy);
        assert_eq!(greedy_evaluation.points, 5);
        assert_eq!(greedy_evaluation.chances, 1);

        let smart = choose_combo_smart(&board, &hand).unwrap();
        let smart_evaluation = ComboEvaluation::evaluate(&mut board.clone(), &smart);
        assert_eq!(smart_evaluation.points, 2);
        assert_eq!(smart_evaluation.chances, 0);
    }

    #[test]
    fn test_strategies_leave_board_untouched() {
        let board = five_reds();
        let before = board.clone();
        let hand = hand_from_str("R* Bs Bc Rs").unwrap();
        for strategy in Strategy::ALL {
            assert!(strategy.best_combo(&board, &hand).is_some());
            assert_eq!(board, before);
        }
    }
}
