use crate::engine::{Board, Position, Tile};
use std::fmt;

/// One tile placement inside a combo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub tile: Tile,
    /// Cell in the frame of the board after every earlier move of the combo was played.
    pub position: Position,
}

/// One turn's ordered tile placements.
///
/// Positions are recorded as the search found them: each one is valid on the
/// board after the previous moves were played, padding shifts included. Replay a
/// combo with `engine::play_combo` rather than placing its moves independently.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Combo {
    moves: Vec<Move>,
}

impl Combo {
    /// Creates an empty combo.
    pub fn new() -> Self {
        Combo { moves: Vec::new() }
    }

    /// Appends a placement to the combo.
    ///
    /// # Arguments
    /// * `tile`: The hand tile being placed.
    /// * `position`: Its cell on the board as left by the combo's earlier moves.
    pub fn add_move(&mut self, tile: Tile, position: Position) {
        self.moves.push(Move { tile, position });
    }

    /// Removes the most recent placement, as the search does when it backtracks.
    ///
    /// # Returns
    /// The removed `Move`, or `None` if the combo was empty.
    pub fn discard_last_move(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// The placements in move order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The played tiles in move order.
    pub fn tiles(&self) -> Vec<Tile> {
        self.moves.iter().map(|mv| mv.tile).collect()
    }

    /// The recorded positions in move order.
    pub fn positions(&self) -> Vec<Position> {
        self.moves.iter().map(|mv| mv.position).collect()
    }

    /// Number of tiles the combo places.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl FromIterator<Move> for Combo {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        Combo {
            moves: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mv) in self.moves.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}{}", mv.tile, mv.position)?;
        }
        Ok(())
    }
}

/// Finds every combo `hand` can play on `board`.
///
/// Every legal combo is returned, not only the longest ones: a combo of two
/// tiles is listed next to each of its one-tile prefixes. Combos are produced in
/// depth-first order, trying hand tiles in hand order and frontier cells in the
/// order `Board::get_playable_positions` yields them.
///
/// The board is mutated during the search and restored after every placement,
/// so it is left exactly as it was passed in.
///
/// # Examples
/// ```
/// use qwirkle_bot::engine::{Board, Color, Position, Shape, Tile};
/// use qwirkle_bot::solver::find_valid_combos;
///
/// let mut board = Board::new();
/// let hand = [Tile::new(Color::Blue, Shape::Square)];
/// let combos = find_valid_combos(&mut board, &hand);
/// assert_eq!(combos.len(), 1);
/// assert_eq!(combos[0].positions(), vec![Position::new(0, 0)]);
/// assert_eq!(board, Board::new());
/// ```
pub fn find_valid_combos(board: &mut Board, hand: &[Tile]) -> Vec<Combo> {
    let mut combos = Vec::new();
    let mut combo = Combo::new();
    let remaining: Vec<usize> = (0..hand.len()).collect();
    find_combos_recursive(board, hand, &remaining, &mut combo, &mut combos);
    combos
}

fn find_combos_recursive(
    board: &mut Board,
    hand: &[Tile],
    remaining: &[usize],
    combo: &mut Combo,
    combos: &mut Vec<Combo>,
) {
    for (slot, &hand_index) in remaining.iter().enumerate() {
        let tile = hand[hand_index];
        let next_remaining: Vec<usize> = remaining
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != slot)
            .map(|(_, &index)| index)
            .collect();

        for position in board.get_playable_positions(combo) {
            if !board.is_valid_move(tile, position) {
                continue;
            }

            let state = board.get_state();
            board.play_tile(tile, position);
            combo.add_move(tile, position);
            combos.push(combo.clone());

            find_combos_recursive(board, hand, &next_remaining, combo, combos);

            // Backtrack
            board.restore_state(state);
            combo.discard_last_move();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{is_valid_move_sequence, play_combo, Color, Shape};
    use crate::utils::{board_from_str_array, hand_from_str};

    #[test]
    fn test_empty_hand_finds_nothing() {
        let mut board = Board::new();
        assert!(find_valid_combos(&mut board, &[]).is_empty());
    }

    #[test]
    fn test_single_tile_on_empty_board() {
        let mut board = Board::new();
        let hand = hand_from_str("Bs").unwrap();
        let combos = find_valid_combos(&mut board, &hand);
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].tiles(), hand);
        assert_eq!(combos[0].positions(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_two_tiles_on_empty_board() {
        let mut board = Board::new();
        let hand = hand_from_str("Bs Bc").unwrap();
        let combos = find_valid_combos(&mut board, &hand);

        // Bs alone, Bs then Bc on each of 4 sides, Bc alone, Bc then Bs on each of 4 sides.
        assert_eq!(combos.len(), 10);
        assert_eq!(combos.iter().filter(|c| c.len() == 1).count(), 2);
        assert_eq!(combos.iter().filter(|c| c.len() == 2).count(), 8);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_incompatible_tiles_never_combine() {
        let mut board = Board::new();
        let hand = hand_from_str("Bs Rc").unwrap();
        let combos = find_valid_combos(&mut board, &hand);
        assert_eq!(combos.len(), 2);
        assert!(combos.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_partial_combos_are_kept() {
        let mut board = board_from_str_array(&[
            ". .  .",
            ". Bs .",
            ". .  .",
        ])
        .unwrap();
        // Rx fits nowhere; Bc and B* both extend the blue square.
        let hand = hand_from_str("Bc Rx B*").unwrap();
        let combos = find_valid_combos(&mut board, &hand);

        assert!(!combos.is_empty());
        assert!(combos
            .iter()
            .all(|c| !c.tiles().contains(&Tile::new(Color::Red, Shape::Cross))));
        assert!(combos.iter().any(|c| c.len() == 1));
        assert!(combos.iter().any(|c| c.len() == 2));
        assert!(combos.iter().all(|c| c.len() <= 2));

        let singles: Vec<&Combo> = combos.iter().filter(|c| c.len() == 1).collect();
        // Each blue tile has four sides around Bs to go to.
        assert_eq!(singles.len(), 8);
    }

    #[test]
    fn test_combos_stay_on_one_line() {
        let mut board = board_from_str_array(&[
            ". .  .  .",
            ". Bs Bc .",
            ". .  .  .",
        ])
        .unwrap();
        let hand = hand_from_str("Rs Gs Ys").unwrap();
        let combos = find_valid_combos(&mut board, &hand);

        for combo in &combos {
            let mut replay = board.clone();
            play_combo(&mut replay, combo);
            let cells = replay.last_played_positions(combo.len());
            let same_row = cells.iter().all(|p| p.row == cells[0].row);
            let same_col = cells.iter().all(|p| p.col == cells[0].col);
            assert!(same_row || same_col, "combo {} leaves its line", combo);
        }
        assert!(combos.iter().any(|c| c.len() == 3));
    }

    #[test]
    fn test_every_combo_replays_legally() {
        let mut board = board_from_str_array(&[
            ". .  .  .  .",
            ". Rs Rc Rd .",
            ". Bs .  .  .",
            ". .  .  .  .",
        ])
        .unwrap();
        let before = board.clone();
        let hand = hand_from_str("Gs Rx Bc R* Ys Rl").unwrap();
        let combos = find_valid_combos(&mut board, &hand);

        assert_eq!(board, before);
        assert!(!combos.is_empty());
        for combo in &combos {
            assert!(
                is_valid_move_sequence(&board, combo),
                "combo {} fails replay",
                combo
            );
        }
    }

    #[test]
    fn test_combo_display() {
        let combo: Combo = [
            Move {
                tile: Tile::new(Color::Red, Shape::Square),
                position: Position::new(1, 2),
            },
            Move {
                tile: Tile::new(Color::Red, Shape::Star),
                position: Position::new(1, 3),
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(combo.to_string(), "Rs(1,2) -> R*(1,3)");
        assert_eq!(combo.len(), 2);
    }
}
