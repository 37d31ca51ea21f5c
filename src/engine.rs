//! Core game engine for Qwirkle.
//!
//! This module defines the game's fundamental components:
//! - `Color`, `Shape` and `Tile`: the 36 distinct tile faces.
//! - `Position`: a (row, column) cell coordinate.
//! - `Board`: the growable grid, the ordered list of played positions, padding,
//!   snapshot/restore through `BoardState`, and rendering.
//! - The legality rules: line extraction, `is_valid_line`, `Board::is_valid_move`
//!   and the line `Restriction` that keeps one turn's tiles on a single row or column.
use crate::solver::Combo;
use std::collections::HashSet;
use std::fmt;

/// Number of tiles a player holds after drawing.
pub const HAND_SIZE: usize = 6;

/// Longest line the rules allow. A line of exactly this length is a qwirkle.
pub const MAX_LINE_LENGTH: usize = 6;

/// One of the six tile colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Yellow,
    Green,
    Orange,
    Purple,
    Blue,
}

impl Color {
    /// Every color, in bag-filling order.
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Orange,
        Color::Purple,
        Color::Blue,
    ];

    /// Converts the color to its notation letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use qwirkle_bot::engine::Color;
    /// assert_eq!(Color::Orange.to_char(), 'O');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Yellow => 'Y',
            Color::Green => 'G',
            Color::Orange => 'O',
            Color::Purple => 'P',
            Color::Blue => 'B',
        }
    }

    /// Parses a notation letter back into a color.
    pub fn from_char(c: char) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.to_char() == c)
    }

    /// Returns the ANSI background color code used for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Color::Red => "41",
            Color::Yellow => "43",
            Color::Green => "42",
            Color::Orange => "48;5;208",
            Color::Purple => "45",
            Color::Blue => "44",
        }
    }
}

/// One of the six tile shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Square,
    Circle,
    Diamond,
    Clover,
    Cross,
    Star,
}

impl Shape {
    /// Every shape, in bag-filling order.
    pub const ALL: [Shape; 6] = [
        Shape::Square,
        Shape::Circle,
        Shape::Diamond,
        Shape::Clover,
        Shape::Cross,
        Shape::Star,
    ];

    /// Converts the shape to its notation letter.
    pub fn to_char(&self) -> char {
        match self {
            Shape::Square => 's',
            Shape::Circle => 'c',
            Shape::Diamond => 'd',
            Shape::Clover => 'l',
            Shape::Cross => 'x',
            Shape::Star => '*',
        }
    }

    /// Parses a notation letter back into a shape.
    pub fn from_char(c: char) -> Option<Shape> {
        Shape::ALL.into_iter().find(|shape| shape.to_char() == c)
    }

    /// Glyph drawn for the shape on the terminal board.
    pub fn to_glyph(&self) -> char {
        match self {
            Shape::Square => '■',
            Shape::Circle => '●',
            Shape::Diamond => '◆',
            Shape::Clover => '♣',
            Shape::Cross => '✚',
            Shape::Star => '★',
        }
    }
}

/// A Qwirkle tile: an immutable (color, shape) pair.
///
/// Tiles compare by value. The bag holds three physical copies of every face,
/// so the board tells copies apart by the cell they occupy, never by the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    pub color: Color,
    pub shape: Shape,
}

impl Tile {
    pub const fn new(color: Color, shape: Shape) -> Self {
        Tile { color, shape }
    }
}

impl fmt::Display for Tile {
    /// Formats the tile in text notation: color letter then shape letter, e.g. `Rs`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.to_char(), self.shape.to_char())
    }
}

/// A board cell coordinate. Row 0 is the top row, column 0 the leftmost column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The two line directions on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];
}

/// Raw grid storage: `None` is an empty cell.
pub type Grid = Vec<Vec<Option<Tile>>>;

/// Limits where the next tile of a partially built combo may go.
///
/// All tiles of one turn share a row or a column. The anchor is the cell of the
/// combo's first tile in the board's current coordinate frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restriction {
    /// Nothing placed yet this turn.
    None,
    /// One tile placed: the next may extend along either axis.
    SameRowOrCol(Position),
    SameRow(Position),
    SameCol(Position),
}

impl Restriction {
    /// Derives the restriction from the cells a combo has occupied so far, oldest first.
    pub fn from_combo_cells(cells: &[Position]) -> Restriction {
        match cells {
            [] => Restriction::None,
            [first] => Restriction::SameRowOrCol(*first),
            [first, second, ..] if first.row == second.row => Restriction::SameRow(*first),
            [first, ..] => Restriction::SameCol(*first),
        }
    }

    /// Whether `position` satisfies this restriction.
    pub fn allows(&self, position: Position) -> bool {
        match self {
            Restriction::None => true,
            Restriction::SameRowOrCol(anchor) => {
                position.row == anchor.row || position.col == anchor.col
            }
            Restriction::SameRow(anchor) => position.row == anchor.row,
            Restriction::SameCol(anchor) => position.col == anchor.col,
        }
    }
}

/// A value copy of everything a `Board` holds.
///
/// Produced by `Board::get_state` and consumed by `Board::restore_state`. The
/// copy owns its grid, so mutating the board afterwards (including growing it
/// through padding) never reaches back into a saved state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    grid: Grid,
    played_positions: Vec<Position>,
}

/// Represents the game board as a growable grid of optional `Tile`s.
///
/// The grid always keeps at least one empty row or column beyond the outermost
/// tile on every side, so every frontier cell lies inside the grid. A board
/// with nothing played is a 1×1 empty sentinel.
///
/// `played_positions` lists every occupied cell in play order and is shifted
/// together with the grid whenever padding is inserted at the top or left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    played_positions: Vec<Position>,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// Creates an empty board: a single empty cell at the origin.
    ///
    /// # Examples
    /// ```
    /// use qwirkle_bot::engine::{Board, Position};
    /// let board = Board::new();
    /// assert_eq!((board.rows(), board.cols()), (1, 1));
    /// assert_eq!(board.get_tile(0, 0), None);
    /// ```
    pub fn new() -> Self {
        Board {
            grid: vec![vec![None]],
            played_positions: Vec::new(),
        }
    }

    /// Creates a board from a pre-populated grid.
    ///
    /// Occupied cells are recorded as played in row-major order. Padding is
    /// applied afterwards, so a grid with tiles on its edge grows by one row or
    /// column on that side and its coordinates shift accordingly. A grid with no
    /// tiles yields the empty 1×1 board.
    ///
    /// # Panics
    /// Panics if the rows of `grid` have different lengths.
    pub fn from_grid(grid: Grid) -> Self {
        let width = grid.first().map_or(0, Vec::len);
        assert!(
            grid.iter().all(|row| row.len() == width),
            "board grid rows must all have the same length"
        );

        let played_positions = Self::get_played_positions(&grid);
        if played_positions.is_empty() {
            return Board::new();
        }

        let mut board = Board {
            grid,
            played_positions,
        };
        board.adjust_padding();
        board
    }

    /// Collects every occupied cell of `grid` in row-major order.
    fn get_played_positions(grid: &Grid) -> Vec<Position> {
        let mut played_positions = Vec::new();
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_some() {
                    played_positions.push(Position::new(r, c));
                }
            }
        }
        played_positions
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.grid[0].len()
    }

    /// Returns the tile at row `r`, column `c`, or `None` for an empty cell.
    ///
    /// # Panics
    /// Panics if `r` or `c` lie outside the grid.
    pub fn get_tile(&self, r: usize, c: usize) -> Option<Tile> {
        self.grid[r][c]
    }

    /// Like `get_tile`, but treats cells outside the grid as empty.
    pub fn tile_at(&self, position: Position) -> Option<Tile> {
        self.grid
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
            .flatten()
    }

    fn is_occupied(&self, position: Position) -> bool {
        self.tile_at(position).is_some()
    }

    /// Returns an immutable reference to the underlying grid.
    pub fn get_grid(&self) -> &Grid {
        &self.grid
    }

    /// All occupied cells in play order.
    pub fn played_positions(&self) -> &[Position] {
        &self.played_positions
    }

    /// The cells of the `count` most recently played tiles, oldest first, in the
    /// current coordinate frame.
    ///
    /// After committing a combo of `k` moves, `last_played_positions(k)` are the
    /// cells that combo now occupies.
    ///
    /// # Panics
    /// Panics if `count` exceeds the number of played tiles.
    pub fn last_played_positions(&self, count: usize) -> &[Position] {
        &self.played_positions[self.played_positions.len() - count..]
    }

    /// Whether no tile has been played.
    pub fn is_empty(&self) -> bool {
        self.played_positions.is_empty()
    }

    /// Places `tile` at `position`, records the play and restores the empty
    /// border.
    ///
    /// The move is not validated against the line rules; callers filter
    /// candidate cells through `is_valid_move` or `get_playable_positions` first.
    ///
    /// # Panics
    /// Panics if `position` is outside the grid or already occupied.
    pub fn play_tile(&mut self, tile: Tile, position: Position) {
        assert!(
            position.row < self.rows() && position.col < self.cols(),
            "cannot play {} at {}: outside the {}x{} grid",
            tile,
            position,
            self.rows(),
            self.cols()
        );
        assert!(
            self.grid[position.row][position.col].is_none(),
            "cannot play {} at {}: cell already occupied",
            tile,
            position
        );
        self.grid[position.row][position.col] = Some(tile);
        self.played_positions.push(position);
        self.adjust_padding();
    }

    /// Inserts an empty row or column on every side whose outermost row or
    /// column holds a tile.
    ///
    /// Top and left insertions shift every played position by one along that
    /// axis, in the same step as the grid grows.
    pub fn adjust_padding(&mut self) {
        let width = self.cols();
        if self.grid[0].iter().any(Option::is_some) {
            self.grid.insert(0, vec![None; width]);
            self.shift_played_positions(1, 0);
        }

        let bottom = self.rows() - 1;
        if self.grid[bottom].iter().any(Option::is_some) {
            self.grid.push(vec![None; width]);
        }

        if self.grid.iter().any(|row| row[0].is_some()) {
            for row in self.grid.iter_mut() {
                row.insert(0, None);
            }
            self.shift_played_positions(0, 1);
        }

        let last = self.cols() - 1;
        if self.grid.iter().any(|row| row[last].is_some()) {
            for row in self.grid.iter_mut() {
                row.push(None);
            }
        }
    }

    fn shift_played_positions(&mut self, row_offset: usize, col_offset: usize) {
        for position in self.played_positions.iter_mut() {
            position.row += row_offset;
            position.col += col_offset;
        }
    }

    /// Takes a value copy of the board, grid dimensions and play order included.
    pub fn get_state(&self) -> BoardState {
        BoardState {
            grid: self.grid.clone(),
            played_positions: self.played_positions.clone(),
        }
    }

    /// Restores the board to exactly the given snapshot.
    pub fn restore_state(&mut self, state: BoardState) {
        self.grid = state.grid;
        self.played_positions = state.played_positions;
    }

    /// Returns the frontier cells the next tile of `partial_combo` may go to.
    ///
    /// The frontier is every empty cell orthogonally adjacent to a played tile,
    /// listed once each in played-position order (left, right, up, down around
    /// each tile). It is then filtered by the `Restriction` the combo's moves so
    /// far impose. `partial_combo` must already be played on this board, so its
    /// cells are the most recently played ones. On an empty board the only
    /// playable cell is the origin.
    ///
    /// # Arguments
    /// * `partial_combo`: The moves already placed this turn.
    ///
    /// # Returns
    /// A `Vec<Position>` of candidate cells. Candidates still need
    /// `is_valid_move` for a concrete tile.
    pub fn get_playable_positions(&self, partial_combo: &Combo) -> Vec<Position> {
        if self.is_empty() {
            return vec![Position::new(0, 0)];
        }

        let restriction =
            Restriction::from_combo_cells(self.last_played_positions(partial_combo.len()));

        let mut seen = HashSet::new();
        let mut playable_positions = Vec::new();
        for &played in &self.played_positions {
            for candidate in self.get_adjacent_empty_positions(played) {
                if restriction.allows(candidate) && seen.insert(candidate) {
                    playable_positions.push(candidate);
                }
            }
        }
        playable_positions
    }

    /// Empty cells left, right, above and below `position`, in that order.
    fn get_adjacent_empty_positions(&self, position: Position) -> Vec<Position> {
        let Position { row, col } = position;
        let mut adjacent = Vec::with_capacity(4);
        if col > 0 {
            adjacent.push(Position::new(row, col - 1));
        }
        if col + 1 < self.cols() {
            adjacent.push(Position::new(row, col + 1));
        }
        if row > 0 {
            adjacent.push(Position::new(row - 1, col));
        }
        if row + 1 < self.rows() {
            adjacent.push(Position::new(row + 1, col));
        }
        adjacent.retain(|&p| !self.is_occupied(p));
        adjacent
    }

    fn has_adjacent_tile(&self, position: Position) -> bool {
        let Position { row, col } = position;
        (row > 0 && self.is_occupied(Position::new(row - 1, col)))
            || self.is_occupied(Position::new(row + 1, col))
            || (col > 0 && self.is_occupied(Position::new(row, col - 1)))
            || self.is_occupied(Position::new(row, col + 1))
    }

    /// Determines whether placing `tile` at `position` is legal right now.
    ///
    /// On the empty 1×1 board only the origin is legal. Otherwise the cell must
    /// be inside the grid, empty, touch at least one tile orthogonally, and the
    /// horizontal and vertical lines through it (with `tile` in place) must both
    /// satisfy `is_valid_line`.
    ///
    /// # Examples
    /// ```
    /// use qwirkle_bot::engine::{Board, Color, Position, Shape, Tile};
    /// let mut board = Board::new();
    /// let blue_square = Tile::new(Color::Blue, Shape::Square);
    /// assert!(board.is_valid_move(blue_square, Position::new(0, 0)));
    /// board.play_tile(blue_square, Position::new(0, 0));
    /// // The tile now sits at (1, 1) inside a padded 3x3 grid.
    /// assert!(!board.is_valid_move(blue_square, Position::new(1, 2)));
    /// assert!(board.is_valid_move(Tile::new(Color::Blue, Shape::Star), Position::new(1, 2)));
    /// ```
    pub fn is_valid_move(&self, tile: Tile, position: Position) -> bool {
        if self.rows() == 1 && self.cols() == 1 {
            return position == Position::new(0, 0);
        }

        if position.row >= self.rows() || position.col >= self.cols() {
            return false;
        }
        if self.is_occupied(position) {
            return false;
        }
        if !self.has_adjacent_tile(position) {
            return false;
        }

        Axis::ALL
            .into_iter()
            .all(|axis| is_valid_line(&self.get_adjacent_line(tile, position, axis)))
    }

    /// Returns the line of tiles `tile` would join if placed at `position`,
    /// `tile` included, in spatial order.
    ///
    /// Walks outward from `position` along `axis` while cells are occupied. The
    /// cell at `position` itself is not read, so `tile` need not be on the board.
    pub fn get_adjacent_line(&self, tile: Tile, position: Position, axis: Axis) -> Vec<Tile> {
        let (before, after) = self.line_extent(position, axis);
        let mut line: Vec<Tile> = before.iter().rev().filter_map(|&p| self.tile_at(p)).collect();
        line.push(tile);
        line.extend(after.iter().filter_map(|&p| self.tile_at(p)));
        line
    }

    /// Horizontal form of `get_adjacent_line`.
    pub fn get_adjacent_horizontal_line(&self, tile: Tile, position: Position) -> Vec<Tile> {
        self.get_adjacent_line(tile, position, Axis::Horizontal)
    }

    /// Vertical form of `get_adjacent_line`.
    pub fn get_adjacent_vertical_line(&self, tile: Tile, position: Position) -> Vec<Tile> {
        self.get_adjacent_line(tile, position, Axis::Vertical)
    }

    /// Returns the cells of the contiguous line through `position` along `axis`,
    /// `position` included, in spatial order.
    pub fn get_line_cells(&self, position: Position, axis: Axis) -> Vec<Position> {
        let (before, after) = self.line_extent(position, axis);
        let mut cells: Vec<Position> = before.into_iter().rev().collect();
        cells.push(position);
        cells.extend(after);
        cells
    }

    /// Occupied cells on each side of `position` along `axis`, nearest first.
    ///
    /// The first vector walks backwards (left or up), the second forwards. Each
    /// stops at the first empty cell or the grid edge.
    fn line_extent(&self, position: Position, axis: Axis) -> (Vec<Position>, Vec<Position>) {
        let step_back = |p: Position| match axis {
            Axis::Horizontal => p.col.checked_sub(1).map(|c| Position::new(p.row, c)),
            Axis::Vertical => p.row.checked_sub(1).map(|r| Position::new(r, p.col)),
        };
        let step_forward = |p: Position| match axis {
            Axis::Horizontal => Position::new(p.row, p.col + 1),
            Axis::Vertical => Position::new(p.row + 1, p.col),
        };

        let mut before = Vec::new();
        let mut cursor = step_back(position);
        while let Some(p) = cursor.filter(|&p| self.is_occupied(p)) {
            before.push(p);
            cursor = step_back(p);
        }

        let mut after = Vec::new();
        let mut cursor = step_forward(position);
        while self.is_occupied(cursor) {
            after.push(cursor);
            cursor = step_forward(cursor);
        }

        (before, after)
    }

    /// Generates a string representation of the board, marking the given cells.
    ///
    /// Row and column indices frame the grid. Tiles are drawn as their shape
    /// glyph over an ANSI background in their color; highlighted cells are
    /// wrapped in brackets.
    pub fn to_string_with_highlight(&self, highlight: &[Position]) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for c_idx in 0..self.cols() {
            output.push_str(&format!("{:<3}", c_idx));
        }
        output.push('\n');

        for (r_idx, row) in self.grid.iter().enumerate() {
            output.push_str(&format!("{:<3}", r_idx));
            for (c_idx, cell) in row.iter().enumerate() {
                let is_highlight = highlight.contains(&Position::new(r_idx, c_idx));
                let (open, close) = if is_highlight { ('[', ']') } else { (' ', ' ') };
                match cell {
                    Some(tile) => output.push_str(&format!(
                        "\x1b[1;{}m{}{}{}\x1b[m",
                        tile.color.to_ansi_color_code(),
                        open,
                        tile.shape.to_glyph(),
                        close
                    )),
                    None => output.push_str(&format!("{}.{}", open, close)),
                }
            }
            if r_idx < self.rows() - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    /// Formats the board for display using `to_string_with_highlight(&[])`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[]))
    }
}

/// Determines whether a line of tiles satisfies the Qwirkle line rule.
///
/// Lines of zero or one tile are valid. Otherwise the first two tiles decide the
/// shared aspect: color if they share a color, else shape if they share a shape;
/// sharing neither makes the line invalid. Every tile must then carry that
/// aspect's value and no tile value may appear twice.
///
/// # Examples
/// ```
/// use qwirkle_bot::engine::{is_valid_line, Color, Shape, Tile};
/// let red_square = Tile::new(Color::Red, Shape::Square);
/// let red_star = Tile::new(Color::Red, Shape::Star);
/// let blue_star = Tile::new(Color::Blue, Shape::Star);
/// assert!(is_valid_line(&[red_square, red_star]));
/// assert!(!is_valid_line(&[red_square, blue_star]));
/// assert!(!is_valid_line(&[red_star, red_star]));
/// ```
pub fn is_valid_line(line: &[Tile]) -> bool {
    if line.len() <= 1 {
        return true;
    }

    let (first, second) = (line[0], line[1]);
    let by_color = first.color == second.color;
    if !by_color && first.shape != second.shape {
        return false;
    }

    let mut seen_tiles = HashSet::with_capacity(line.len());
    line.iter().all(|tile| {
        let shares_aspect = if by_color {
            tile.color == first.color
        } else {
            tile.shape == first.shape
        };
        shares_aspect && seen_tiles.insert(*tile)
    })
}

/// Commits every move of `combo` to `board` in order, without snapshotting.
///
/// Each move's position is read in the frame left by the moves before it, which
/// is the frame combo search records positions in.
pub fn play_combo(board: &mut Board, combo: &Combo) {
    for mv in combo.moves() {
        board.play_tile(mv.tile, mv.position);
    }
}

/// Replays `combo` on a copy of `board`, checking every move with
/// `Board::is_valid_move` right before it is played.
pub fn is_valid_move_sequence(board: &Board, combo: &Combo) -> bool {
    let mut replay = board.clone();
    for mv in combo.moves() {
        if !replay.is_valid_move(mv.tile, mv.position) {
            return false;
        }
        replay.play_tile(mv.tile, mv.position);
    }
    true
}
