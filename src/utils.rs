use crate::engine::{Board, Color, Grid, Shape, Tile, HAND_SIZE};
use crate::error::ParseError;
use std::str::FromStr;

/// Parses a two-character tile token: a color letter followed by a shape symbol.
///
/// Colors are `R`, `Y`, `G`, `O`, `P` and `B`; shapes are `s` (square),
/// `c` (circle), `d` (diamond), `l` (clover), `x` (cross) and `*` (star).
///
/// # Examples
/// ```
/// use qwirkle_bot::engine::{Color, Shape, Tile};
///
/// let tile: Tile = "O*".parse().unwrap();
/// assert_eq!(tile, Tile::new(Color::Orange, Shape::Star));
/// assert!("Zs".parse::<Tile>().is_err());
/// ```
impl FromStr for Tile {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut chars = token.chars();
        let (color_char, shape_char) = match (chars.next(), chars.next(), chars.next()) {
            (Some(color_char), Some(shape_char), None) => (color_char, shape_char),
            _ => return Err(ParseError::MalformedToken(token.to_string())),
        };

        let color = Color::from_char(color_char).ok_or_else(|| ParseError::UnknownColor {
            token: token.to_string(),
            found: color_char,
        })?;
        let shape = Shape::from_char(shape_char).ok_or_else(|| ParseError::UnknownShape {
            token: token.to_string(),
            found: shape_char,
        })?;
        Ok(Tile::new(color, shape))
    }
}

/// Parses an array of string slices into a `Board`.
///
/// Each string slice is one row, starting from row 0. Cells are separated by
/// whitespace; a cell is either a tile token (see `Tile::from_str`) or `.` for
/// an empty cell. Every row must hold the same number of cells.
///
/// The grid is handed to `Board::from_grid`, so tiles are recorded as played in
/// row-major order and a tile on the edge of the text grows the board by one
/// empty row or column on that side.
///
/// # Arguments
/// * `s`: The rows of the board, top to bottom.
///
/// # Returns
/// * `Ok(Board)` if parsing is successful. No rows, or rows holding no tiles,
///   give the empty board.
/// * `Err(ParseError)` if a token is not a tile or `.`, or if the rows differ in length.
///
/// # Examples
/// ```
/// use qwirkle_bot::engine::{Color, Position, Shape, Tile};
/// use qwirkle_bot::utils::board_from_str_array;
///
/// let board = board_from_str_array(&[
///     ". .  .",
///     ". Rs Rc",
///     ". .  .",
/// ])
/// .unwrap();
/// // Rc sits on the right edge, so a padding column is added.
/// assert_eq!((board.rows(), board.cols()), (3, 4));
/// assert_eq!(board.get_tile(1, 2), Some(Tile::new(Color::Red, Shape::Circle)));
/// assert_eq!(board.played_positions(), &[Position::new(1, 1), Position::new(1, 2)]);
///
/// assert!(board_from_str_array(&["Rs Rc", "."]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    let mut grid: Grid = Vec::with_capacity(s.len());

    for (r, row_str) in s.iter().enumerate() {
        let row = row_str
            .split_whitespace()
            .map(|token| match token {
                "." => Ok(None),
                _ => token.parse::<Tile>().map(Some),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(first) = grid.first() {
            if row.len() != first.len() {
                return Err(ParseError::RaggedRow {
                    row: r,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        grid.push(row);
    }

    if grid.iter().all(|row| row.is_empty()) {
        return Ok(Board::new());
    }
    Ok(Board::from_grid(grid))
}

/// Parses a whitespace separated list of tile tokens into a hand.
///
/// # Returns
/// * `Ok(Vec<Tile>)` in the order given. An empty string gives an empty hand.
/// * `Err(ParseError)` if a token is not a tile or more than `HAND_SIZE` tiles are listed.
///
/// # Examples
/// ```
/// use qwirkle_bot::utils::hand_from_str;
///
/// let hand = hand_from_str("Rs Bc G*").unwrap();
/// assert_eq!(hand.len(), 3);
/// assert!(hand_from_str("Rs Rs Rs Rs Rs Rs Rs").is_err());
/// ```
pub fn hand_from_str(s: &str) -> Result<Vec<Tile>, ParseError> {
    let hand = s
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<Vec<Tile>, _>>()?;

    if hand.len() > HAND_SIZE {
        return Err(ParseError::HandTooLarge {
            found: hand.len(),
            max: HAND_SIZE,
        });
    }
    Ok(hand)
}
