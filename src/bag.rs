//! The shuffled bag players draw tiles from.
use crate::engine::{Color, Shape, Tile, HAND_SIZE};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Copies of every color and shape combination in a full bag.
pub const COPIES_PER_TILE: usize = 3;

/// A bag of tiles with its own seeded random source.
///
/// Tiles are drawn from the end of the shuffled list, so a bag built from the
/// same seed always deals the same sequence.
#[derive(Clone, Debug)]
pub struct Bag {
    tiles: Vec<Tile>,
    rng: SmallRng,
}

impl Bag {
    /// Creates a full bag of 108 tiles shuffled with a fixed internal seed (`514514`).
    ///
    /// Calls to `new()` are deterministic and produce the same bag every time.
    pub fn new() -> Self {
        Self::new_with_seed(514514)
    }

    /// Creates a full bag of 108 tiles shuffled with the given seed.
    ///
    /// # Examples
    /// ```
    /// use qwirkle_bot::bag::Bag;
    /// let mut a = Bag::new_with_seed(7);
    /// let mut b = Bag::new_with_seed(7);
    /// assert_eq!(a.len(), 108);
    /// assert_eq!(a.draw(), b.draw());
    /// ```
    pub fn new_with_seed(seed: u64) -> Self {
        let mut tiles = Vec::with_capacity(COPIES_PER_TILE * Shape::ALL.len() * Color::ALL.len());
        for _ in 0..COPIES_PER_TILE {
            for shape in Shape::ALL {
                for color in Color::ALL {
                    tiles.push(Tile::new(color, shape));
                }
            }
        }
        let mut rng = SmallRng::seed_from_u64(seed);
        tiles.shuffle(&mut rng);
        Bag { tiles, rng }
    }

    /// Creates a bag holding exactly `tiles`, unshuffled. The last tile is drawn first.
    pub fn from_tiles(tiles: Vec<Tile>, seed: u64) -> Self {
        Bag {
            tiles,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Draws one tile, or `None` if the bag is empty.
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    /// Refills `hand` up to `HAND_SIZE` tiles while the bag has any left.
    ///
    /// # Returns
    /// The number of tiles drawn.
    pub fn draw_tiles(&mut self, hand: &mut Vec<Tile>) -> usize {
        let mut drawn = 0;
        while hand.len() < HAND_SIZE {
            match self.draw() {
                Some(tile) => {
                    hand.push(tile);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Puts the whole hand back, reshuffles and deals a fresh hand.
    ///
    /// Nothing happens when the bag is empty: a swap needs at least one tile to
    /// draw that is not the one just returned.
    ///
    /// # Returns
    /// `true` if the hand was exchanged.
    pub fn swap_all_tiles(&mut self, hand: &mut Vec<Tile>) -> bool {
        if self.is_empty() {
            return false;
        }
        self.tiles.append(hand);
        self.tiles.shuffle(&mut self.rng);
        self.draw_tiles(hand);
        true
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}
