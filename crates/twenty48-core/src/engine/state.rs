//! Board state for the sliding-merge puzzle.
//!
//! The board is a plain 4x4 grid of tile values: 0 marks an empty cell and
//! every occupied cell holds a power of two >= 2. All operations take the
//! board by value and hand back a new one; `Board` is `Copy`, so this stays
//! cheap and keeps the move pipeline free of aliasing concerns.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops;

/// Board dimension: the grid is `SIZE` x `SIZE`.
pub const SIZE: usize = 4;

// Internal aliases for the value-grid representation
pub(crate) type Tile = u32;
pub(crate) type Cells = [[Tile; SIZE]; SIZE];

/// A move direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in the order reported by [`Board::legal_moves`].
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// Error returned when parsing a [`Move`] from a lowercase token fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown move '{0}' (expected one of: up, down, left, right)")]
pub struct ParseMoveError(String);

impl FromStr for Move {
    type Err = ParseMoveError;

    /// Parses the lowercase tokens `up`, `down`, `left` and `right`, the
    /// same spelling the serde representation uses.
    ///
    /// ```
    /// use twenty48_core::engine::Move;
    ///
    /// assert_eq!("left".parse::<Move>(), Ok(Move::Left));
    /// assert!("diagonal".parse::<Move>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// Whether a board can still accept an effective move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Over,
}

/// Error returned by [`Board::from_cells`] when a cell holds a value that
/// is neither empty (0) nor a power of two >= 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tile value {value} at row {row}, column {col} is not a power of two >= 2")]
pub struct InvalidTileError {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// 4x4 board of tile values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(pub(crate) Cells);

impl Board {
    /// The all-empty board.
    pub const EMPTY: Self = Board([[0; SIZE]; SIZE]);

    /// Builds a board from a raw grid, checking each cell.
    ///
    /// Grid shape and signedness are already pinned down by the argument
    /// type; the only thing left to validate is that every occupied cell is
    /// a power of two >= 2.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    ///
    /// assert!(Board::from_cells([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
    /// assert!(Board::from_cells([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    /// ```
    pub fn from_cells(cells: [[Tile; SIZE]; SIZE]) -> Result<Self, InvalidTileError> {
        for (row, line) in cells.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(InvalidTileError { row, col, value });
                }
            }
        }
        Ok(Board(cells))
    }

    /// Returns the underlying grid, row-major.
    #[inline]
    pub fn cells(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// Returns the value at `(row, col)`. Panics when either index is
    /// outside `0..SIZE`.
    #[inline]
    pub fn get(self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Applies a move without spawning a tile.
    ///
    /// Tiles slide as far as they go, equal neighbors merge once per sweep,
    /// and the result is returned; pass the result to [`Board::with_random_tile`]
    /// (or use [`Board::make_move`]) to finish a turn.
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Move};
    ///
    /// let b = Board::from_cells([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert_eq!(b.shift(Move::Left).get(0, 0), 4);
    /// ```
    #[inline]
    pub fn shift(self, direction: Move) -> Self {
        ops::shift(self, direction)
    }

    /// Spawns a tile (2 with probability 0.9, else 4) on a uniformly chosen
    /// empty cell, drawing from the given RNG. A full board comes back
    /// unchanged.
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use twenty48_core::engine::Board;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::spawn_random_tile(self, rng)
    }

    /// Same as [`Board::with_random_tile`], drawing from thread-local RNG.
    #[inline]
    pub fn with_random_tile_thread(self) -> Self {
        ops::insert_random_tile(self)
    }

    /// Plays one full turn: shift, then spawn a tile only when the shift
    /// changed the board. An ineffective move hands the board back as-is.
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use twenty48_core::engine::{Board, Move};
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let b0 = Board::new_game(&mut rng);
    /// let _b1 = b0.make_move(Move::Left, &mut rng);
    /// ```
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let shifted = self.shift(direction);
        if shifted != self {
            shifted.with_random_tile(rng)
        } else {
            self
        }
    }

    /// Starts a fresh game: an empty board with two spawned tiles.
    ///
    /// ```
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use twenty48_core::engine::Board;
    ///
    /// let mut rng = StdRng::seed_from_u64(123);
    /// assert_eq!(Board::new_game(&mut rng).count_empty(), 14);
    /// ```
    #[inline]
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ops::new_game(rng)
    }

    /// Number of empty cells.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Largest tile value on the board (0 when the board is empty).
    #[inline]
    pub fn highest_tile(self) -> Tile {
        ops::highest_tile(self)
    }

    /// True when no move can change the board: every cell is occupied and
    /// no two orthogonal neighbors are equal. An empty board is therefore
    /// not game over.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    ///
    /// assert!(!Board::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(self) -> bool {
        ops::is_game_over(self)
    }

    /// [`Board::is_game_over`] folded into a two-state enum.
    #[inline]
    pub fn status(self) -> GameStatus {
        if self.is_game_over() {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        }
    }

    /// Which directions would change the board, indexed like [`Move::ALL`].
    #[inline]
    pub fn legal_moves(self) -> [bool; 4] {
        ops::legal_moves(self)
    }

    /// Iterates over tile values in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter {
            cells: self.0,
            idx: 0,
        }
    }
}

/// Row-major iterator over the 16 tile values of a board.
pub struct TilesIter {
    cells: Cells,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Tile;

    #[inline]
    fn next(&mut self) -> Option<Tile> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let tile = self.cells[self.idx / SIZE][self.idx % SIZE];
        self.idx += 1;
        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = SIZE * SIZE - self.idx;
        (left, Some(left))
    }
}

impl ExactSizeIterator for TilesIter {}

impl IntoIterator for Board {
    type Item = Tile;
    type IntoIter = TilesIter;

    fn into_iter(self) -> TilesIter {
        self.tiles()
    }
}

impl IntoIterator for &Board {
    type Item = Tile;
    type IntoIter = TilesIter;

    fn into_iter(self) -> TilesIter {
        self.tiles()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "--------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(ops::format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn it_parses_all_lowercase_move_tokens() {
        assert_eq!("up".parse::<Move>(), Ok(Move::Up));
        assert_eq!("down".parse::<Move>(), Ok(Move::Down));
        assert_eq!("left".parse::<Move>(), Ok(Move::Left));
        assert_eq!("right".parse::<Move>(), Ok(Move::Right));

        let err = "Left".parse::<Move>().unwrap_err();
        assert!(err.to_string().contains("'Left'"));
    }

    #[test]
    fn it_serializes_moves_as_lowercase_tokens() {
        assert_eq!(serde_json::to_string(&Move::Up).unwrap(), "\"up\"");
        assert_eq!(
            serde_json::from_str::<Move>("\"right\"").unwrap(),
            Move::Right
        );
    }

    #[test]
    fn it_accepts_valid_grids() {
        let b = Board::from_cells([
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [512, 1024, 2048, 4096],
            [0, 0, 0, 2],
        ])
        .unwrap();
        assert_eq!(b.get(2, 2), 2048);
        assert_eq!(b.count_empty(), 3);
    }

    #[test]
    fn it_rejects_cells_that_are_not_powers_of_two() {
        let err = Board::from_cells([[0, 0, 3, 0], [0; 4], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(
            err,
            InvalidTileError {
                row: 0,
                col: 2,
                value: 3
            }
        );
        // 1 is a power of two but below the smallest legal tile
        assert!(Board::from_cells([[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).is_err());
    }

    #[test]
    fn it_iterates_tiles_in_row_major_order() {
        let b = Board::from_cells([
            [2, 4, 8, 16],
            [32, 64, 128, 256],
            [0, 0, 0, 0],
            [2, 0, 0, 4],
        ])
        .unwrap();
        let tiles: Vec<u32> = b.tiles().collect();
        assert_eq!(
            tiles,
            vec![2, 4, 8, 16, 32, 64, 128, 256, 0, 0, 0, 0, 2, 0, 0, 4]
        );
        assert_eq!(b.tiles().len(), 16);
        assert_eq!((&b).into_iter().sum::<u32>(), 516);
    }

    #[test]
    fn it_defaults_to_the_empty_board() {
        assert_eq!(Board::default(), Board::EMPTY);
        assert_eq!(Board::EMPTY.count_empty(), 16);
        assert_eq!(Board::EMPTY.highest_tile(), 0);
    }

    #[test]
    fn it_reports_status_from_the_structure_of_the_grid() {
        assert_eq!(Board::EMPTY.status(), GameStatus::InProgress);

        let stuck = Board::from_cells([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
        .unwrap();
        assert_eq!(stuck.status(), GameStatus::Over);
    }

    #[test]
    fn it_displays_centered_tile_values() {
        let b = Board::from_cells([[2, 0, 0, 16], [0; 4], [0; 4], [0; 4]]).unwrap();
        let shown = format!("{}", b);
        assert!(shown.contains("   2   "));
        assert!(shown.contains("   16  "));
        assert!(shown.contains("--------------------------------"));
    }

    #[test]
    fn it_debug_prints_the_raw_grid() {
        let b = Board::from_cells([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        assert_eq!(
            format!("{:?}", b),
            "Board([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]])"
        );
    }

    #[test]
    fn it_starts_new_games_with_two_small_tiles() {
        let mut rng = StdRng::seed_from_u64(99);
        let b = Board::new_game(&mut rng);
        assert_eq!(b.count_empty(), 14);
        assert!(b.tiles().all(|t| t == 0 || t == 2 || t == 4));
        assert!(!b.is_game_over());
    }

    #[test]
    fn it_replays_identically_from_the_same_seed() {
        let mut a = StdRng::seed_from_u64(2048);
        let mut b = StdRng::seed_from_u64(2048);
        let mut x = Board::new_game(&mut a);
        let mut y = Board::new_game(&mut b);
        for direction in [Move::Left, Move::Up, Move::Right, Move::Down, Move::Left] {
            x = x.make_move(direction, &mut a);
            y = y.make_move(direction, &mut b);
        }
        assert_eq!(x, y);
    }
}
