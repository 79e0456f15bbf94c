//! Pure rules: the move pipeline, tile spawning and terminal detection.
//!
//! Every direction is the left move conjugated by a grid symmetry: right is
//! left under row reversal, up and down are left/right under transposition.
//! The left move itself is compress, one merge sweep, compress again; the
//! merge sweep writes the doubled value into the left slot and zeroes the
//! right one, so a sweep can never cascade into a tile it just produced.

use log::warn;
use rand::Rng;

use super::state::{Board, Move, Tile, SIZE};

/// Applies `direction` to the board without spawning a tile.
pub fn shift(board: Board, direction: Move) -> Board {
    match direction {
        Move::Left => move_left(board),
        Move::Right => move_right(board),
        Move::Up => move_up(board),
        Move::Down => move_down(board),
    }
}

/// One full turn with thread-local RNG: shift, then spawn a tile only when
/// the shift changed the board.
///
/// For reproducible games, use [`Board::make_move`] with a seeded RNG.
pub fn make_move(board: Board, direction: Move) -> Board {
    let mut rng = rand::thread_rng();
    board.make_move(direction, &mut rng)
}

/// Fresh game: two tiles spawned on an empty board.
pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Board {
    Board::EMPTY.with_random_tile(rng).with_random_tile(rng)
}

/// Spawns one tile on a uniformly chosen empty cell: 2 with probability
/// 0.9, otherwise 4. A full board comes back unchanged.
pub fn spawn_random_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let empty: Vec<(usize, usize)> = (0..SIZE)
        .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
        .filter(|&(row, col)| board.0[row][col] == 0)
        .collect();
    if empty.is_empty() {
        warn!("tile spawn requested on a full board; leaving it unchanged");
        return board;
    }
    // Cell first, value second: a fixed draw order keeps seeded replays stable
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let mut cells = board.0;
    cells[row][col] = generate_random_tile(rng);
    Board(cells)
}

/// Inserts a random 2 (90%) or 4 (10%) tile using thread-local RNG.
///
/// For reproducible behavior, prefer [`Board::with_random_tile`].
pub fn insert_random_tile(board: Board) -> Board {
    let mut rng = rand::thread_rng();
    spawn_random_tile(board, &mut rng)
}

/// True when every cell is occupied and no two orthogonal neighbors are
/// equal. Checked structurally, without probing moves.
pub fn is_game_over(board: Board) -> bool {
    for row in 0..SIZE {
        for col in 0..SIZE {
            if board.0[row][col] == 0 {
                return false;
            }
            if col + 1 < SIZE && board.0[row][col] == board.0[row][col + 1] {
                return false;
            }
            if row + 1 < SIZE && board.0[row][col] == board.0[row + 1][col] {
                return false;
            }
        }
    }
    true
}

/// Which directions would change the board, indexed like [`Move::ALL`].
pub fn legal_moves(board: Board) -> [bool; 4] {
    let mut mask = [false; 4];
    for (allowed, &direction) in mask.iter_mut().zip(Move::ALL.iter()) {
        *allowed = shift(board, direction) != board;
    }
    mask
}

/// Number of empty cells.
pub fn count_empty(board: Board) -> usize {
    board.tiles().filter(|&tile| tile == 0).count()
}

/// Largest tile value on the board (0 when empty).
pub fn highest_tile(board: Board) -> Tile {
    board.tiles().max().unwrap_or(0)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 {
        2
    } else {
        4
    }
}

pub(crate) fn format_val(val: &Tile) -> String {
    match val {
        0 => "       ".to_string(),
        &x => {
            let mut s = x.to_string();
            while s.len() < 7 {
                s = match s.len() {
                    6 => format!(" {}", s),
                    _ => format!(" {} ", s),
                };
            }
            s
        }
    }
}

fn move_left(board: Board) -> Board {
    compress(merge_adjacent(compress(board)))
}

fn move_right(board: Board) -> Board {
    reverse_rows(move_left(reverse_rows(board)))
}

fn move_up(board: Board) -> Board {
    transpose(move_left(transpose(board)))
}

fn move_down(board: Board) -> Board {
    transpose(move_right(transpose(board)))
}

/// Slides every row's tiles to the left edge, preserving their order.
fn compress(board: Board) -> Board {
    let mut out = [[0; SIZE]; SIZE];
    for (r, row) in board.0.iter().enumerate() {
        let mut write = 0;
        for &tile in row {
            if tile != 0 {
                out[r][write] = tile;
                write += 1;
            }
        }
    }
    Board(out)
}

/// One merge sweep per row, left to right. The doubled value lands in the
/// left slot and the right slot becomes 0, which keeps the fresh tile from
/// merging again in the same sweep.
fn merge_adjacent(board: Board) -> Board {
    let mut cells = board.0;
    for row in cells.iter_mut() {
        for col in 0..SIZE - 1 {
            if row[col] != 0 && row[col] == row[col + 1] {
                row[col] *= 2;
                row[col + 1] = 0;
            }
        }
    }
    Board(cells)
}

fn transpose(board: Board) -> Board {
    let mut out = [[0; SIZE]; SIZE];
    for (r, row) in board.0.iter().enumerate() {
        for (c, &tile) in row.iter().enumerate() {
            out[c][r] = tile;
        }
    }
    Board(out)
}

fn reverse_rows(board: Board) -> Board {
    let mut cells = board.0;
    for row in cells.iter_mut() {
        row.reverse();
    }
    Board(cells)
}
