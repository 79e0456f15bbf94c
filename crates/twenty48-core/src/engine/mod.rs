//! Engine module: the value-grid board and the pure rules that drive it.
//!
//! - [`Board`] is the 4x4 grid of tile values with useful methods.
//! - Free functions mirror the methods where that reads better at call
//!   sites (e.g. `shift`, `is_game_over`).
//! - The move pipeline and the spawn/terminal rules live in a submodule to
//!   keep the surface tidy.

mod ops;
pub mod state;

pub use state::{Board, GameStatus, InvalidTileError, Move, ParseMoveError, SIZE};

pub use ops::{
    count_empty, highest_tile, insert_random_tile, is_game_over, legal_moves, make_move, new_game,
    shift, spawn_random_tile,
};
