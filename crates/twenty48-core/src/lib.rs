//! twenty48-core: rules engine for the 4x4 sliding-tile merge puzzle.
//!
//! This crate provides:
//! - A value-grid [`engine::Board`] type with ergonomic methods (`shift`,
//!   `make_move`, `with_random_tile`, `is_game_over`, ...)
//! - The pure move pipeline behind them (compress, merge once, compress
//!   again), with the three remaining directions derived from the left move
//!   by row reversal and transposition
//! - A small [`session::Game`] wrapper holding the one piece of state a
//!   frontend needs: the current board and a sticky game-over flag
//!
//! Quick start:
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use twenty48_core::engine::{Board, Move};
//!
//! // Deterministic setup with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut b = Board::new_game(&mut rng);
//! assert_eq!(b.count_empty(), 14);
//!
//! // A tile spawns after every move that changed the board, and never
//! // after one that did not
//! let mut moves = 0;
//! while !b.is_game_over() && moves < 4 {
//!     b = b.make_move(Move::Left, &mut rng);
//!     moves += 1;
//! }
//! ```
//!
//! Note: free functions mirroring the `Board` methods live in [`engine`]
//! (e.g. `engine::shift`, `engine::make_move`). The free `make_move` and
//! `insert_random_tile` draw from thread-local RNG; prefer the methods when
//! you need reproducibility.

pub mod engine;
pub mod session;
