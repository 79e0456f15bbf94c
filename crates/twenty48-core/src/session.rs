//! Session layer: the little bit of mutable state around the pure engine.
//!
//! [`Game`] owns the current board plus a sticky game-over flag and applies
//! the per-input contract a frontend or driver wants: shift, spawn only on
//! change, then check for a stuck board.

use rand::Rng;

use crate::engine::{Board, GameStatus, Move};

/// One running game.
///
/// The game-over flag flips the first time a spawn leaves the board stuck
/// and stays set until [`Game::restart`]; moves arriving after that are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    board: Board,
    over: bool,
}

impl Game {
    /// Starts a game with two spawned tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Game {
            board: Board::new_game(rng),
            over: false,
        }
    }

    /// The current board.
    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    /// True once the game has been declared over.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.over
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        if self.over {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        }
    }

    /// Handles one directional input and reports whether it changed the
    /// board.
    ///
    /// An effective move is followed by a tile spawn and a terminal check;
    /// an ineffective move, or any move after the game is over, leaves the
    /// session untouched.
    pub fn apply_move<R: Rng + ?Sized>(&mut self, direction: Move, rng: &mut R) -> bool {
        if self.over {
            return false;
        }
        let shifted = self.board.shift(direction);
        if shifted == self.board {
            return false;
        }
        self.board = shifted.with_random_tile(rng);
        if self.board.is_game_over() {
            self.over = true;
        }
        true
    }

    /// Discards the current board and starts over with two fresh tiles.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board = Board::new_game(rng);
        self.over = false;
    }
}
