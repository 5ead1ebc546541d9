#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! This crate implements the minimax algorithm, with optional Alpha-Beta pruning, for two player
//! zero sum games. You describe the game with [GameRules] and provide a 'scoring' function for
//! positions where the search stops before the game is over.
//!
//! The search never mutates a position in place. Every child is produced by [GameRules::play]
//! as a fresh copy, so pruning can only ever change how much work is done, never the result.
//!
//! ```rust
//! use search_minimax::{GameRules, Minimax, MinimaxOptions};
//!
//! /// Take one or two stones, whoever takes the last stone wins
//! #[derive(Debug, Clone, Copy)]
//! struct TakeAway;
//!
//! impl GameRules for TakeAway {
//!     // Stones left, and whether the maximizing side is to move
//!     type Board = (u32, bool);
//!     type Move = u32;
//!
//!     fn legal_moves(&self, board: &Self::Board) -> Vec<u32> {
//!         (1..=2).filter(|take| *take <= board.0).collect()
//!     }
//!
//!     fn play(&self, board: &Self::Board, mv: u32, maximizing: bool) -> Self::Board {
//!         (board.0 - mv, !maximizing)
//!     }
//!
//!     fn terminal_score(&self, board: &Self::Board, _ply: i64) -> Option<i64> {
//!         match board {
//!             (0, true) => Some(-1),
//!             (0, false) => Some(1),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! fn no_heuristic(_: &(u32, bool)) -> i64 { 0 }
//!
//! let minimax = Minimax::new(TakeAway, no_heuristic, MinimaxOptions::default());
//! let result = minimax.best_move(&(4, true), true);
//!
//! assert_eq!(result.best_move(), Some(1));
//! assert_eq!(result.score(), 1);
//! ```

mod rules;
pub use rules::GameRules;

mod score;
pub use score::Scorable;

mod minimax_return;
pub use minimax_return::{MinMaxReturn, SearchStats};

mod eval;
pub use eval::{Minimax, MinimaxOptions};

/// The lowest possible score, used as the opening value for `alpha`
pub const WORST_SCORE: i64 = i64::MIN;

/// The highest possible score, used as the opening value for `beta`
pub const BEST_SCORE: i64 = i64::MAX;
