//! State space search and game tree engines that record every state they look at.
//!
//! Each engine takes a typed problem, runs synchronously, and hands back a [SearchResult] holding
//! the answer (if there is one) alongside an ordered [Trace] a caller can replay step by step.
//!
//! * [grid::GridSearchEngine] for pathfinding on 4-connected grids
//! * [puzzle] for the 8-puzzle, N-Queens and Sudoku
//! * [game] for Tic-Tac-Toe and Connect-4, built on `search-minimax`
//! * [hanoi] for the Tower of Hanoi

#[macro_use]
extern crate serde_derive;

pub mod error;
pub mod game;
pub mod grid;
pub mod hanoi;
pub mod puzzle;
pub mod request;
pub mod trace;

pub use error::SearchError;
pub use trace::{Extras, Phase, SearchResult, Trace, TraceEntry};
