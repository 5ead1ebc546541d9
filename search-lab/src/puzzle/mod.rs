//! Single player puzzles: sliding tiles, queens and Sudoku

pub mod eight_puzzle;
pub mod n_queens;
pub mod sudoku;

pub use eight_puzzle::{PuzzleBoard, PuzzleResult};
pub use n_queens::{QueensResult, QueensStep};
pub use sudoku::{SudokuBoard, SudokuResult, SudokuStep};

/// Checks that `rows` is a `N x N` grid and copies it into an array
fn square<const N: usize>(
    rows: &[Vec<u8>],
    what: &str,
) -> Result<[[u8; N]; N], crate::SearchError> {
    if rows.len() != N || rows.iter().any(|row| row.len() != N) {
        return Err(crate::SearchError::MalformedBoard(format!("{what} must be {N}x{N}")));
    }

    let mut cells = [[0; N]; N];
    for (target, row) in cells.iter_mut().zip(rows) {
        target.copy_from_slice(row);
    }

    Ok(cells)
}
