use std::convert::TryFrom;

use itertools::iproduct;
use tracing::{info, warn};

use crate::{Extras, Phase, SearchError, SearchResult, Trace};

/// The completed board
pub type SudokuResult = SearchResult<SudokuBoard, SudokuStep>;

/// A 9x9 Sudoku grid, `0` is an empty cell
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<Vec<u8>>", into = "[[u8; 9]; 9]")]
pub struct SudokuBoard([[u8; 9]; 9]);

impl SudokuBoard {
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SearchError> {
        let cells = super::square::<9>(rows, "a sudoku board")?;

        if let Some(&value) = cells.iter().flatten().find(|&&v| v > 9) {
            return Err(SearchError::MalformedBoard(format!(
                "sudoku cells must be between 0 and 9, found {value}"
            )));
        }

        Ok(Self(cells))
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row][col]
    }

    /// Whether `value` can go in `(row, col)` without repeating in its row, column or box
    pub fn is_valid(&self, row: usize, col: usize, value: u8) -> bool {
        let (box_row, box_col) = (3 * (row / 3), 3 * (col / 3));

        !self.0[row].contains(&value)
            && (0..9).all(|r| self.0[r][col] != value)
            && iproduct!(box_row..box_row + 3, box_col..box_col + 3)
                .all(|(r, c)| self.0[r][c] != value)
    }

    /// The first empty cell in row major order
    pub fn find_empty(&self) -> Option<(usize, usize)> {
        iproduct!(0..9, 0..9).find(|&(r, c)| self.0[r][c] == 0)
    }

    /// The first filled cell that repeats a value in its row, column or box
    pub fn first_conflict(&self) -> Option<(usize, usize)> {
        iproduct!(0..9, 0..9).find(|&(r, c)| {
            let value = self.0[r][c];
            if value == 0 {
                return false;
            }

            let mut without = *self;
            without.0[r][c] = 0;
            !without.is_valid(r, c, value)
        })
    }

    /// Every row, column and box holds 1 through 9
    pub fn is_complete(&self) -> bool {
        self.find_empty().is_none() && self.first_conflict().is_none()
    }
}

impl TryFrom<Vec<Vec<u8>>> for SudokuBoard {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<SudokuBoard> for [[u8; 9]; 9] {
    fn from(board: SudokuBoard) -> Self {
        board.0
    }
}

/// One step of the backtracking search
///
/// The solution step carries no cell, backtracking steps carry no value.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SudokuStep {
    pub board: SudokuBoard,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
}

struct Solver {
    board: SudokuBoard,
    trace: Trace<SudokuStep>,
}

impl Solver {
    fn record(&mut self, cell: Option<(usize, usize)>, value: Option<u8>, phase: Phase) {
        self.trace.record(
            SudokuStep {
                board: self.board,
                row: cell.map(|(r, _)| r),
                col: cell.map(|(_, c)| c),
                value,
            },
            phase,
        );
    }

    fn fill(&mut self) -> bool {
        let (row, col) = match self.board.find_empty() {
            Some(cell) => cell,
            None => {
                self.record(None, None, Phase::Solution);
                return true;
            }
        };

        for value in 1..=9 {
            self.record(Some((row, col)), Some(value), Phase::Trying);

            if self.board.is_valid(row, col, value) {
                self.board.0[row][col] = value;
                self.record(Some((row, col)), Some(value), Phase::Placing);

                if self.fill() {
                    return true;
                }

                self.board.0[row][col] = 0;
                self.record(Some((row, col)), None, Phase::Backtracking);
            }
        }

        false
    }
}

/// Fills the first empty cell with the first value that fits and backtracks on dead ends
///
/// A board whose givens already break the rules is reported unsolved without searching.
#[tracing::instrument(level = "debug", skip_all)]
pub fn solve(board: SudokuBoard) -> SudokuResult {
    if let Some((row, col)) = board.first_conflict() {
        warn!(row, col, "sudoku givens conflict");

        return SearchResult::from_trace(None, Trace::default()).with_extras(Extras {
            message: Some(format!(
                "The given {} at row {row}, column {col} conflicts with another given",
                board.get(row, col)
            )),
            ..Default::default()
        });
    }

    let mut solver = Solver {
        board,
        trace: Trace::default(),
    };
    let solved = solver.fill();

    info!(solved, steps = solver.trace.recorded(), "sudoku finished");

    SearchResult::from_trace(solved.then_some(solver.board), solver.trace)
}
