use tracing::info;

use crate::{Extras, Phase, SearchError, SearchResult, Trace};

/// Every solution board, in the order they were found
pub type QueensResult = SearchResult<Vec<Vec<Vec<u8>>>, QueensStep>;

/// Largest board we'll search
pub const MAX_BOARD_SIZE: usize = 12;

/// Most trace entries kept, later steps are only counted in `nodes_explored`
pub const TRACE_LIMIT: usize = 100_000;

/// One step of the backtracking search
///
/// `queens` holds the column of the queen in each filled row, top row first. `col` is absent on
/// the step recording a complete solution.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct QueensStep {
    pub queens: Vec<usize>,
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
}

/// The `n`×`n` board with a `1` wherever `queens` puts one
pub fn board(n: usize, queens: &[usize]) -> Vec<Vec<u8>> {
    let mut board = vec![vec![0; n]; n];
    for (row, &col) in queens.iter().enumerate() {
        board[row][col] = 1;
    }
    board
}

struct Queens {
    n: usize,
    queens: Vec<usize>,
    find_all: bool,
    solutions: Vec<Vec<Vec<u8>>>,
    trace: Trace<QueensStep>,
}

impl Queens {
    fn record(&mut self, row: usize, col: Option<usize>, phase: Phase) {
        let queens = &self.queens;
        self.trace.record_with(phase, || QueensStep {
            queens: queens.clone(),
            row,
            col,
        });
    }

    /// Only the rows above `row` hold queens, so only the column and the two upward diagonals
    /// need checking
    fn is_safe(&self, row: usize, col: usize) -> bool {
        self.queens
            .iter()
            .enumerate()
            .all(|(r, &c)| c != col && row - r != col.abs_diff(c))
    }

    fn place(&mut self, row: usize) -> bool {
        if row >= self.n {
            self.solutions.push(board(self.n, &self.queens));
            self.record(row - 1, None, Phase::Solution);
            return true;
        }

        let mut found = false;
        for col in 0..self.n {
            self.record(row, Some(col), Phase::Trying);

            if self.is_safe(row, col) {
                self.queens.push(col);
                self.record(row, Some(col), Phase::Placing);

                if self.place(row + 1) {
                    found = true;
                    if !self.find_all {
                        return true;
                    }
                }

                self.queens.pop();
                self.record(row, Some(col), Phase::Backtracking);
            }
        }

        found
    }
}

/// Places `n` queens row by row, stopping at the first solution unless `find_all`
#[tracing::instrument(level = "debug", skip_all, fields(n = n, find_all = find_all))]
pub fn solve(n: usize, find_all: bool) -> Result<QueensResult, SearchError> {
    if !(1..=MAX_BOARD_SIZE).contains(&n) {
        return Err(SearchError::InvalidParameter(format!(
            "board_size must be between 1 and {MAX_BOARD_SIZE}, got {n}"
        )));
    }

    let mut queens = Queens {
        n,
        queens: Vec::with_capacity(n),
        find_all,
        solutions: vec![],
        trace: Trace::capped(TRACE_LIMIT),
    };
    queens.place(0);

    let solution_count = queens.solutions.len();
    info!(solution_count, steps = queens.trace.recorded(), "placed queens");

    let mut result = SearchResult::from_trace(Some(queens.solutions), queens.trace);
    result.found = solution_count > 0;
    Ok(result.with_extras(Extras {
        solution_count: Some(solution_count),
        board_size: Some(n),
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(board: &[Vec<u8>]) -> Vec<usize> {
        board
            .iter()
            .map(|row| row.iter().position(|&cell| cell == 1).unwrap())
            .collect()
    }

    #[test]
    fn test_eight_queens_first_solution() {
        let result = solve(8, false).unwrap();

        assert!(result.found);
        assert_eq!(result.extras.solution_count, Some(1));
        let solutions = result.artifact.unwrap();
        assert_eq!(columns(&solutions[0]), vec![0, 4, 7, 5, 2, 6, 1, 3]);
    }

    #[test]
    fn test_eight_queens_all_solutions() {
        let result = solve(8, true).unwrap();

        assert_eq!(result.extras.solution_count, Some(92));
        assert_eq!(result.extras.board_size, Some(8));
        assert_eq!(result.artifact.unwrap().len(), 92);
        assert_eq!(
            result
                .trace
                .iter()
                .filter(|e| e.phase == Phase::Solution)
                .count(),
            92
        );
        assert_eq!(result.nodes_explored, result.trace.len());
    }

    #[test]
    fn test_no_solution_for_small_boards() {
        for n in [2, 3] {
            let result = solve(n, true).unwrap();

            assert!(!result.found);
            assert_eq!(result.extras.solution_count, Some(0));
            assert_eq!(result.artifact, Some(vec![]));
        }

        assert_eq!(solve(1, false).unwrap().extras.solution_count, Some(1));
        assert_eq!(solve(6, true).unwrap().extras.solution_count, Some(4));
    }

    #[test]
    fn test_trace_shape() {
        let result = solve(4, false).unwrap();
        let phases: Vec<_> = result
            .trace
            .iter()
            .take(4)
            .map(|e| (e.phase, e.snapshot.row, e.snapshot.col))
            .collect();

        assert_eq!(
            phases,
            vec![
                (Phase::Trying, 0, Some(0)),
                (Phase::Placing, 0, Some(0)),
                (Phase::Trying, 1, Some(0)),
                (Phase::Trying, 1, Some(1)),
            ]
        );

        let last = result.trace.last().unwrap();
        assert_eq!(last.phase, Phase::Solution);
        assert_eq!(last.snapshot.row, 3);
        assert_eq!(last.snapshot.col, None);
        assert_eq!(last.snapshot.queens, vec![1, 3, 0, 2]);
        assert_eq!(board(4, &last.snapshot.queens), result.artifact.unwrap()[0]);
    }

    #[test]
    fn test_snapshots_follow_the_placed_queens() {
        let result = solve(4, false).unwrap();

        for entry in &result.trace {
            let step = &entry.snapshot;
            match entry.phase {
                Phase::Trying | Phase::Backtracking => assert_eq!(step.queens.len(), step.row),
                Phase::Placing => {
                    assert_eq!(step.queens.len(), step.row + 1);
                    assert_eq!(step.queens.last().copied(), step.col);
                }
                Phase::Solution => assert_eq!(step.queens.len(), 4),
                other => panic!("unexpected phase {other:?}"),
            }
        }

        let json = serde_json::to_value(&result.trace[1]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "snapshot": { "queens": [0], "row": 0, "col": 0 },
                "phase": "placing",
            })
        );
    }

    #[test]
    fn test_twelve_queens_all_solutions_keeps_the_trace_bounded() {
        let result = solve(MAX_BOARD_SIZE, true).unwrap();

        assert_eq!(result.extras.solution_count, Some(14200));
        assert_eq!(result.artifact.unwrap().len(), 14200);
        assert_eq!(result.trace.len(), TRACE_LIMIT);
        assert!(result.nodes_explored > TRACE_LIMIT);
    }

    #[test]
    fn test_board_size_limits() {
        assert!(matches!(solve(0, false), Err(SearchError::InvalidParameter(_))));
        assert!(matches!(solve(13, false), Err(SearchError::InvalidParameter(_))));
    }
}
