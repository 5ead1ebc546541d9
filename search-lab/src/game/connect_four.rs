use std::convert::TryFrom;

use itertools::iproduct;
use search_minimax::{GameRules, Minimax, MinimaxOptions};
use tracing::info;

use super::{Mark, Piece};
use crate::{Extras, Phase, SearchError, SearchResult, Trace};

/// The column to drop into, with the score of every root column in the trace
pub type ConnectFourResult = SearchResult<usize, ColumnEvaluation>;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const DEFAULT_DEPTH: usize = 4;
/// Deepest search a request may ask for, about 7^8 positions without pruning
pub const MAX_DEPTH: usize = 8;

/// Score of a won game, far above anything [ConnectFourBoard::evaluate_position] returns
pub const WIN_SCORE: i64 = 100_000_000;

const CENTER_COL: usize = COLS / 2;

/// Row 0 is the top of the board, pieces fall towards row 5
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "Vec<Vec<Mark>>", into = "[[Mark; COLS]; ROWS]")]
pub struct ConnectFourBoard([[Mark; COLS]; ROWS]);

impl ConnectFourBoard {
    pub fn from_rows(rows: &[Vec<Mark>]) -> Result<Self, SearchError> {
        super::board_from_rows::<ROWS, COLS>(rows, "a connect 4 board").map(Self)
    }

    pub fn get(&self, row: usize, col: usize) -> Mark {
        self.0[row][col]
    }

    /// Columns that still have room at the top
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.0[0][col].is_empty()).collect()
    }

    /// Drops `piece` into `col` and returns the row it landed on, or `None` if the column is full
    pub fn drop_piece(&mut self, col: usize, piece: Piece) -> Option<usize> {
        let row = (0..ROWS).rev().find(|&row| self.0[row][col].is_empty())?;
        self.0[row][col] = piece.into();
        Some(row)
    }

    fn with_piece(&self, col: usize, piece: Piece) -> Self {
        let mut next = *self;
        next.drop_piece(col, piece);
        next
    }

    /// Every run of four cells: horizontal, vertical, down-right and down-left
    fn windows(&self) -> impl Iterator<Item = [Mark; 4]> + '_ {
        let cells = &self.0;

        let horizontal = iproduct!(0..ROWS, 0..COLS - 3)
            .map(move |(r, c)| [0, 1, 2, 3].map(|i| cells[r][c + i]));
        let vertical = iproduct!(0..ROWS - 3, 0..COLS)
            .map(move |(r, c)| [0, 1, 2, 3].map(|i| cells[r + i][c]));
        let down_right = iproduct!(0..ROWS - 3, 0..COLS - 3)
            .map(move |(r, c)| [0, 1, 2, 3].map(|i| cells[r + i][c + i]));
        let down_left = iproduct!(0..ROWS - 3, 3..COLS)
            .map(move |(r, c)| [0, 1, 2, 3].map(|i| cells[r + i][c - i]));

        horizontal.chain(vertical).chain(down_right).chain(down_left)
    }

    pub fn is_winner(&self, piece: Piece) -> bool {
        let mark = Mark::from(piece);
        self.windows().any(|window| window.iter().all(|&m| m == mark))
    }

    /// Heuristic value of the board for `piece`
    ///
    /// Pieces in the centre column are worth 3 each, then every window of four adds
    /// 100 for four of ours, 5 for three of ours and a gap, 2 for two of ours and two gaps,
    /// and takes off 4 when the opponent has three and a gap.
    pub fn evaluate_position(&self, piece: Piece) -> i64 {
        let mark = Mark::from(piece);
        let center = (0..ROWS).filter(|&row| self.0[row][CENTER_COL] == mark).count() as i64;

        center * 3
            + self
                .windows()
                .map(|window| score_window(window, piece))
                .sum::<i64>()
    }
}

fn score_window(window: [Mark; 4], piece: Piece) -> i64 {
    let count = |mark: Mark| window.iter().filter(|&&m| m == mark).count();
    let own = count(piece.into());
    let opponent = count(piece.opponent().into());
    let empty = count(Mark::Empty);

    let mut score = match (own, empty) {
        (4, _) => 100,
        (3, 1) => 5,
        (2, 2) => 2,
        _ => 0,
    };
    if opponent == 3 && empty == 1 {
        score -= 4;
    }

    score
}

impl TryFrom<Vec<Vec<Mark>>> for ConnectFourBoard {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<Mark>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<ConnectFourBoard> for [[Mark; COLS]; ROWS] {
    fn from(board: ConnectFourBoard) -> Self {
        board.0
    }
}

/// `me` is always the maximizing side
#[derive(Debug, Clone, Copy)]
pub struct ConnectFourRules {
    pub me: Piece,
}

impl GameRules for ConnectFourRules {
    type Board = ConnectFourBoard;
    type Move = usize;

    fn legal_moves(&self, board: &ConnectFourBoard) -> Vec<usize> {
        board.valid_columns()
    }

    fn play(&self, board: &ConnectFourBoard, col: usize, maximizing: bool) -> ConnectFourBoard {
        let piece = if maximizing { self.me } else { self.me.opponent() };
        board.with_piece(col, piece)
    }

    fn terminal_score(&self, board: &ConnectFourBoard, _ply: i64) -> Option<i64> {
        if board.is_winner(self.me) {
            Some(WIN_SCORE)
        } else if board.is_winner(self.me.opponent()) {
            Some(-WIN_SCORE)
        } else if board.valid_columns().is_empty() {
            Some(0)
        } else {
            None
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEvaluation {
    pub column: usize,
    pub score: i64,
}

/// Searches `depth` plies ahead for `piece`, scoring unfinished positions with
/// [ConnectFourBoard::evaluate_position]
///
/// The leftmost of the best columns is chosen. With `use_alpha_beta` the scores of columns after
/// the chosen one may be bounds instead of exact values in the trace.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(piece = %piece, depth = depth, use_alpha_beta = use_alpha_beta)
)]
pub fn find_best_move(
    board: &ConnectFourBoard,
    piece: Piece,
    depth: usize,
    use_alpha_beta: bool,
) -> ConnectFourResult {
    let minimax = Minimax::new(
        ConnectFourRules { me: piece },
        move |b: &ConnectFourBoard| b.evaluate_position(piece),
        MinimaxOptions {
            alpha_beta: use_alpha_beta,
            max_depth: Some(depth),
        },
    );

    let result = minimax.best_move(board, true);

    let mut trace = Trace::default();
    for &(column, score) in result.options() {
        trace.record(ColumnEvaluation { column, score }, Phase::Trying);
    }

    let stats = result.stats();
    info!(
        column = ?result.best_move(),
        score = result.score(),
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        "searched connect 4"
    );

    SearchResult::from_trace(result.best_move(), trace)
        .with_nodes_explored(stats.nodes)
        .with_extras(Extras {
            score: Some(result.score()),
            depth: Some(depth),
            ..Default::default()
        })
}
