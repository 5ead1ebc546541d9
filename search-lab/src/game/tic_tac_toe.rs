use std::convert::TryFrom;

use itertools::iproduct;
use search_minimax::{GameRules, Minimax, MinimaxOptions};
use tracing::info;

use super::{Mark, Outcome, Piece};
use crate::{grid::Position, Extras, Phase, SearchError, SearchResult, Trace};

/// The chosen cell, with one evaluation per empty cell in the trace
pub type MoveResult = SearchResult<Position, MoveEvaluation>;
/// The final board, with one entry per move played in the trace
pub type GameResult = SearchResult<TicTacToeBoard, Ply>;

const WIN_SCORE: i64 = 10;

const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "Vec<Vec<Mark>>", into = "[[Mark; 3]; 3]")]
pub struct TicTacToeBoard([[Mark; 3]; 3]);

impl TicTacToeBoard {
    pub fn from_rows(rows: &[Vec<Mark>]) -> Result<Self, SearchError> {
        super::board_from_rows::<3, 3>(rows, "a tic-tac-toe board").map(Self)
    }

    pub fn get(&self, cell: Position) -> Mark {
        self.0[cell.row][cell.col]
    }

    /// A copy of this board with `piece` placed on `cell`
    pub fn with_move(&self, cell: Position, piece: Piece) -> Self {
        let mut next = *self;
        next.0[cell.row][cell.col] = piece.into();
        next
    }

    /// Empty cells in row major order
    pub fn empty_cells(&self) -> Vec<Position> {
        iproduct!(0..3, 0..3)
            .map(|(row, col)| Position::new(row, col))
            .filter(|&cell| self.get(cell).is_empty())
            .collect()
    }

    /// A completed line wins even on a full board
    pub fn winner(&self) -> Option<Outcome> {
        for line in LINES {
            let [a, b, c] = line.map(|(r, col)| self.0[r][col]);
            match a {
                Mark::X if a == b && b == c => return Some(Outcome::X),
                Mark::O if a == b && b == c => return Some(Outcome::O),
                _ => {}
            }
        }

        if self.0.iter().flatten().all(|m| !m.is_empty()) {
            return Some(Outcome::Draw);
        }

        None
    }
}

impl TryFrom<Vec<Vec<Mark>>> for TicTacToeBoard {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<Mark>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<TicTacToeBoard> for [[Mark; 3]; 3] {
    fn from(board: TicTacToeBoard) -> Self {
        board.0
    }
}

/// X maximizes, O minimizes
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeRules;

impl GameRules for TicTacToeRules {
    type Board = TicTacToeBoard;
    type Move = Position;

    fn legal_moves(&self, board: &TicTacToeBoard) -> Vec<Position> {
        board.empty_cells()
    }

    fn play(&self, board: &TicTacToeBoard, mv: Position, maximizing: bool) -> TicTacToeBoard {
        board.with_move(mv, if maximizing { Piece::X } else { Piece::O })
    }

    fn terminal_score(&self, board: &TicTacToeBoard, ply: i64) -> Option<i64> {
        board.winner().map(|outcome| match outcome {
            Outcome::X => WIN_SCORE - ply,
            Outcome::O => -WIN_SCORE + ply,
            Outcome::Draw => 0,
        })
    }
}

/// Tic-Tac-Toe is always searched to the end, so nothing is ever scored by heuristic
fn unscored(_: &TicTacToeBoard) -> i64 {
    0
}

/// The score minimax gave one candidate move
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvaluation {
    pub row: usize,
    pub col: usize,
    pub score: i64,
    /// The board after the candidate move
    pub board: TicTacToeBoard,
}

/// One move of a self played game
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Ply {
    pub player: Piece,
    #[serde(rename = "move")]
    pub mv: Position,
    pub board: TicTacToeBoard,
    pub score: i64,
    pub evaluations: Vec<MoveEvaluation>,
}

/// Tries every empty cell for `player` and scores the result with a full minimax search
///
/// The first cell with the best score for `player` wins ties. Alpha-Beta pruning only changes
/// `nodes_explored`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(player = %player, use_alpha_beta = use_alpha_beta, nodes = tracing::field::Empty)
)]
pub fn find_best_move(board: &TicTacToeBoard, player: Piece, use_alpha_beta: bool) -> MoveResult {
    let minimax = Minimax::new(
        TicTacToeRules,
        unscored,
        MinimaxOptions {
            alpha_beta: use_alpha_beta,
            max_depth: None,
        },
    );

    let mut trace = Trace::default();
    let mut nodes_explored = 0;
    let mut best: Option<(Position, i64)> = None;

    for cell in board.empty_cells() {
        let child = board.with_move(cell, player);
        let (score, stats) = minimax.score_position(&child, player == Piece::O);
        nodes_explored += stats.nodes;

        trace.record(
            MoveEvaluation {
                row: cell.row,
                col: cell.col,
                score,
                board: child,
            },
            Phase::Trying,
        );

        let improves = match best {
            None => true,
            Some((_, best_score)) if player == Piece::X => score > best_score,
            Some((_, best_score)) => score < best_score,
        };
        if improves {
            best = Some((cell, score));
        }
    }

    tracing::Span::current().record("nodes", &nodes_explored);

    SearchResult::from_trace(best.map(|(cell, _)| cell), trace)
        .with_nodes_explored(nodes_explored)
        .with_extras(Extras {
            score: best.map(|(_, score)| score),
            ..Default::default()
        })
}

/// Both sides play [find_best_move] from an empty board until the game is over
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(first_player = %first_player, use_alpha_beta = use_alpha_beta)
)]
pub fn play_game(first_player: Piece, use_alpha_beta: bool) -> GameResult {
    let mut board = TicTacToeBoard::default();
    let mut trace = Trace::default();
    let mut current = first_player;
    let mut moves = 0;
    let mut nodes_explored = 0;

    while moves < 9 && board.winner().is_none() {
        let result = find_best_move(&board, current, use_alpha_beta);
        nodes_explored += result.nodes_explored;

        let mv = match result.artifact {
            Some(mv) => mv,
            None => break,
        };
        board = board.with_move(mv, current);

        trace.record(
            Ply {
                player: current,
                mv,
                board,
                score: result.extras.score.unwrap_or_default(),
                evaluations: result.trace.into_iter().map(|e| e.snapshot).collect(),
            },
            Phase::Placing,
        );

        current = current.opponent();
        moves += 1;
    }

    let winner = board.winner();
    info!(?winner, moves, nodes_explored, "finished tic-tac-toe game");

    SearchResult::from_trace(Some(board), trace)
        .with_nodes_explored(nodes_explored)
        .with_extras(Extras {
            winner,
            moves: Some(moves),
            ..Default::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [&str; 3]) -> TicTacToeBoard {
        let rows: Vec<Vec<Mark>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| match c {
                        'X' => Mark::X,
                        'O' => Mark::O,
                        _ => Mark::Empty,
                    })
                    .collect()
            })
            .collect();

        TicTacToeBoard::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let result = find_best_move(&TicTacToeBoard::default(), Piece::X, true);

        assert_eq!(result.artifact, Some(Position::new(0, 0)));
        assert_eq!(result.extras.score, Some(0));
        assert_eq!(result.trace.len(), 9);
        assert!(result.trace.iter().all(|e| e.phase == Phase::Trying));
    }

    #[test]
    fn test_takes_the_win() {
        let result = find_best_move(&board(["XX.", "OO.", "..."]), Piece::X, false);

        assert_eq!(result.artifact, Some(Position::new(0, 2)));
        assert_eq!(result.extras.score, Some(10));
    }

    #[test]
    fn test_blocks_the_win() {
        let result = find_best_move(&board(["XX.", ".O.", "..."]), Piece::O, false);

        assert_eq!(result.artifact, Some(Position::new(0, 2)));
        assert_eq!(result.extras.score, Some(0));

        let scores: Vec<_> = result.trace.iter().map(|e| e.snapshot.score).collect();
        assert_eq!(scores, vec![0, 9, 9, 9, 9, 9]);
        assert_eq!(
            result.trace[0].snapshot.board,
            board(["XXO", ".O.", "..."])
        );
    }

    #[test]
    fn test_pruning_matches_plain_minimax() {
        let empty = TicTacToeBoard::default();
        let mut positions = vec![(empty, Piece::X)];
        for first in empty.empty_cells() {
            let one = empty.with_move(first, Piece::X);
            positions.push((one, Piece::O));
            for second in one.empty_cells() {
                positions.push((one.with_move(second, Piece::O), Piece::X));
            }
        }

        for (position, player) in positions {
            let plain = find_best_move(&position, player, false);
            let pruned = find_best_move(&position, player, true);

            assert_eq!(plain.artifact, pruned.artifact, "{position:?}");
            assert_eq!(plain.extras.score, pruned.extras.score, "{position:?}");
            assert!(pruned.nodes_explored <= plain.nodes_explored);
        }
    }

    #[test]
    fn test_finished_board_has_no_moves() {
        let full = board(["XOX", "XOO", "OXX"]);
        assert_eq!(full.winner(), Some(Outcome::Draw));

        let result = find_best_move(&full, Piece::X, true);
        assert!(!result.found);
        assert_eq!(result.extras.score, None);

        let won_on_last_move = board(["XOX", "OXO", "OXX"]);
        assert_eq!(won_on_last_move.winner(), Some(Outcome::X));
    }

    #[test]
    fn test_self_play_is_a_draw() {
        let result = play_game(Piece::X, true);

        assert!(result.found);
        assert_eq!(result.extras.winner, Some(Outcome::Draw));
        assert_eq!(result.extras.moves, Some(9));
        assert_eq!(result.trace.len(), 9);

        let played: Vec<_> = result
            .trace
            .iter()
            .map(|e| (e.snapshot.player, e.snapshot.mv))
            .collect();
        assert_eq!(
            played,
            vec![
                (Piece::X, Position::new(0, 0)),
                (Piece::O, Position::new(1, 1)),
                (Piece::X, Position::new(0, 1)),
                (Piece::O, Position::new(0, 2)),
                (Piece::X, Position::new(2, 0)),
                (Piece::O, Position::new(1, 0)),
                (Piece::X, Position::new(1, 2)),
                (Piece::O, Position::new(2, 1)),
                (Piece::X, Position::new(2, 2)),
            ]
        );
        assert_eq!(result.trace[0].snapshot.evaluations.len(), 9);
        assert_eq!(result.artifact, Some(board(["XXO", "OOX", "XOX"])));
    }

    #[test]
    fn test_ply_serializes_move_as_position() {
        let result = play_game(Piece::O, true);
        let json = serde_json::to_value(&result.trace[0]).unwrap();

        assert_eq!(json["phase"], "placing");
        assert_eq!(json["snapshot"]["player"], "O");
        assert_eq!(json["snapshot"]["move"], serde_json::json!([0, 0]));
        assert_eq!(json["snapshot"]["board"][0][0], "O");
        assert_eq!(json["snapshot"]["board"][0][1], "");
    }
}
