//! JSON requests, and the untagged responses they produce
//!
//! Each request names what to run by string so unknown names come back as a [SearchError]
//! instead of a generic deserialization failure.

use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    game::{
        connect_four::{self, ConnectFourBoard, ConnectFourResult},
        tic_tac_toe::{self, GameResult, MoveResult, TicTacToeBoard},
        Mark, Piece,
    },
    grid::{Grid, GridProblem, GridResult, GridSearchEngine, Heuristic, Position},
    hanoi::{self, HanoiResult},
    puzzle::{
        eight_puzzle, n_queens, sudoku, PuzzleBoard, PuzzleResult, QueensResult, SudokuBoard,
        SudokuResult,
    },
    SearchError,
};

pub fn parse<T: DeserializeOwned>(json: &str) -> Result<T, SearchError> {
    Ok(serde_json::from_str(json)?)
}

fn missing(field: &str) -> SearchError {
    SearchError::InvalidParameter(format!("{field} is required"))
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub algorithm: String,
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
    #[serde(default)]
    pub heuristic: Heuristic,
}

impl GridRequest {
    pub fn problem(&self) -> Result<GridProblem, SearchError> {
        GridProblem::new(self.grid.clone(), self.start, self.goal, self.heuristic)
    }

    pub fn run<R: Rng + ?Sized>(
        &self,
        engine: &GridSearchEngine,
        rng: &mut R,
    ) -> Result<GridResult, SearchError> {
        engine.run(&self.algorithm, &self.problem()?, rng)
    }
}

fn default_board_size() -> usize {
    8
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PuzzleRequest {
    pub puzzle_type: String,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub initial_state: Option<PuzzleBoard>,
    #[serde(default = "default_board_size")]
    pub board_size: usize,
    #[serde(default)]
    pub board: Option<SudokuBoard>,
    #[serde(default)]
    pub find_all: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PuzzleResponse {
    EightPuzzle(PuzzleResult),
    Queens(QueensResult),
    Sudoku(SudokuResult),
}

impl PuzzleRequest {
    pub fn solve(&self) -> Result<PuzzleResponse, SearchError> {
        debug!(puzzle_type = %self.puzzle_type, algorithm = ?self.algorithm, "solving puzzle");

        match self.puzzle_type.as_str() {
            "8-puzzle" => {
                let initial = self.initial_state.ok_or_else(|| missing("initial_state"))?;

                match self.algorithm.as_deref().unwrap_or("astar") {
                    "astar" => Ok(PuzzleResponse::EightPuzzle(eight_puzzle::solve_astar(initial))),
                    "bfs" => Ok(PuzzleResponse::EightPuzzle(eight_puzzle::solve_bfs(initial))),
                    other => Err(self.unsupported(other)),
                }
            }
            "n-queens" => {
                self.require_backtracking()?;
                Ok(PuzzleResponse::Queens(n_queens::solve(self.board_size, self.find_all)?))
            }
            "sudoku" => {
                self.require_backtracking()?;
                let board = self.board.ok_or_else(|| missing("board"))?;
                Ok(PuzzleResponse::Sudoku(sudoku::solve(board)))
            }
            other => Err(SearchError::UnknownRequest(format!("puzzle_type {other:?}"))),
        }
    }

    fn require_backtracking(&self) -> Result<(), SearchError> {
        match self.algorithm.as_deref() {
            None | Some("backtracking") => Ok(()),
            Some(other) => Err(self.unsupported(other)),
        }
    }

    fn unsupported(&self, algorithm: &str) -> SearchError {
        SearchError::UnsupportedAlgorithm {
            puzzle: self.puzzle_type.clone(),
            algorithm: algorithm.to_owned(),
        }
    }
}

fn default_piece() -> Piece {
    Piece::X
}

fn default_depth() -> usize {
    connect_four::DEFAULT_DEPTH
}

fn default_n_disks() -> u32 {
    3
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GameRequest {
    pub game_type: String,
    #[serde(default)]
    pub action: Option<String>,
    /// An empty board when absent
    #[serde(default)]
    pub board: Option<Vec<Vec<Mark>>>,
    /// Who moves next in Tic-Tac-Toe
    #[serde(default = "default_piece")]
    pub player: Piece,
    /// Who moves next in Connect 4
    #[serde(default = "default_piece")]
    pub piece: Piece,
    /// Off for Tic-Tac-Toe and on for Connect 4 unless set
    #[serde(default)]
    pub use_alpha_beta: Option<bool>,
    #[serde(default = "default_piece")]
    pub first_player: Piece,
    #[serde(default = "default_depth")]
    pub depth: usize,
    #[serde(default = "default_n_disks")]
    pub n_disks: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GameResponse {
    TicTacToeMove(MoveResult),
    TicTacToeGame(GameResult),
    ConnectFour(ConnectFourResult),
    Hanoi(HanoiResult),
}

impl GameRequest {
    pub fn run(&self) -> Result<GameResponse, SearchError> {
        debug!(game_type = %self.game_type, action = ?self.action, "running game");

        match (self.game_type.as_str(), self.action()) {
            ("tic-tac-toe", "find_move") => {
                let board = match &self.board {
                    Some(rows) => TicTacToeBoard::from_rows(rows)?,
                    None => TicTacToeBoard::default(),
                };

                Ok(GameResponse::TicTacToeMove(tic_tac_toe::find_best_move(
                    &board,
                    self.player,
                    self.use_alpha_beta.unwrap_or(false),
                )))
            }
            ("tic-tac-toe", "play_game") => Ok(GameResponse::TicTacToeGame(tic_tac_toe::play_game(
                self.first_player,
                self.use_alpha_beta.unwrap_or(false),
            ))),
            ("connect4", "find_move") => {
                if self.depth > connect_four::MAX_DEPTH {
                    return Err(SearchError::InvalidParameter(format!(
                        "depth must be at most {}, got {}",
                        connect_four::MAX_DEPTH,
                        self.depth
                    )));
                }

                let board = match &self.board {
                    Some(rows) => ConnectFourBoard::from_rows(rows)?,
                    None => ConnectFourBoard::default(),
                };

                Ok(GameResponse::ConnectFour(connect_four::find_best_move(
                    &board,
                    self.piece,
                    self.depth,
                    self.use_alpha_beta.unwrap_or(true),
                )))
            }
            ("tower-of-hanoi", "solve") => Ok(GameResponse::Hanoi(hanoi::solve(self.n_disks)?)),
            ("tic-tac-toe" | "connect4" | "tower-of-hanoi", action) => Err(
                SearchError::UnknownRequest(format!("{} has no action {action:?}", self.game_type)),
            ),
            (other, _) => Err(SearchError::UnknownRequest(format!("game_type {other:?}"))),
        }
    }

    /// The requested action, or the usual one for the game
    fn action(&self) -> &str {
        match (&self.action, self.game_type.as_str()) {
            (Some(action), _) => action.as_str(),
            (None, "tower-of-hanoi") => "solve",
            (None, _) => "find_move",
        }
    }
}
