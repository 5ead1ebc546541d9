//! Two player games searched with `search-minimax`

use std::fmt;

pub mod connect_four;
pub mod tic_tac_toe;

pub use connect_four::{ColumnEvaluation, ConnectFourBoard, ConnectFourResult};
pub use tic_tac_toe::{GameResult, MoveEvaluation, MoveResult, Ply, TicTacToeBoard};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    X,
    O,
}

impl Piece {
    pub fn opponent(self) -> Piece {
        match self {
            Piece::X => Piece::O,
            Piece::O => Piece::X,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Piece::X => write!(f, "X"),
            Piece::O => write!(f, "O"),
        }
    }
}

/// The contents of a single cell
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    X,
    O,
    #[default]
    #[serde(rename = "", alias = " ")]
    Empty,
}

impl Mark {
    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }
}

impl From<Piece> for Mark {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::X => Mark::X,
            Piece::O => Mark::O,
        }
    }
}

/// How a finished game ended
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl From<Piece> for Outcome {
    fn from(piece: Piece) -> Self {
        match piece {
            Piece::X => Outcome::X,
            Piece::O => Outcome::O,
        }
    }
}

/// Copies a grid of marks into a fixed size board
fn board_from_rows<const R: usize, const C: usize>(
    rows: &[Vec<Mark>],
    what: &str,
) -> Result<[[Mark; C]; R], crate::SearchError> {
    if rows.len() != R || rows.iter().any(|row| row.len() != C) {
        return Err(crate::SearchError::MalformedBoard(format!(
            "{what} must be {R} rows of {C} cells"
        )));
    }

    let mut cells = [[Mark::Empty; C]; R];
    for (target, row) in cells.iter_mut().zip(rows) {
        target.copy_from_slice(row);
    }

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_serialize_as_strings() {
        assert_eq!(
            serde_json::to_string(&[Mark::X, Mark::O, Mark::Empty]).unwrap(),
            r#"["X","O",""]"#
        );
        assert_eq!(
            serde_json::from_str::<Vec<Mark>>(r#"["X", " ", ""]"#).unwrap(),
            vec![Mark::X, Mark::Empty, Mark::Empty]
        );
        assert!(serde_json::from_str::<Mark>(r#""Z""#).is_err());
    }

    #[test]
    fn test_outcome_names() {
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), r#""draw""#);
        assert_eq!(serde_json::to_string(&Outcome::from(Piece::O)).unwrap(), r#""O""#);
    }
}
