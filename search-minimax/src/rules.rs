use std::fmt::Debug;

/// The rules of a two player game, as seen from the minimax tree
///
/// Positions don't need to know whose turn it is. The search tells [GameRules::play] whether the
/// maximizing or the minimizing side is moving, and the implementation decides which piece that
/// side plays.
pub trait GameRules {
    /// A game position
    type Board: Clone;
    /// A single move from one position to the next
    type Move: Copy + Debug + PartialEq;

    /// All the legal moves from `board`, in the order they should be searched
    ///
    /// Ties between equally scored moves are broken in favour of the earliest move in this list
    fn legal_moves(&self, board: &Self::Board) -> Vec<Self::Move>;

    /// Returns the position after `mv` is played by the maximizing side (when `maximizing` is
    /// true) or the minimizing side
    fn play(&self, board: &Self::Board, mv: Self::Move, maximizing: bool) -> Self::Board;

    /// The score of a finished game, or `None` if the game is still going
    ///
    /// `ply` is the number of moves between the root of the search and `board`, which lets
    /// implementations prefer faster wins and slower losses
    fn terminal_score(&self, board: &Self::Board, ply: i64) -> Option<i64>;
}
