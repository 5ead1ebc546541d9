use std::fmt::Debug;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Counters describing how much work a search did
pub struct SearchStats {
    /// Every position the search looked at, including the root
    pub nodes: usize,
    /// How many times Alpha-Beta pruning skipped the remaining moves of a position
    pub cutoffs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// This is returned from [crate::Minimax::best_move]
/// It contains what we learned about the moves available at the root of the tree
pub enum MinMaxReturn<MoveType: Copy + Debug> {
    /// The root had moves to choose from
    Node {
        /// Whether the root was a maximizing node or not
        is_maximizing: bool,
        /// Every root move we searched, in search order, with the score we got back for it
        ///
        /// With Alpha-Beta pruning enabled, moves that could not beat the current best are only
        /// searched far enough to prove that, so their score is a bound rather than exact
        options: Vec<(MoveType, i64)>,
        /// The chosen move, the first move in search order with the best score
        chosen: MoveType,
        /// The chosen score
        score: i64,
        /// How much work the search did
        stats: SearchStats,
    },
    /// The root was a leaf: the game is over or the maximum depth is zero
    Leaf {
        #[allow(missing_docs)]
        score: i64,
        #[allow(missing_docs)]
        stats: SearchStats,
    },
}

impl<MoveType: Copy + Debug> MinMaxReturn<MoveType> {
    /// Returns the score for the root
    pub fn score(&self) -> i64 {
        match self {
            MinMaxReturn::Node { score, .. } => *score,
            MinMaxReturn::Leaf { score, .. } => *score,
        }
    }

    /// Returns the move to play, if the root had any
    pub fn best_move(&self) -> Option<MoveType> {
        match self {
            MinMaxReturn::Node { chosen, .. } => Some(*chosen),
            MinMaxReturn::Leaf { .. } => None,
        }
    }

    /// The root moves that were searched, with their scores
    pub fn options(&self) -> &[(MoveType, i64)] {
        match self {
            MinMaxReturn::Node { options, .. } => options,
            MinMaxReturn::Leaf { .. } => &[],
        }
    }

    /// How much work the search did
    pub fn stats(&self) -> SearchStats {
        match self {
            MinMaxReturn::Node { stats, .. } => *stats,
            MinMaxReturn::Leaf { stats, .. } => *stats,
        }
    }

    /// A one line summary of the root options, used for tracing
    pub fn describe_options(&self) -> String {
        self.options()
            .iter()
            .map(|(m, score)| format!("{m:?}={score}"))
            .join(", ")
    }
}
