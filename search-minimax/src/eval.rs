use std::fmt::Debug;

use derivative::Derivative;
use tracing::debug;

use crate::{GameRules, MinMaxReturn, Scorable, SearchStats, BEST_SCORE, WORST_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Optional properties that can be defined for a [Minimax] search
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use search_minimax::MinimaxOptions;
///
/// let defaults: MinimaxOptions = Default::default();
///
/// assert!(defaults.alpha_beta);
/// assert_eq!(defaults.max_depth, None);
/// ```
pub struct MinimaxOptions {
    /// Skip subtrees that can't change the decision
    ///
    /// This never changes the chosen move or score, only the number of nodes visited
    pub alpha_beta: bool,
    /// How many plies below the root to search before falling back to the scoring function
    ///
    /// `None` searches until every line of play is finished
    pub max_depth: Option<usize>,
}

impl Default for MinimaxOptions {
    fn default() -> Self {
        Self {
            alpha_beta: true,
            max_depth: None,
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug(bound = "R: Debug"))]
/// This is the struct that wraps a set of game rules and a scoring function and can be used to
/// run minimax
///
/// It also outputs traces using the [tracing] crate.
pub struct Minimax<R, S> {
    rules: R,
    #[derivative(Debug = "ignore")]
    score_function: S,
    options: MinimaxOptions,
}

impl<R, S> Minimax<R, S>
where
    R: GameRules,
    S: Scorable<R::Board>,
{
    /// Construct a new `Minimax`
    pub fn new(rules: R, score_function: S, options: MinimaxOptions) -> Self {
        Self {
            rules,
            score_function,
            options,
        }
    }

    /// The rules this search plays by
    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// The options this search was built with
    pub fn options(&self) -> MinimaxOptions {
        self.options
    }

    /// Returns the minimax value of `node` with the maximizing side to move when `maximizing`
    /// is true, along with how much work it took
    #[tracing::instrument(
        level = "trace",
        skip_all,
        fields(maximizing = maximizing, nodes = tracing::field::Empty)
    )]
    pub fn score_position(&self, node: &R::Board, maximizing: bool) -> (i64, SearchStats) {
        let mut stats = SearchStats::default();
        let score = self.minimax(node, 0, WORST_SCORE, BEST_SCORE, maximizing, &mut stats);

        tracing::Span::current().record("nodes", &stats.nodes);

        (score, stats)
    }

    /// Pick the move to play from `node`
    ///
    /// Moves are searched in the order given by [GameRules::legal_moves] and the first move
    /// with the best score is chosen. If `node` is already a leaf we return a
    /// [MinMaxReturn::Leaf] with no move.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            maximizing = maximizing,
            alpha_beta = self.options.alpha_beta,
            chosen_score = tracing::field::Empty,
            nodes = tracing::field::Empty,
        )
    )]
    pub fn best_move(&self, node: &R::Board, maximizing: bool) -> MinMaxReturn<R::Move> {
        let mut stats = SearchStats {
            nodes: 1,
            cutoffs: 0,
        };

        if let Some(score) = self.leaf_score(node, 0) {
            return MinMaxReturn::Leaf { score, stats };
        }

        let moves = self.rules.legal_moves(node);
        let mut alpha = WORST_SCORE;
        let mut beta = BEST_SCORE;
        let mut options: Vec<(R::Move, i64)> = Vec::with_capacity(moves.len());
        let mut best: Option<(R::Move, i64)> = None;

        for mv in moves {
            let child = self.rules.play(node, mv, maximizing);
            let value = self.minimax(&child, 1, alpha, beta, !maximizing, &mut stats);
            options.push((mv, value));

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => value > best_score,
                Some((_, best_score)) => value < best_score,
            };
            if improves {
                best = Some((mv, value));
            }

            if self.options.alpha_beta {
                let best_score = best.map_or(value, |(_, s)| s);
                if maximizing {
                    alpha = alpha.max(best_score);
                } else {
                    beta = beta.min(best_score);
                }

                if beta <= alpha {
                    stats.cutoffs += 1;
                    break;
                }
            }
        }

        let result = match best {
            Some((chosen, score)) => MinMaxReturn::Node {
                is_maximizing: maximizing,
                options,
                chosen,
                score,
                stats,
            },
            None => MinMaxReturn::Leaf {
                score: self.score_function.score(node),
                stats,
            },
        };

        let current_span = tracing::Span::current();
        current_span.record("chosen_score", &result.score());
        current_span.record("nodes", &stats.nodes);
        debug!(options = %result.describe_options(), "finished best_move");

        result
    }

    /// Scores `node` if it is a leaf in our tree: either the game is over, or we've hit the
    /// maximum depth and use the scoring function
    fn leaf_score(&self, node: &R::Board, ply: i64) -> Option<i64> {
        if let Some(score) = self.rules.terminal_score(node, ply) {
            return Some(score);
        }

        match self.options.max_depth {
            Some(max_depth) if ply >= max_depth as i64 => Some(self.score_function.score(node)),
            _ => None,
        }
    }

    fn minimax(
        &self,
        node: &R::Board,
        ply: i64,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        stats: &mut SearchStats,
    ) -> i64 {
        stats.nodes += 1;

        if let Some(score) = self.leaf_score(node, ply) {
            return score;
        }

        let moves = self.rules.legal_moves(node);
        if moves.is_empty() {
            return self.score_function.score(node);
        }

        let mut best = if maximizing { WORST_SCORE } else { BEST_SCORE };

        for mv in moves {
            let child = self.rules.play(node, mv, maximizing);
            let value = self.minimax(&child, ply + 1, alpha, beta, !maximizing, stats);

            if maximizing {
                best = best.max(value);
                if self.options.alpha_beta {
                    alpha = alpha.max(best);
                }
            } else {
                best = best.min(value);
                if self.options.alpha_beta {
                    beta = beta.min(best);
                }
            }

            if self.options.alpha_beta && beta <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}
