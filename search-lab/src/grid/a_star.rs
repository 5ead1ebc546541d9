use std::cmp::Ordering;
use std::collections::BinaryHeap;

use decorum::N64;
use rustc_hash::FxHashMap;

use super::{finish, reconstruct_path, GridProblem, GridResult, Position};
use crate::{Phase, Trace};

const NEIGHBOR_DISTANCE: usize = 1;

#[derive(Copy, Clone, Eq, PartialEq)]
struct Node {
    cost: N64,
    g: usize,
    position: Position,
}

// The priority queue depends on `Ord`.
// Explicitly implement the trait so the queue becomes a min-heap
// instead of a max-heap.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Notice that the we flip the ordering on costs.
        // In case of a tie the smaller position comes out first, then the cheaper `g`, which keeps
        // `PartialEq` and `Ord` consistent.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.position.cmp(&self.position))
            .then_with(|| other.g.cmp(&self.g))
    }
}

// `PartialOrd` needs to be implemented as well.
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(super) fn a_star(problem: &GridProblem) -> GridResult {
    best_first(problem, |pos| problem.h(pos))
}

/// A* with a heuristic of zero
pub(super) fn dijkstra(problem: &GridProblem) -> GridResult {
    best_first(problem, |_| 0.0)
}

/// Pops the position with the lowest `g + h` until the goal comes off the queue
///
/// A neighbor is pushed whenever we find a cheaper way to it, so a position can sit in the queue
/// more than once. Entries whose `g` is worse than the best known are skipped when popped.
fn best_first<H>(problem: &GridProblem, heuristic: H) -> GridResult
where
    H: Fn(Position) -> f64,
{
    let start = problem.start;

    let mut trace = Trace::default();
    let mut to_search: BinaryHeap<Node> = BinaryHeap::new();
    let mut known_cost: FxHashMap<Position, usize> = FxHashMap::default();
    let mut paths_from: FxHashMap<Position, Option<Position>> = FxHashMap::default();

    to_search.push(Node {
        cost: N64::from(heuristic(start)),
        g: 0,
        position: start,
    });
    known_cost.insert(start, 0);
    paths_from.insert(start, None);

    while let Some(Node { g, position, .. }) = to_search.pop() {
        if known_cost.get(&position).map_or(false, |&best| g > best) {
            continue;
        }

        trace.record(position, Phase::Visiting);

        if position == problem.goal {
            return finish(Some(reconstruct_path(&paths_from, position)), trace);
        }

        let tentative = g + NEIGHBOR_DISTANCE;
        for neighbor in problem.grid.neighbors(position) {
            if known_cost
                .get(&neighbor)
                .map_or(true, |&known| tentative < known)
            {
                known_cost.insert(neighbor, tentative);
                paths_from.insert(neighbor, Some(position));
                to_search.push(Node {
                    cost: N64::from(tentative as f64 + heuristic(neighbor)),
                    g: tentative,
                    position: neighbor,
                });
                trace.record(neighbor, Phase::Exploring);
            }
        }
    }

    finish(None, trace)
}
