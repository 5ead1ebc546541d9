use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{finish, reconstruct_path, GridProblem, GridResult, Position};
use crate::{Phase, Trace};

/// Level order search, the first path to reach the goal is a shortest one
pub(super) fn bfs(problem: &GridProblem) -> GridResult {
    let mut trace = Trace::default();
    let mut queue = VecDeque::from([problem.start]);
    let mut paths_from: FxHashMap<Position, Option<Position>> = FxHashMap::default();
    paths_from.insert(problem.start, None);

    while let Some(current) = queue.pop_front() {
        trace.record(current, Phase::Visiting);

        if current == problem.goal {
            return finish(Some(reconstruct_path(&paths_from, current)), trace);
        }

        for neighbor in problem.grid.neighbors(current) {
            if !paths_from.contains_key(&neighbor) {
                paths_from.insert(neighbor, Some(current));
                queue.push_back(neighbor);
                trace.record(neighbor, Phase::Exploring);
            }
        }
    }

    finish(None, trace)
}

/// Stack based search, makes no promise about the length of the path it finds
///
/// A position is only registered once, the first time it is seen, so its parent never changes
/// once it is on the stack.
pub(super) fn dfs(problem: &GridProblem) -> GridResult {
    let mut trace = Trace::default();
    let mut stack = vec![problem.start];
    let mut visited: FxHashSet<Position> = FxHashSet::default();
    let mut paths_from: FxHashMap<Position, Option<Position>> = FxHashMap::default();
    paths_from.insert(problem.start, None);

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        trace.record(current, Phase::Visiting);

        if current == problem.goal {
            return finish(Some(reconstruct_path(&paths_from, current)), trace);
        }

        for neighbor in problem.grid.neighbors(current) {
            if !visited.contains(&neighbor) && !paths_from.contains_key(&neighbor) {
                paths_from.insert(neighbor, Some(current));
                stack.push(neighbor);
                trace.record(neighbor, Phase::Exploring);
            }
        }
    }

    finish(None, trace)
}
