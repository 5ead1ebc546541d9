use std::{
    cmp::Reverse,
    collections::{hash_map::Entry, BinaryHeap, VecDeque},
    convert::TryFrom,
};

use rustc_hash::FxHashMap;
use tracing::info;

use crate::{Extras, Phase, SearchError, SearchResult, Trace};

/// The sequence of boards from the initial state to the goal
pub type PuzzleResult = SearchResult<Vec<PuzzleBoard>, PuzzleBoard>;

/// A* gives up once it has taken more than this many boards off the queue
pub const ASTAR_NODE_LIMIT: usize = 10_000;
/// BFS gives up once it has taken more than this many boards off the queue
pub const BFS_NODE_LIMIT: usize = 5_000;

const GOAL: [[u8; 3]; 3] = [[1, 2, 3], [4, 5, 6], [7, 8, 0]];

/// A 3x3 sliding tile board, `0` is the blank
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "Vec<Vec<u8>>", into = "[[u8; 3]; 3]")]
pub struct PuzzleBoard([[u8; 3]; 3]);

impl PuzzleBoard {
    pub const GOAL: PuzzleBoard = PuzzleBoard(GOAL);

    /// Requires a permutation of `0..=8`
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, SearchError> {
        let cells = super::square::<3>(rows, "an 8-puzzle")?;

        let mut seen = [false; 9];
        for &tile in cells.iter().flatten() {
            match seen.get_mut(tile as usize) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(SearchError::MalformedBoard(
                        "an 8-puzzle must hold each of the tiles 0 through 8 once".to_owned(),
                    ))
                }
            }
        }

        Ok(Self(cells))
    }

    /// The flattened tiles, used to tell boards apart
    pub fn key(&self) -> [u8; 9] {
        let mut key = [0; 9];
        for (k, &tile) in key.iter_mut().zip(self.0.iter().flatten()) {
            *k = tile;
        }
        key
    }

    pub fn rows(&self) -> &[[u8; 3]; 3] {
        &self.0
    }

    pub fn is_goal(&self) -> bool {
        self.0 == GOAL
    }

    fn blank(&self) -> (usize, usize) {
        self.key()
            .iter()
            .position(|&tile| tile == 0)
            .map(|i| (i / 3, i % 3))
            .unwrap_or((0, 0))
    }

    /// Boards reachable by sliding a tile into the blank, in Right, Down, Left, Up order of the
    /// blank's movement
    pub fn neighbors(&self) -> Vec<PuzzleBoard> {
        let (row, col) = self.blank();

        [(0, 1), (1, 0), (0, -1), (-1, 0)]
            .into_iter()
            .filter_map(|(dr, dc): (isize, isize)| {
                let r = row.checked_add_signed(dr).filter(|&r| r < 3)?;
                let c = col.checked_add_signed(dc).filter(|&c| c < 3)?;

                let mut next = *self;
                next.0[row][col] = next.0[r][c];
                next.0[r][c] = 0;
                Some(next)
            })
            .collect()
    }

    /// Sum over every tile of how far it is from where it belongs
    pub fn manhattan_distance(&self) -> usize {
        let mut distance = 0;
        for (i, row) in self.0.iter().enumerate() {
            for (j, &tile) in row.iter().enumerate() {
                if tile != 0 {
                    let target = (tile as usize - 1) / 3;
                    let target_col = (tile as usize - 1) % 3;
                    distance += i.abs_diff(target) + j.abs_diff(target_col);
                }
            }
        }
        distance
    }

    /// Only boards with an even number of inversions can reach the goal
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<u8> = self.key().into_iter().filter(|&t| t != 0).collect();
        let inversions = tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|&b| b < a).count())
            .sum::<usize>();

        inversions % 2 == 0
    }
}

impl TryFrom<Vec<Vec<u8>>> for PuzzleBoard {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<PuzzleBoard> for [[u8; 3]; 3] {
    fn from(board: PuzzleBoard) -> Self {
        board.0
    }
}

/// A* ordered by `moves so far + Manhattan distance`
///
/// Boards are marked as seen when they are pushed, so each is queued at most once.
#[tracing::instrument(level = "debug", skip_all)]
pub fn solve_astar(initial: PuzzleBoard) -> PuzzleResult {
    let mut trace = Trace::default();
    let mut open = BinaryHeap::new();
    let mut paths_from: FxHashMap<[u8; 9], Option<PuzzleBoard>> = FxHashMap::default();

    open.push(Reverse((initial.manhattan_distance(), 0, initial)));
    paths_from.insert(initial.key(), None);

    let mut nodes_explored = 0;
    while let Some(Reverse((_, g, current))) = open.pop() {
        nodes_explored += 1;
        trace.record(current, Phase::Visiting);

        if current.is_goal() {
            return solved(&paths_from, current, trace, nodes_explored);
        }

        for neighbor in current.neighbors() {
            if let Entry::Vacant(e) = paths_from.entry(neighbor.key()) {
                e.insert(Some(current));
                open.push(Reverse((g + 1 + neighbor.manhattan_distance(), g + 1, neighbor)));
            }
        }

        if nodes_explored > ASTAR_NODE_LIMIT {
            break;
        }
    }

    unsolved(initial, trace, nodes_explored, ASTAR_NODE_LIMIT)
}

/// Level order search over boards
#[tracing::instrument(level = "debug", skip_all)]
pub fn solve_bfs(initial: PuzzleBoard) -> PuzzleResult {
    let mut trace = Trace::default();
    let mut queue = VecDeque::from([initial]);
    let mut paths_from: FxHashMap<[u8; 9], Option<PuzzleBoard>> = FxHashMap::default();
    paths_from.insert(initial.key(), None);

    let mut nodes_explored = 0;
    while let Some(current) = queue.pop_front() {
        nodes_explored += 1;
        trace.record(current, Phase::Visiting);

        if current.is_goal() {
            return solved(&paths_from, current, trace, nodes_explored);
        }

        for neighbor in current.neighbors() {
            if let Entry::Vacant(e) = paths_from.entry(neighbor.key()) {
                e.insert(Some(current));
                queue.push_back(neighbor);
            }
        }

        if nodes_explored > BFS_NODE_LIMIT {
            break;
        }
    }

    unsolved(initial, trace, nodes_explored, BFS_NODE_LIMIT)
}

fn solved(
    paths_from: &FxHashMap<[u8; 9], Option<PuzzleBoard>>,
    goal: PuzzleBoard,
    trace: Trace<PuzzleBoard>,
    nodes_explored: usize,
) -> PuzzleResult {
    let mut path = vec![];
    let mut current = Some(goal);

    while let Some(c) = current {
        current = *paths_from
            .get(&c.key())
            .expect("Every board on the path was queued during the search");

        path.push(c);
    }

    path.reverse();

    let moves = path.len() as u64 - 1;
    info!(moves, nodes_explored, "solved 8-puzzle");

    SearchResult::from_trace(Some(path), trace)
        .with_nodes_explored(nodes_explored)
        .with_extras(Extras {
            moves: Some(moves),
            ..Default::default()
        })
}

fn unsolved(
    initial: PuzzleBoard,
    trace: Trace<PuzzleBoard>,
    nodes_explored: usize,
    limit: usize,
) -> PuzzleResult {
    let message = if initial.is_solvable() {
        format!("No solution found within {limit} nodes")
    } else {
        "Puzzle is unsolvable".to_owned()
    };
    info!(nodes_explored, %message, "gave up on 8-puzzle");

    SearchResult::from_trace(None, trace)
        .with_nodes_explored(nodes_explored)
        .with_extras(Extras {
            moves: Some(0),
            message: Some(message),
            ..Default::default()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[u8; 3]; 3]) -> PuzzleBoard {
        PuzzleBoard::from_rows(&rows.map(Vec::from)).unwrap()
    }

    fn assert_valid_solution(initial: PuzzleBoard, result: &PuzzleResult) {
        let path = result.artifact.as_ref().unwrap();

        assert_eq!(path.first(), Some(&initial));
        assert!(path.last().unwrap().is_goal());
        assert_eq!(result.extras.moves, Some(path.len() as u64 - 1));
        for pair in path.windows(2) {
            assert!(pair[0].neighbors().contains(&pair[1]));
        }
    }

    #[test]
    fn test_malformed_boards() {
        assert!(PuzzleBoard::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).is_err());
        assert!(PuzzleBoard::from_rows(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 8]]).is_err());
        assert!(PuzzleBoard::from_rows(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).is_err());
    }

    #[test]
    fn test_neighbors_move_the_blank() {
        let centre = board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);

        assert_eq!(
            centre.neighbors(),
            vec![
                board([[1, 2, 3], [4, 6, 0], [7, 5, 8]]),
                board([[1, 2, 3], [4, 5, 6], [7, 0, 8]]),
                board([[1, 2, 3], [0, 4, 6], [7, 5, 8]]),
                board([[1, 0, 3], [4, 2, 6], [7, 5, 8]]),
            ]
        );
        assert_eq!(PuzzleBoard::GOAL.neighbors().len(), 2);
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(PuzzleBoard::GOAL.manhattan_distance(), 0);
        assert_eq!(board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).manhattan_distance(), 2);
        assert_eq!(board([[8, 2, 3], [4, 5, 6], [7, 1, 0]]).manhattan_distance(), 6);
    }

    #[test]
    fn test_solvability() {
        assert!(PuzzleBoard::GOAL.is_solvable());
        assert!(board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).is_solvable());
        assert!(!board([[2, 1, 3], [4, 5, 6], [7, 8, 0]]).is_solvable());
    }

    #[test]
    fn test_astar_two_moves() {
        let initial = board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);

        let result = solve_astar(initial);

        assert!(result.found);
        assert_eq!(result.extras.moves, Some(2));
        assert_valid_solution(initial, &result);
        assert_eq!(result.trace[0].snapshot, initial);
        assert_eq!(result.nodes_explored, result.trace.len());
    }

    #[test]
    fn test_bfs_matches_astar_move_count() {
        for rows in [
            [[1, 2, 3], [4, 5, 6], [0, 7, 8]],
            [[1, 2, 3], [0, 4, 6], [7, 5, 8]],
            [[4, 1, 3], [7, 2, 6], [0, 5, 8]],
        ] {
            let initial = board(rows);

            let astar = solve_astar(initial);
            let bfs = solve_bfs(initial);

            assert!(astar.found && bfs.found);
            assert_eq!(astar.extras.moves, bfs.extras.moves);
            assert_valid_solution(initial, &bfs);
            assert!(astar.nodes_explored <= bfs.nodes_explored);
        }
    }

    #[test]
    fn test_already_solved() {
        let result = solve_bfs(PuzzleBoard::GOAL);

        assert!(result.found);
        assert_eq!(result.extras.moves, Some(0));
        assert_eq!(result.nodes_explored, 1);
    }

    #[test]
    fn test_unsolvable_hits_node_limit() {
        let initial = board([[2, 1, 3], [4, 5, 6], [7, 8, 0]]);

        let astar = solve_astar(initial);
        assert!(!astar.found);
        assert_eq!(astar.nodes_explored, ASTAR_NODE_LIMIT + 1);
        assert_eq!(astar.extras.message.as_deref(), Some("Puzzle is unsolvable"));

        let bfs = solve_bfs(initial);
        assert!(!bfs.found);
        assert_eq!(bfs.nodes_explored, BFS_NODE_LIMIT + 1);
        assert_eq!(bfs.artifact, None);
    }

    #[test]
    fn test_board_serializes_as_rows() {
        let initial = board([[1, 2, 3], [4, 0, 6], [7, 5, 8]]);

        assert_eq!(
            serde_json::to_string(&initial).unwrap(),
            "[[1,2,3],[4,0,6],[7,5,8]]"
        );
        assert!(serde_json::from_str::<PuzzleBoard>("[[1,2,3],[4,0,6],[7,5,5]]").is_err());
    }
}
