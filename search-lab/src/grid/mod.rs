//! Pathfinding on a 4-connected grid of free cells and obstacles

use std::{convert::TryFrom, fmt, str::FromStr};

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::{Extras, SearchError, SearchResult, Trace};

mod a_star;
mod genetic;
mod local_search;
mod uninformed;

pub use genetic::GeneticOptions;
pub use local_search::AnnealingOptions;

/// A path from start to goal, with every position the search looked at
pub type GridResult = SearchResult<Vec<Position>, Position>;

/// Right, Down, Left, Up
///
/// Neighbors are always generated in this order, it is the tie-break for every algorithm
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<[usize; 2]> for Position {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Position> for [usize; 2] {
    fn from(p: Position) -> Self {
        [p.row, p.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// A rectangular grid, `1` is an obstacle and `0` is free
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    rows: usize,
    cols: usize,
    obstacles: Vec<bool>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, SearchError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(SearchError::MalformedBoard(
                "grid must have at least one cell".to_owned(),
            ));
        }

        let mut obstacles = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SearchError::MalformedBoard(format!(
                    "row {i} has {} cells, expected {cols}",
                    row.len()
                )));
            }

            for &cell in row {
                match cell {
                    0 => obstacles.push(false),
                    1 => obstacles.push(true),
                    other => {
                        return Err(SearchError::MalformedBoard(format!(
                            "grid cells must be 0 or 1, found {other}"
                        )))
                    }
                }
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            obstacles,
        })
    }

    /// A grid without any obstacles
    pub fn open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            obstacles: vec![false; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles[pos.row * self.cols + pos.col]
    }

    /// In bounds, non obstacle neighbors of `pos` in Right, Down, Left, Up order
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dr, dc)| {
                Some(Position {
                    row: pos.row.checked_add_signed(dr)?,
                    col: pos.col.checked_add_signed(dc)?,
                })
            })
            .filter(|&n| self.contains(n) && !self.is_obstacle(n))
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = SearchError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.obstacles
            .chunks(grid.cols)
            .map(|row| row.iter().map(|&blocked| u8::from(blocked)).collect())
            .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    /// `|Δrow| + |Δcol|`, admissible on a 4-connected grid
    #[default]
    Manhattan,
    Euclidean,
}

impl Heuristic {
    pub fn distance(self, from: Position, to: Position) -> f64 {
        let dr = from.row.abs_diff(to.row) as f64;
        let dc = from.col.abs_diff(to.col) as f64;

        match self {
            Heuristic::Manhattan => dr + dc,
            Heuristic::Euclidean => (dr * dr + dc * dc).sqrt(),
        }
    }
}

/// Everything a grid search needs to know about one instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridProblem {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
    pub heuristic: Heuristic,
}

impl GridProblem {
    pub fn new(
        grid: Grid,
        start: Position,
        goal: Position,
        heuristic: Heuristic,
    ) -> Result<Self, SearchError> {
        for (name, pos) in [("start", start), ("goal", goal)] {
            if !grid.contains(pos) {
                return Err(SearchError::InvalidParameter(format!(
                    "{name} {pos} is outside the {}x{} grid",
                    grid.rows(),
                    grid.cols()
                )));
            }
        }

        Ok(Self {
            grid,
            start,
            goal,
            heuristic,
        })
    }

    /// Heuristic distance from `pos` to the goal
    pub fn h(&self, pos: Position) -> f64 {
        self.heuristic.distance(pos, self.goal)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Astar,
    Bfs,
    Dfs,
    Dijkstra,
    HillClimbing,
    SimulatedAnnealing,
    Genetic,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Astar,
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::HillClimbing,
        Algorithm::SimulatedAnnealing,
        Algorithm::Genetic,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Astar => "astar",
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::HillClimbing => "hill_climbing",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
            Algorithm::Genetic => "genetic",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Astar => "A* Search",
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Dfs => "Depth-First Search",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::HillClimbing => "Hill Climbing",
            Algorithm::SimulatedAnnealing => "Simulated Annealing",
            Algorithm::Genetic => "Genetic Algorithm",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Algorithm::Astar | Algorithm::Dijkstra => "Informed",
            Algorithm::Bfs | Algorithm::Dfs => "Uninformed",
            Algorithm::HillClimbing | Algorithm::SimulatedAnnealing => "Local Search",
            Algorithm::Genetic => "Evolutionary",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == s)
            .ok_or_else(|| SearchError::UnknownAlgorithm(s.to_owned()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

/// The grid algorithms a caller can pick from
pub fn catalogue() -> Vec<AlgorithmInfo> {
    Algorithm::ALL
        .into_iter()
        .map(|a| AlgorithmInfo {
            id: a.id(),
            name: a.name(),
            category: a.category(),
        })
        .collect()
}

/// Tuning for the algorithms that don't run to exhaustion
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use search_lab::grid::GridSearchOptions;
///
/// let defaults = GridSearchOptions::default();
///
/// assert_eq!(defaults.hill_climbing_iterations, 1000);
/// assert_eq!(defaults.annealing.initial_temperature, 100.0);
/// assert_eq!(defaults.genetic.population_size, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSearchOptions {
    pub hill_climbing_iterations: usize,
    pub annealing: AnnealingOptions,
    pub genetic: GeneticOptions,
}

impl Default for GridSearchOptions {
    fn default() -> Self {
        Self {
            hill_climbing_iterations: 1000,
            annealing: AnnealingOptions::default(),
            genetic: GeneticOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridSearchEngine {
    options: GridSearchOptions,
}

impl GridSearchEngine {
    pub fn new(options: GridSearchOptions) -> Self {
        Self { options }
    }

    /// Runs the algorithm named by `algorithm_id` on `problem`
    ///
    /// `rng` is only drawn from by the stochastic algorithms
    pub fn run<R: Rng + ?Sized>(
        &self,
        algorithm_id: &str,
        problem: &GridProblem,
        rng: &mut R,
    ) -> Result<GridResult, SearchError> {
        let algorithm: Algorithm = algorithm_id.parse()?;

        Ok(self.run_algorithm(algorithm, problem, rng))
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            algorithm = %algorithm,
            start = %problem.start,
            goal = %problem.goal,
            found = tracing::field::Empty,
        )
    )]
    pub fn run_algorithm<R: Rng + ?Sized>(
        &self,
        algorithm: Algorithm,
        problem: &GridProblem,
        rng: &mut R,
    ) -> GridResult {
        let result = match algorithm {
            Algorithm::Astar => a_star::a_star(problem),
            Algorithm::Dijkstra => a_star::dijkstra(problem),
            Algorithm::Bfs => uninformed::bfs(problem),
            Algorithm::Dfs => uninformed::dfs(problem),
            Algorithm::HillClimbing => {
                local_search::hill_climbing(problem, self.options.hill_climbing_iterations)
            }
            Algorithm::SimulatedAnnealing => {
                local_search::simulated_annealing(problem, &self.options.annealing, rng)
            }
            Algorithm::Genetic => genetic::genetic(problem, &self.options.genetic, rng),
        };

        tracing::Span::current().record("found", &result.found);
        info!(
            nodes_explored = result.nodes_explored,
            path_cost = ?result.extras.path_cost,
            "{algorithm} finished"
        );

        result
    }
}

/// Walks `paths_from` back from `target` to the start
fn reconstruct_path(
    paths_from: &FxHashMap<Position, Option<Position>>,
    target: Position,
) -> Vec<Position> {
    let mut path = vec![];
    let mut current = Some(target);

    while let Some(c) = current {
        current = *paths_from
            .get(&c)
            .expect("Somehow we didn't look at this position during the search, but its still in the path");

        path.push(c);
    }

    path.reverse();

    path
}

/// Wraps up a finished search, `path` is `None` when the goal wasn't reached
fn finish(path: Option<Vec<Position>>, trace: Trace<Position>) -> GridResult {
    let path_cost = path.as_ref().map_or(0, |p| p.len() - 1);

    SearchResult::from_trace(path, trace).with_extras(Extras {
        path_cost: Some(path_cost),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::request::GridRequest;

    pub(crate) fn problem_from_fixture(json: &str) -> GridProblem {
        let request: GridRequest = serde_json::from_str(json).unwrap();
        request.problem().unwrap()
    }

    fn visited(result: &GridResult) -> Vec<Position> {
        result
            .trace
            .iter()
            .filter(|e| e.phase == crate::Phase::Visiting)
            .map(|e| e.snapshot)
            .collect()
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let grid = Grid::from_rows(vec![vec![0, 0, 0], vec![0, 0, 1], vec![0, 0, 0]]).unwrap();

        assert_eq!(
            grid.neighbors(Position::new(1, 1)),
            vec![Position::new(2, 1), Position::new(1, 0), Position::new(0, 1)]
        );
        assert_eq!(
            grid.neighbors(Position::new(0, 0)),
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_malformed_grids_are_rejected() {
        assert!(matches!(
            Grid::from_rows(vec![]),
            Err(SearchError::MalformedBoard(_))
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![0, 0], vec![0]]),
            Err(SearchError::MalformedBoard(_))
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![0, 2]]),
            Err(SearchError::MalformedBoard(_))
        ));
    }

    #[test]
    fn test_start_outside_grid() {
        let result = GridProblem::new(
            Grid::open(2, 2),
            Position::new(2, 0),
            Position::new(0, 0),
            Heuristic::Manhattan,
        );

        assert!(matches!(result, Err(SearchError::InvalidParameter(_))));
    }

    #[test]
    fn test_heuristics() {
        let from = Position::new(0, 0);
        let to = Position::new(3, 4);

        assert_eq!(Heuristic::Manhattan.distance(from, to), 7.0);
        assert_eq!(Heuristic::Euclidean.distance(from, to), 5.0);
    }

    #[test]
    fn test_unknown_algorithm() {
        let problem = GridProblem::new(
            Grid::open(2, 2),
            Position::new(0, 0),
            Position::new(1, 1),
            Heuristic::Manhattan,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let result = GridSearchEngine::default().run("iddfs", &problem, &mut rng);

        assert!(matches!(result, Err(SearchError::UnknownAlgorithm(id)) if id == "iddfs"));
    }

    #[test]
    fn test_catalogue_lists_every_algorithm() {
        let catalogue = catalogue();

        assert_eq!(catalogue.len(), 7);
        assert_eq!(catalogue[0].id, "astar");
        assert_eq!(catalogue[6].category, "Evolutionary");
        for info in catalogue {
            assert_eq!(info.id.parse::<Algorithm>().unwrap().id(), info.id);
        }
    }

    #[test]
    fn test_split_grid_shortest_paths() {
        let problem = problem_from_fixture(include_str!("../../fixtures/split_5x5.json"));
        let engine = GridSearchEngine::default();
        let mut rng = StdRng::seed_from_u64(7);

        for algorithm in [Algorithm::Bfs, Algorithm::Astar, Algorithm::Dijkstra] {
            let result = engine.run_algorithm(algorithm, &problem, &mut rng);

            assert!(result.found, "{algorithm} should find a path");
            assert_eq!(result.extras.path_cost, Some(8), "{algorithm}");

            let path = result.artifact.unwrap();
            assert_eq!(path.first(), Some(&problem.start));
            assert_eq!(path.last(), Some(&problem.goal));
            assert!(path.contains(&Position::new(2, 4)));
        }
    }

    #[test]
    fn test_open_grids_agree_on_path_cost() {
        let engine = GridSearchEngine::default();
        let mut rng = StdRng::seed_from_u64(7);

        for (rows, cols, goal) in [(1, 1, (0, 0)), (4, 6, (3, 5)), (7, 3, (6, 0)), (5, 5, (2, 3))] {
            for heuristic in [Heuristic::Manhattan, Heuristic::Euclidean] {
                let problem = GridProblem::new(
                    Grid::open(rows, cols),
                    Position::new(0, 0),
                    Position::new(goal.0, goal.1),
                    heuristic,
                )
                .unwrap();

                let costs = [Algorithm::Bfs, Algorithm::Dijkstra, Algorithm::Astar]
                    .map(|a| engine.run_algorithm(a, &problem, &mut rng).extras.path_cost);

                assert_eq!(costs, [Some(goal.0 + goal.1); 3]);
            }
        }
    }

    #[test]
    fn test_a_star_never_visits_more_than_dijkstra() {
        let engine = GridSearchEngine::default();
        let mut rng = StdRng::seed_from_u64(7);

        for fixture in [
            include_str!("../../fixtures/split_5x5.json"),
            include_str!("../../fixtures/maze_10x10.json"),
        ] {
            let problem = problem_from_fixture(fixture);

            let a_star = engine.run_algorithm(Algorithm::Astar, &problem, &mut rng);
            let dijkstra = engine.run_algorithm(Algorithm::Dijkstra, &problem, &mut rng);

            let a_star_visited: rustc_hash::FxHashSet<_> = visited(&a_star).into_iter().collect();
            let dijkstra_visited: rustc_hash::FxHashSet<_> =
                visited(&dijkstra).into_iter().collect();

            assert!(a_star_visited.len() <= dijkstra_visited.len());
            assert_eq!(a_star.extras.path_cost, dijkstra.extras.path_cost);
        }
    }

    #[test]
    fn test_walled_off_goal_is_not_found() {
        let problem = problem_from_fixture(include_str!("../../fixtures/walled_off.json"));
        let engine = GridSearchEngine::default();
        let mut rng = StdRng::seed_from_u64(7);

        for algorithm in Algorithm::ALL {
            let result = engine.run_algorithm(algorithm, &problem, &mut rng);

            assert!(!result.found, "{algorithm} can't reach a walled off goal");
            assert_eq!(result.artifact, None);
            assert_eq!(result.extras.path_cost, Some(0));
        }
    }

    #[test]
    fn test_grid_round_trips_through_json() {
        let grid = Grid::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();

        let json = serde_json::to_string(&grid).unwrap();

        assert_eq!(json, "[[0,1],[1,0]]");
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
        assert_eq!(
            serde_json::to_string(&Position::new(3, 4)).unwrap(),
            "[3,4]"
        );
    }
}
