use decorum::N64;
use itertools::Itertools;
use rand::{seq::index, seq::SliceRandom, Rng};
use rustc_hash::FxHashSet;
use tracing::debug;

use super::{finish, GridProblem, GridResult, Position};
use crate::{Phase, Trace};

type Path = Vec<Position>;

/// Knobs for the path evolving genetic algorithm
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use search_lab::grid::GeneticOptions;
///
/// let defaults = GeneticOptions::default();
///
/// assert_eq!(defaults.population_size, 50);
/// assert_eq!(defaults.generations, 100);
/// assert_eq!(defaults.mutation_rate, 0.1);
/// assert_eq!(defaults.elite_size, 5);
/// assert_eq!(defaults.tournament_size, 3);
/// assert_eq!(defaults.greedy_rate, 0.7);
/// assert_eq!(defaults.max_mutation_steps, 5);
/// assert_eq!(defaults.trace_limit, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticOptions {
    pub population_size: usize,
    /// Upper bound on generations, we stop early once the best path reaches the goal
    pub generations: usize,
    pub mutation_rate: f64,
    /// How many of the fittest paths are copied into the next generation untouched
    pub elite_size: usize,
    pub tournament_size: usize,
    /// Chance that a step of a fresh random path moves toward the goal instead of anywhere
    pub greedy_rate: f64,
    pub max_mutation_steps: usize,
    /// Only this many of the most recent trace entries are returned
    pub trace_limit: usize,
}

impl Default for GeneticOptions {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            elite_size: 5,
            tournament_size: 3,
            greedy_rate: 0.7,
            max_mutation_steps: 5,
            trace_limit: 200,
        }
    }
}

struct Evolution<'a, R: ?Sized> {
    problem: &'a GridProblem,
    options: &'a GeneticOptions,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Evolution<'a, R> {
    /// Walks from the start for at most `rows * cols` steps, stopping at the goal or a dead end
    ///
    /// Unvisited neighbors are preferred, if there are none any neighbor will do.
    fn random_path(&mut self) -> Path {
        let problem = self.problem;
        let mut current = problem.start;
        let mut path = vec![current];
        let mut visited: FxHashSet<Position> = FxHashSet::default();
        visited.insert(current);

        for _ in 0..problem.grid.rows() * problem.grid.cols() {
            if current == problem.goal {
                break;
            }

            let neighbors = problem.grid.neighbors(current);
            let unvisited = neighbors
                .iter()
                .copied()
                .filter(|n| !visited.contains(n))
                .collect_vec();
            let candidates = if unvisited.is_empty() {
                neighbors
            } else {
                unvisited
            };

            let next = if self.rng.gen::<f64>() < self.options.greedy_rate {
                candidates
                    .iter()
                    .copied()
                    .min_by_key(|&n| N64::from(problem.h(n)))
            } else {
                candidates.choose(&mut *self.rng).copied()
            };

            match next {
                Some(next) => {
                    path.push(next);
                    visited.insert(next);
                    current = next;
                }
                None => break,
            }
        }

        path
    }

    /// Lower is better, reaching the goal outweighs everything else
    fn fitness(&self, path: &[Position]) -> N64 {
        let last = match path.last() {
            Some(&last) => last,
            None => return N64::from(f64::INFINITY),
        };
        let reached_goal = if last == self.problem.goal { 1.0 } else { 0.0 };

        N64::from(self.problem.h(last) + path.len() as f64 * 0.5 - reached_goal * 1000.0)
    }

    /// The fittest of `tournament_size` distinct random individuals
    fn select_parent<'p>(&mut self, population: &'p [Path], fitnesses: &[N64]) -> &'p Path {
        let size = self.options.tournament_size.min(population.len()).max(1);

        let winner = index::sample(&mut *self.rng, population.len(), size)
            .into_iter()
            .min_by_key(|&i| fitnesses[i])
            .unwrap_or(0);

        &population[winner]
    }

    /// Splices `first` up to a node it shares with `second`, then the rest of `second`
    ///
    /// The splice point is a random common node other than the first one. When the parents are
    /// too short, don't both pass through the start, or share fewer than two nodes the child is
    /// a copy of `first`.
    fn crossover(&mut self, first: &[Position], second: &[Position]) -> Path {
        if first.len() < 2 || second.len() < 2 {
            return first.to_vec();
        }

        let in_second: FxHashSet<Position> = second.iter().copied().collect();
        let start = self.problem.start;
        if !first.contains(&start) || !in_second.contains(&start) {
            return first.to_vec();
        }

        let common = first
            .iter()
            .copied()
            .filter(|n| in_second.contains(n))
            .collect_vec();
        let point = match common.get(1..).and_then(|rest| rest.choose(&mut *self.rng)) {
            Some(&point) => point,
            None => return first.to_vec(),
        };

        let (i, j) = match (
            first.iter().position(|&n| n == point),
            second.iter().position(|&n| n == point),
        ) {
            (Some(i), Some(j)) => (i, j),
            _ => return first.to_vec(),
        };

        first[..=i].iter().chain(&second[j + 1..]).copied().collect()
    }

    /// Sometimes cuts the path at a random point and wanders a few random steps from there
    fn mutate(&mut self, path: Path) -> Path {
        if path.len() < 3 || self.rng.gen::<f64>() > self.options.mutation_rate {
            return path;
        }

        let cut = self.rng.gen_range(1..=path.len() - 1);
        let mut mutated = path[..cut].to_vec();
        let mut current = path[cut - 1];

        let steps = self.rng.gen_range(1..=self.options.max_mutation_steps.max(1));
        for _ in 0..steps {
            let next = match self.problem.grid.neighbors(current).choose(&mut *self.rng) {
                Some(&next) => next,
                None => break,
            };

            mutated.push(next);
            current = next;
            if current == self.problem.goal {
                break;
            }
        }

        mutated
    }
}

/// Evolves a population of random walks toward the goal
///
/// Every time the best fitness so far improves, the whole new best path is added to the trace.
pub(super) fn genetic<R: Rng + ?Sized>(
    problem: &GridProblem,
    options: &GeneticOptions,
    rng: &mut R,
) -> GridResult {
    let mut evolution = Evolution {
        problem,
        options,
        rng,
    };
    let mut trace = Trace::default();

    let mut population = (0..options.population_size)
        .map(|_| evolution.random_path())
        .collect_vec();
    let mut best: Option<(N64, Path)> = None;
    let mut generations_run = 0;

    for generation in 0..options.generations {
        generations_run = generation + 1;

        let fitnesses = population
            .iter()
            .map(|path| evolution.fitness(path))
            .collect_vec();

        if let Some(i) = fitnesses.iter().position_min() {
            if best.as_ref().map_or(true, |(f, _)| fitnesses[i] < *f) {
                for &pos in &population[i] {
                    trace.record(pos, Phase::Visiting);
                }
                best = Some((fitnesses[i], population[i].clone()));
            }
        }

        if best
            .as_ref()
            .map_or(false, |(_, path)| path.last() == Some(&problem.goal))
        {
            break;
        }

        let mut next_population = (0..population.len())
            .sorted_by_key(|&i| fitnesses[i])
            .take(options.elite_size)
            .map(|i| population[i].clone())
            .collect_vec();

        while next_population.len() < options.population_size {
            let first = evolution.select_parent(&population, &fitnesses);
            let second = evolution.select_parent(&population, &fitnesses);

            let child = evolution.crossover(first, second);
            next_population.push(evolution.mutate(child));
        }

        population = next_population;
    }

    let best_path = match best {
        Some((_, path)) => path,
        None => return finish(None, trace),
    };

    debug!(
        generations = generations_run,
        best_length = best_path.len(),
        "evolution finished"
    );

    let found = best_path.last() == Some(&problem.goal);
    let recorded = trace.recorded();
    trace.keep_last(options.trace_limit);

    let mut result = finish(found.then_some(best_path), trace).with_nodes_explored(recorded);
    result.extras.generations = Some(generations_run);
    result
}
