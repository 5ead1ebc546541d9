use decorum::N64;
use rand::{seq::SliceRandom, Rng};

use super::{finish, GridProblem, GridResult};
use crate::{Phase, Trace};

/// Temperature schedule for simulated annealing
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use search_lab::grid::AnnealingOptions;
///
/// let defaults = AnnealingOptions::default();
///
/// assert_eq!(defaults.initial_temperature, 100.0);
/// assert_eq!(defaults.cooling_rate, 0.95);
/// assert_eq!(defaults.min_temperature, 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingOptions {
    pub initial_temperature: f64,
    /// The temperature is multiplied by this after every step, accepted or not
    pub cooling_rate: f64,
    /// The search stops once the temperature is at or below this
    pub min_temperature: f64,
}

impl AnnealingOptions {
    /// The temperature of every step, from the initial one down to just above the minimum
    pub fn temperatures(&self) -> impl Iterator<Item = f64> {
        let Self {
            initial_temperature,
            cooling_rate,
            min_temperature,
        } = *self;

        std::iter::successors(Some(initial_temperature), move |t| Some(t * cooling_rate))
            .take_while(move |&t| t > min_temperature)
    }
}

impl Default for AnnealingOptions {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.95,
            min_temperature: 0.01,
        }
    }
}

/// Greedily steps to the neighbor closest to the goal, giving up as soon as that isn't an
/// improvement
pub(super) fn hill_climbing(problem: &GridProblem, max_iterations: usize) -> GridResult {
    let mut current = problem.start;
    let mut trace = Trace::default();
    let mut path = vec![current];
    trace.record(current, Phase::Visiting);

    let mut iteration = 0;
    while current != problem.goal && iteration < max_iterations {
        let next = match problem
            .grid
            .neighbors(current)
            .into_iter()
            .min_by_key(|&n| N64::from(problem.h(n)))
        {
            Some(next) => next,
            None => break,
        };

        if problem.h(next) >= problem.h(current) {
            break;
        }

        current = next;
        path.push(current);
        trace.record(current, Phase::Visiting);
        iteration += 1;
    }

    finish((current == problem.goal).then_some(path), trace)
}

/// Random walk that always takes improving steps and takes worsening ones with probability
/// `exp(-Δ/T)`
pub(super) fn simulated_annealing<R: Rng + ?Sized>(
    problem: &GridProblem,
    options: &AnnealingOptions,
    rng: &mut R,
) -> GridResult {
    let mut current = problem.start;
    let mut trace = Trace::default();
    let mut path = vec![current];
    trace.record(current, Phase::Visiting);

    for temperature in options.temperatures() {
        if current == problem.goal {
            break;
        }

        let next = match problem.grid.neighbors(current).choose(rng) {
            Some(&next) => next,
            None => break,
        };

        let delta = problem.h(next) - problem.h(current);
        if delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp() {
            current = next;
            path.push(current);
            trace.record(current, Phase::Visiting);
        }
    }

    finish((current == problem.goal).then_some(path), trace)
}
