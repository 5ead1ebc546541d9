use rand::{rngs::StdRng, SeedableRng};
use search_lab::{
    grid::{Algorithm, GridProblem, GridSearchEngine},
    request::{parse, GridRequest},
};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn problem(json: &str) -> GridProblem {
    let request: GridRequest = parse(json).unwrap();
    request.problem().unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let engine = GridSearchEngine::default();

    for (name, json) in [
        ("maze_10x10", include_str!("../fixtures/maze_10x10.json")),
        ("split_5x5", include_str!("../fixtures/split_5x5.json")),
    ] {
        let problem = problem(json);

        for algorithm in [Algorithm::Astar, Algorithm::Bfs, Algorithm::Genetic] {
            c.bench_function(&format!("{algorithm} {name}"), |b| {
                let mut rng = StdRng::seed_from_u64(42);

                b.iter(|| {
                    let problem = black_box(&problem);
                    engine.run_algorithm(algorithm, problem, &mut rng)
                })
            });
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
