use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use rand::{rngs::StdRng, SeedableRng};
use search_lab::{
    grid::GridSearchEngine,
    request::{parse, GridRequest},
};
use tracing::info;

use super::{print_json, read_request};

#[derive(clap::Args, Debug)]
pub struct Grid {
    /// Path to a JSON grid request, or `-` for stdin
    #[clap(short, long, value_parser)]
    request: PathBuf,

    /// Seed for the randomized algorithms. Uses system entropy if not specified
    #[clap(short, long, value_parser)]
    seed: Option<u64>,
}

impl Grid {
    pub fn run(self, pretty: bool) -> Result<()> {
        let request: GridRequest =
            parse(&read_request(&self.request)?).wrap_err("Invalid grid request")?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let result = request.run(&GridSearchEngine::default(), &mut rng)?;
        info!(
            algorithm = %request.algorithm,
            found = result.found,
            nodes_explored = result.nodes_explored,
            "grid search finished"
        );

        print_json(&result, pretty)
    }
}
