use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use search_lab::request::{parse, PuzzleRequest};

use super::{print_json, read_request};

#[derive(clap::Args, Debug)]
pub struct Puzzle {
    /// Path to a JSON puzzle request, or `-` for stdin
    #[clap(short, long, value_parser)]
    request: PathBuf,
}

impl Puzzle {
    pub fn run(self, pretty: bool) -> Result<()> {
        let request: PuzzleRequest =
            parse(&read_request(&self.request)?).wrap_err("Invalid puzzle request")?;

        let response = request
            .solve()
            .wrap_err_with(|| format!("Couldn't solve {}", request.puzzle_type))?;

        print_json(&response, pretty)
    }
}
