use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};
use search_lab::request::{parse, GameRequest};

use super::{print_json, read_request};

#[derive(clap::Args, Debug)]
pub struct Game {
    /// Path to a JSON game request, or `-` for stdin
    #[clap(short, long, value_parser)]
    request: PathBuf,
}

impl Game {
    pub fn run(self, pretty: bool) -> Result<()> {
        let request: GameRequest =
            parse(&read_request(&self.request)?).wrap_err("Invalid game request")?;

        let response = request
            .run()
            .wrap_err_with(|| format!("Couldn't run {}", request.game_type))?;

        print_json(&response, pretty)
    }
}
