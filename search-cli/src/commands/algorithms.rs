use color_eyre::eyre::Result;
use search_lab::grid::catalogue;

use super::print_json;

#[derive(clap::Args, Debug)]
pub struct Algorithms {}

impl Algorithms {
    pub fn run(self, pretty: bool) -> Result<()> {
        print_json(&catalogue(), pretty)
    }
}
