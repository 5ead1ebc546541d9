pub mod algorithms;
pub mod game;
pub mod grid;
pub mod puzzle;

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use algorithms::Algorithms;
use game::Game;
use grid::Grid;
use puzzle::Puzzle;

use clap::Subcommand;
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Find a path across a grid
    Grid(Grid),
    /// Solve an 8-puzzle, N-Queens or Sudoku
    Puzzle(Puzzle),
    /// Pick a move in Tic-Tac-Toe or Connect 4, or solve the Tower of Hanoi
    Game(Game),
    /// List the grid search algorithms
    Algorithms(Algorithms),
}

impl Command {
    pub fn run(self, pretty: bool) -> Result<()> {
        match self {
            Command::Grid(g) => g.run(pretty)?,
            Command::Puzzle(p) => p.run(pretty)?,
            Command::Game(g) => g.run(pretty)?,
            Command::Algorithms(a) => a.run(pretty)?,
        }

        Ok(())
    }
}

/// Reads a request from `path`, or from stdin when `path` is `-`
pub(crate) fn read_request(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .wrap_err("Couldn't read the request from stdin")?;
        return Ok(body);
    }

    fs::read_to_string(path).wrap_err_with(|| format!("Couldn't read {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .wrap_err("Couldn't serialize the result")?;

    println!("{json}");

    Ok(())
}
