//! Command handlers for the RDR CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod completions;
pub mod config;
pub mod inspect;
pub mod reconstruct;

use anyhow::Result;
use std::io::BufReader;

use rdr::Replay;

/// Load a replay from a path, or from stdin when the path is `-`.
pub fn load_replay(file: &str) -> Result<Replay> {
    if file == "-" {
        Replay::parse_reader(BufReader::new(std::io::stdin().lock()))
    } else {
        Replay::load(file)
    }
}
