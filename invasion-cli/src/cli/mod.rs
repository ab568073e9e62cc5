//! Command-line interface for the invasion simulator.
//!
//! `simulate` replays an invasion over a map file and `generate` writes a
//! random map. Both accept an explicit seed so runs can be reproduced.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GenerateCommand, SimulateCommand, run_cli,
};
