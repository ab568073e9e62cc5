//! Support library for the invasion CLI binary.
//!
//! Re-exports the CLI and logging modules so doctests and tests can exercise
//! the commands without forking a subprocess.

pub mod cli;
pub mod logging;
