//! `invasion` binary.
//!
//! Logging comes up before argument parsing; stdout is buffered and flushed
//! only after the command succeeds. Any failure exits with status 1.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use invasion_cli::{
    cli::{Cli, CliError, run_cli},
    logging::init_logging,
};

fn execute() -> Result<()> {
    let cli = Cli::parse();
    let mut stdout = BufWriter::new(io::stdout().lock());
    run_cli(cli, &mut stdout).context("invasion command failed")?;
    stdout.flush().context("failed to flush stdout")
}

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        eprintln!("invasion: cannot configure logging: {err}");
        return ExitCode::FAILURE;
    }

    match execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map(CliError::code);
            error!(error = %format!("{err:#}"), code, "invasion aborted");
            ExitCode::FAILURE
        }
    }
}
