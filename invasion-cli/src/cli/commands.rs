//! Command implementations and argument parsing for the invasion CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};
use invasion_core::{DecodeError, InvasionBuilder, RoutingGraph, RunSummary, generate_map};
use rand::{SeedableRng, rngs::SmallRng};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_ALIENS: usize = 100;
const DEFAULT_MOVES: usize = 10_000;
const DEFAULT_CITIES: usize = 100;
const DEFAULT_ROUTES: usize = 50;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "invasion", about = "Simulate an alien invasion over a map of cities.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run an invasion over a map, printing destroyed cities and the
    /// surviving map.
    Simulate(SimulateCommand),
    /// Write a random map.
    Generate(GenerateCommand),
}

/// Options accepted by the `simulate` command.
#[derive(Debug, Args, Clone)]
pub struct SimulateCommand {
    /// Map file to invade.
    pub map: PathBuf,

    /// Number of aliens to land.
    #[arg(short = 'n', long, default_value_t = DEFAULT_ALIENS)]
    pub aliens: usize,

    /// Turns each alien may take.
    #[arg(short, long, default_value_t = DEFAULT_MOVES)]
    pub moves: usize,

    /// Seed for the random source; derived from the clock when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the surviving map here (truncating) instead of to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of cities.
    #[arg(short, long, default_value_t = DEFAULT_CITIES)]
    pub cities: usize,

    /// Number of routes; a route and its inverse count once.
    #[arg(short, long, default_value_t = DEFAULT_ROUTES)]
    pub routes: usize,

    /// Seed for the random source; derived from the clock when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the map here (truncating) instead of to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The map file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Open {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The map file is not a valid map.
    #[error("failed to decode `{path}`: {source}")]
    Decode {
        /// Path of the map.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },
    /// The output file could not be created.
    #[error("failed to create `{path}`: {source}")]
    Create {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Writing events or a map failed.
    #[error("failed to write output: {source}")]
    Output {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Stable machine-readable code for logs.
    ///
    /// Decode failures report the map format code when there is one.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "CLI_OPEN_MAP",
            Self::Decode { source, .. } => source
                .format_code()
                .map_or_else(|| source.code().as_str(), |code| code.as_str()),
            Self::Create { .. } => "CLI_CREATE_OUTPUT",
            Self::Output { .. } => "CLI_WRITE_OUTPUT",
        }
    }
}

/// Outcome of a CLI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionSummary {
    /// An invasion ran to completion.
    Simulated {
        /// Seed that drove the run.
        seed: u64,
        /// Totals reported by the engine.
        summary: RunSummary,
    },
    /// A map was generated.
    Generated {
        /// Seed that drove generation.
        seed: u64,
        /// Cities on the generated map.
        cities: usize,
    },
}

/// Executes the command represented by `cli`, writing events and maps that
/// have no `--out` path to `stdout`.
///
/// # Errors
/// Returns [`CliError`] when reading the map or writing output fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use invasion_cli::cli::{Cli, Command, ExecutionSummary, GenerateCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         cities: 3,
///         routes: 2,
///         seed: Some(7),
///         out: None,
///     }),
/// };
/// let mut stdout = Vec::new();
/// let summary = run_cli(cli, &mut stdout)?;
/// assert_eq!(summary, ExecutionSummary::Generated { seed: 7, cities: 3 });
/// assert_eq!(String::from_utf8(stdout)?.lines().count(), 3);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip_all, fields(command = field::Empty))]
pub fn run_cli<W: Write>(cli: Cli, stdout: W) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Simulate(command) => {
            span.record("command", field::display("simulate"));
            run_simulate(command, stdout)
        }
        Command::Generate(command) => {
            span.record("command", field::display("generate"));
            run_generate(command, stdout)
        }
    }
}

#[instrument(
    name = "cli.simulate",
    err,
    skip_all,
    fields(
        map = %command.map.display(),
        aliens = command.aliens,
        moves = command.moves,
        seed = field::Empty,
    ),
)]
pub(super) fn run_simulate<W: Write>(
    command: SimulateCommand,
    mut stdout: W,
) -> Result<ExecutionSummary, CliError> {
    let seed = resolve_seed(command.seed);
    let graph = read_map(&command.map)?;
    info!(seed, cities = graph.len(), "starting invasion");

    let mut invasion = InvasionBuilder::new()
        .with_aliens(command.aliens)
        .with_max_moves(command.moves)
        .build(graph, SmallRng::seed_from_u64(seed));
    let summary = invasion
        .run(&mut stdout)
        .map_err(|source| CliError::Output { source })?;
    write_map(invasion.graph(), command.out.as_deref(), stdout)?;

    info!(
        destroyed = summary.cities_destroyed,
        remaining = summary.cities_remaining,
        "command completed"
    );
    Ok(ExecutionSummary::Simulated { seed, summary })
}

#[instrument(
    name = "cli.generate",
    err,
    skip_all,
    fields(cities = command.cities, routes = command.routes, seed = field::Empty),
)]
pub(super) fn run_generate<W: Write>(
    command: GenerateCommand,
    stdout: W,
) -> Result<ExecutionSummary, CliError> {
    let seed = resolve_seed(command.seed);
    info!(seed, "generating map");
    let graph = generate_map(
        &mut SmallRng::seed_from_u64(seed),
        command.cities,
        command.routes,
    );
    write_map(&graph, command.out.as_deref(), stdout)?;
    info!(cities = graph.len(), "command completed");
    Ok(ExecutionSummary::Generated {
        seed,
        cities: graph.len(),
    })
}

/// Uses `explicit` when given, otherwise derives a seed from the clock, and
/// records the choice on the current span.
pub(super) fn resolve_seed(explicit: Option<u64>) -> u64 {
    let seed = explicit.unwrap_or_else(clock_seed);
    Span::current().record("seed", seed);
    seed
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed.as_secs().rotate_left(32) ^ u64::from(elapsed.subsec_nanos())
        })
}

#[instrument(name = "cli.read_map", err, fields(path = %path.display()))]
pub(super) fn read_map(path: &Path) -> Result<RoutingGraph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    RoutingGraph::decode(BufReader::new(file)).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `graph` to `out`, truncating it and syncing it to disk, or to
/// `stdout` when no path is given.
pub(super) fn write_map<W: Write>(
    graph: &RoutingGraph,
    out: Option<&Path>,
    mut stdout: W,
) -> Result<(), CliError> {
    let output = |source| CliError::Output { source };
    let Some(path) = out else {
        graph.write_to(&mut stdout).map_err(output)?;
        return stdout.flush().map_err(output);
    };

    let file = File::create(path).map_err(|source| CliError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let written = graph.write_to(&mut writer).map_err(output)?;
    let file = writer
        .into_inner()
        .map_err(|err| CliError::Output {
            source: err.into_error(),
        })?;
    file.sync_all().map_err(output)?;
    info!(path = %path.display(), bytes = written, "map written");
    Ok(())
}
