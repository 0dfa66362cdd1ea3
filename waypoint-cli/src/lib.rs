//! Command-line interface for the waypoint planner.
//!
//! `waypoint plan` loads a road graph and a waypoint list, solves a closed
//! tour with the chosen strategy and prints it as JSON. `waypoint inspect`
//! prints the loaded graph in export form.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod error;
mod inspect;
mod plan;

pub use error::CliError;

use inspect::{InspectArgs, run_inspect_with};
use plan::{PlanArgs, run_plan_with};

pub(crate) const ARG_GRAPH: &str = "graph";
pub(crate) const ARG_POINTS: &str = "points";
pub(crate) const ARG_STRATEGY: &str = "strategy";
pub(crate) const ARG_START_INDEX: &str = "start-index";
pub(crate) const ARG_BRUTE_FORCE_MAX_NODES: &str = "brute-force-max-nodes";
pub(crate) const ARG_DYNAMIC_PROGRAMMING_MAX_NODES: &str = "dynamic-programming-max-nodes";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_PLAN_GRAPH: &str = "WAYPOINT_CMDS_PLAN_GRAPH";
pub(crate) const ENV_PLAN_POINTS: &str = "WAYPOINT_CMDS_PLAN_POINTS";
pub(crate) const ENV_INSPECT_GRAPH: &str = "WAYPOINT_CMDS_INSPECT_GRAPH";

/// Run the waypoint CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli, &mut stdout)
}

fn dispatch(cli: Cli, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Plan(args) => run_plan_with(args, writer),
        Command::Inspect(args) => run_inspect_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "waypoint",
    about = "Plan closed tours through waypoints on a road graph",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a tour through the waypoints in a points file.
    Plan(PlanArgs),
    /// Print a graph description with recomputed edge weights.
    Inspect(InspectArgs),
}

/// Check that a configured input exists and is a regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match waypoint_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) if path.exists() => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Pretty-print `payload` as JSON to `output`, or to `writer` when no output
/// path is configured.
fn write_json<T: Serialize>(
    payload: &T,
    output: Option<&Utf8Path>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut json = serde_json::to_string_pretty(payload).map_err(CliError::SerialiseOutput)?;
    json.push('\n');
    match output {
        Some(path) => waypoint_fs::write_utf8_file(path, &json).map_err(CliError::WriteOutput),
        None => writer
            .write_all(json.as_bytes())
            .map_err(CliError::WriteOutput),
    }
}

#[cfg(test)]
mod tests;
