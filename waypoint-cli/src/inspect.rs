//! Inspect command implementation for the waypoint CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypoint_data::{GraphExport, load_graph_file};

use crate::{ARG_GRAPH, ARG_OUTPUT, CliError, ENV_INSPECT_GRAPH, require_existing, write_json};

/// CLI arguments for the `inspect` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "inspect",
    long_about = "Load a graph description, recompute its edge weights and \
                 print the result as JSON.",
    about = "Print a graph with recomputed edge weights"
)]
#[ortho_config(prefix = "WAYPOINT")]
pub(crate) struct InspectArgs {
    /// Path to the JSON graph description.
    #[arg(long = ARG_GRAPH, value_name = "path")]
    #[serde(default)]
    pub(crate) graph: Option<Utf8PathBuf>,
    /// Write the export to this file instead of stdout.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

pub(crate) fn run_inspect_with(args: InspectArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let graph_path = merged.graph.ok_or(CliError::MissingArgument {
        field: ARG_GRAPH,
        env: ENV_INSPECT_GRAPH,
    })?;
    require_existing(&graph_path, ARG_GRAPH)?;
    let graph = load_graph_file(&graph_path).map_err(|source| CliError::LoadGraph {
        path: graph_path.clone(),
        source,
    })?;
    write_json(
        &GraphExport::from_graph(&graph),
        merged.output.as_deref(),
        writer,
    )
}
