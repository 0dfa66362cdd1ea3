//! Error types emitted by the waypoint CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`. Messages describe one layer only; the binary prints
//! the whole `source()` chain.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waypoint_core::SessionError;
use waypoint_data::{GraphFileError, WaypointFileError};

/// Errors emitted by the waypoint CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path as configured.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The graph description could not be loaded.
    #[error("failed to load graph from {path:?}")]
    LoadGraph {
        /// Graph file path.
        path: Utf8PathBuf,
        /// Loader error.
        #[source]
        source: GraphFileError,
    },
    /// The waypoint list could not be loaded.
    #[error("failed to load waypoints from {path:?}")]
    LoadWaypoints {
        /// Waypoint file path.
        path: Utf8PathBuf,
        /// Loader error.
        #[source]
        source: WaypointFileError,
    },
    /// A planning step failed.
    #[error("planning failed")]
    Plan {
        /// Session error, including the wrapped cause.
        #[source]
        source: SessionError,
    },
    /// Serialising the command output failed.
    #[error("failed to serialise output")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output")]
    WriteOutput(#[source] std::io::Error),
}

impl From<SessionError> for CliError {
    fn from(source: SessionError) -> Self {
        Self::Plan { source }
    }
}
