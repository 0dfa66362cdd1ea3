//! File formats for the waypoint planner.
//!
//! Responsibilities:
//! - Load JSON road-graph descriptions into a [`waypoint_core::Graph`].
//! - Parse plain-text waypoint lists, reporting malformed lines.
//! - Export a graph, including inserted waypoints, as serialisable JSON.
//!
//! Boundaries:
//! - Do not encode planning rules (live in `waypoint-core`).
//! - File access goes through `waypoint-fs`.
//!
//! Invariants:
//! - Coordinates are read as `lat`/`lon` and stored with `x = lon`,
//!   `y = lat`.
//! - Edge weights are recomputed from coordinates, never trusted from input.

mod export;
mod graph_file;
mod waypoints;

pub use export::{EdgeExport, GraphExport, NodeExport};
pub use graph_file::{GraphFileError, load_graph_file, parse_graph_description};
pub use waypoints::{
    LineError, SkippedLine, WaypointFileError, WaypointReport, load_waypoints_file,
    parse_waypoints,
};
