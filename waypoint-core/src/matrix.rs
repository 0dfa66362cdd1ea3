//! Pairwise distance and path matrices over selected nodes.
//!
//! Row and column `i` of every matrix refer to `node_ids[i]` of the selection
//! the matrix was built for. A new selection needs a new matrix.

use std::collections::HashSet;
use std::iter::Sum;
use std::ops::Add;
use std::time::Instant;

use log::{debug, warn};
use thiserror::Error;

use crate::ErrorKind;
use crate::graph::{Graph, NodeId};
use crate::shortest_path::ShortestPathTree;

/// Length of a shortest path, or the absence of one.
///
/// Addition is absorbing: any sum involving [`Distance::Unreachable`] is
/// unreachable, so an impossible leg can never be mistaken for a cost.
///
/// # Examples
/// ```
/// use waypoint_core::Distance;
///
/// let leg = Distance::Reachable(2.5) + Distance::Reachable(1.5);
/// assert_eq!(leg, Distance::Reachable(4.0));
/// assert_eq!(leg + Distance::Unreachable, Distance::Unreachable);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Distance {
    /// A path exists with this length in metres.
    Reachable(f64),
    /// No path exists.
    Unreachable,
}

impl Distance {
    /// The length, if reachable.
    #[must_use]
    pub const fn metres(self) -> Option<f64> {
        match self {
            Self::Reachable(metres) => Some(metres),
            Self::Unreachable => None,
        }
    }

    /// Whether a path exists.
    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Reachable(_))
    }
}

impl From<Option<f64>> for Distance {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unreachable, Self::Reachable)
    }
}

impl Add for Distance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Reachable(a), Self::Reachable(b)) => Self::Reachable(a + b),
            _ => Self::Unreachable,
        }
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::Reachable(0.0), Add::add)
    }
}

/// Errors raised while building or validating matrices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// No nodes were selected.
    #[error("at least one node must be selected")]
    Empty,
    /// A selected node is missing from the graph.
    #[error("selected node {0} is not in the graph")]
    UnknownNode(NodeId),
    /// A node appears twice in the selection.
    #[error("node {0} is selected more than once")]
    DuplicateNode(NodeId),
    /// A row has the wrong length.
    #[error("row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows, which every row must match.
        expected: usize,
        /// Entries found in the row.
        found: usize,
    },
    /// A distance was negative or NaN.
    #[error("distance at ({row}, {column}) is invalid: {value}")]
    InvalidDistance {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        column: usize,
        /// Value supplied.
        value: f64,
    },
    /// A diagonal entry was not zero.
    #[error("diagonal entry {0} must be zero")]
    NonZeroDiagonal(usize),
}

impl MatrixError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Empty | Self::UnknownNode(_) => ErrorKind::Precondition,
            Self::DuplicateNode(_)
            | Self::NotSquare { .. }
            | Self::InvalidDistance { .. }
            | Self::NonZeroDiagonal(_) => ErrorKind::Input,
        }
    }
}

/// Dense `n×n` matrix of [`Distance`] values stored row-major.
///
/// # Examples
/// ```
/// use waypoint_core::{Distance, DistanceMatrix};
///
/// # fn main() -> Result<(), waypoint_core::MatrixError> {
/// let matrix = DistanceMatrix::from_metres(vec![
///     vec![0.0, 5.0],
///     vec![f64::INFINITY, 0.0],
/// ])?;
/// assert_eq!(matrix.get(0, 1), Some(Distance::Reachable(5.0)));
/// assert_eq!(matrix.get(1, 0), Some(Distance::Unreachable));
/// assert_eq!(matrix.get(2, 0), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    size: usize,
    data: Vec<Distance>,
}

impl DistanceMatrix {
    fn with_size(size: usize) -> Self {
        let mut data = vec![Distance::Unreachable; size * size];
        for index in 0..size {
            if let Some(cell) = data.get_mut(index * size + index) {
                *cell = Distance::Reachable(0.0);
            }
        }
        Self { size, data }
    }

    /// Build from rows where `None` marks an unreachable pair.
    pub fn from_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    expected: size,
                    found: entries.len(),
                });
            }
            for (column, entry) in entries.into_iter().enumerate() {
                data.push(validate_entry(row, column, entry)?);
            }
        }
        Ok(Self { size, data })
    }

    /// Build from rows of metres where `f64::INFINITY` marks an unreachable
    /// pair.
    pub fn from_metres(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|value| (value != f64::INFINITY).then_some(value))
                        .collect()
                })
                .collect(),
        )
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the matrix has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance from `from` to `to`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<Distance> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.data.get(from * self.size + to).copied()
    }

    fn set(&mut self, from: usize, to: usize, distance: Distance) {
        if let Some(cell) = self.data.get_mut(from * self.size + to) {
            *cell = distance;
        }
    }

    /// Whether `get(i, j) == get(j, i)` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| ((i + 1)..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

fn validate_entry(row: usize, column: usize, entry: Option<f64>) -> Result<Distance, MatrixError> {
    let Some(value) = entry else {
        if row == column {
            return Err(MatrixError::NonZeroDiagonal(row));
        }
        return Ok(Distance::Unreachable);
    };
    if value.is_nan() || value < 0.0 || value.is_infinite() {
        return Err(MatrixError::InvalidDistance { row, column, value });
    }
    if row == column && value != 0.0 {
        return Err(MatrixError::NonZeroDiagonal(row));
    }
    Ok(Distance::Reachable(value))
}

/// Shortest node sequences between selected nodes, parallel to a
/// [`DistanceMatrix`].
///
/// Diagonal entries hold the single node; unreachable pairs hold an empty
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMatrix {
    size: usize,
    data: Vec<Vec<NodeId>>,
}

impl PathMatrix {
    fn with_size(size: usize) -> Self {
        Self {
            size,
            data: vec![Vec::new(); size * size],
        }
    }

    /// Build from rows of paths.
    pub fn from_rows(rows: Vec<Vec<Vec<NodeId>>>) -> Result<Self, MatrixError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (row, entries) in rows.into_iter().enumerate() {
            if entries.len() != size {
                return Err(MatrixError::NotSquare {
                    row,
                    expected: size,
                    found: entries.len(),
                });
            }
            data.extend(entries);
        }
        Ok(Self { size, data })
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Path from `from` to `to`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Option<&[NodeId]> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.data.get(from * self.size + to).map(Vec::as_slice)
    }

    fn set(&mut self, from: usize, to: usize, path: Vec<NodeId>) {
        if let Some(cell) = self.data.get_mut(from * self.size + to) {
            *cell = path;
        }
    }
}

/// Distance and path matrices built for one node selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingMatrix {
    node_ids: Vec<NodeId>,
    distances: DistanceMatrix,
    paths: PathMatrix,
}

impl RoutingMatrix {
    /// Selected node identifiers, in matrix index order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Pairwise shortest distances.
    #[must_use]
    pub const fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Pairwise shortest paths.
    #[must_use]
    pub const fn paths(&self) -> &PathMatrix {
        &self.paths
    }

    /// Whether the matrix was built for exactly `node_ids`.
    #[must_use]
    pub fn is_built_for(&self, node_ids: &[NodeId]) -> bool {
        self.node_ids == node_ids
    }
}

/// Build distance and path matrices between `node_ids`.
///
/// Runs one shortest-path search per source and reads every target from it.
/// Pairs without a path get [`Distance::Unreachable`] and an empty path.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waypoint_core::{Distance, Graph, Node, build_matrix};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = Graph::new();
/// for (id, x) in [(0, 0.0), (1, 0.001), (2, 0.002)] {
///     graph.add_node(Node::new(id, Coord { x, y: 0.0 }))?;
/// }
/// graph.add_edge(0, 1)?;
/// graph.add_edge(1, 2)?;
///
/// let matrix = build_matrix(&graph, &[2, 0])?;
/// assert_eq!(matrix.paths().get(0, 1), Some(&[2, 1, 0][..]));
/// assert_eq!(matrix.distances().get(1, 1), Some(Distance::Reachable(0.0)));
/// # Ok(())
/// # }
/// ```
pub fn build_matrix(graph: &Graph, node_ids: &[NodeId]) -> Result<RoutingMatrix, MatrixError> {
    if node_ids.is_empty() {
        return Err(MatrixError::Empty);
    }
    let mut seen = HashSet::with_capacity(node_ids.len());
    for &id in node_ids {
        if !graph.contains(id) {
            return Err(MatrixError::UnknownNode(id));
        }
        if !seen.insert(id) {
            return Err(MatrixError::DuplicateNode(id));
        }
    }

    let started_at = Instant::now();
    let size = node_ids.len();
    let mut distances = DistanceMatrix::with_size(size);
    let mut paths = PathMatrix::with_size(size);

    for (i, &source) in node_ids.iter().enumerate() {
        let tree = ShortestPathTree::compute(graph, source);
        for (j, &target) in node_ids.iter().enumerate() {
            if i == j {
                paths.set(i, j, vec![source]);
                continue;
            }
            let distance = tree.distance_to(target);
            if !distance.is_reachable() {
                warn!("no path from node {source} to node {target}");
            }
            distances.set(i, j, distance);
            paths.set(i, j, tree.path_to(target).unwrap_or_default());
        }
    }

    debug!(
        "built {size}x{size} routing matrix in {:?}",
        started_at.elapsed()
    );
    Ok(RoutingMatrix {
        node_ids: node_ids.to_vec(),
        distances,
        paths,
    })
}
