//! Turn a tour over matrix indices back into graph nodes.

use thiserror::Error;

use crate::ErrorKind;
use crate::graph::NodeId;
use crate::matrix::PathMatrix;

/// Errors raised while reconstructing a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconstructError {
    /// The tour refers to an index outside the selection.
    #[error("tour index {index} is out of range for {size} nodes")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Selection size.
        size: usize,
    },
    /// Two distinct tour entries have no stored path between them.
    #[error("no stored path from index {from} to index {to}")]
    MissingPath {
        /// Leg start index.
        from: usize,
        /// Leg end index.
        to: usize,
    },
}

impl ReconstructError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOutOfRange { .. } => ErrorKind::Input,
            Self::MissingPath { .. } => ErrorKind::Topology,
        }
    }
}

/// A tour expressed over graph nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconstructedRoute {
    /// Selected node ids in visiting order.
    pub node_tour: Vec<NodeId>,
    /// Every graph node walked, with shared junctions listed once.
    pub full_path: Vec<NodeId>,
}

/// Map tour indices to the node ids they stand for.
///
/// # Examples
/// ```
/// use waypoint_core::map_indices;
///
/// let ids = map_indices(&[0, 2, 1, 0], &[10, 20, 30]).expect("indices in range");
/// assert_eq!(ids, vec![10, 30, 20, 10]);
/// ```
pub fn map_indices(tour: &[usize], node_ids: &[NodeId]) -> Result<Vec<NodeId>, ReconstructError> {
    tour.iter()
        .map(|&index| {
            node_ids
                .get(index)
                .copied()
                .ok_or(ReconstructError::IndexOutOfRange {
                    index,
                    size: node_ids.len(),
                })
        })
        .collect()
}

/// Concatenate the stored path of every tour leg.
///
/// The first node of each segment after the first is dropped when it repeats
/// the junction just written. A single-index tour yields the diagonal path.
pub fn splice(tour: &[usize], paths: &PathMatrix) -> Result<Vec<NodeId>, ReconstructError> {
    let out_of_range = |index| ReconstructError::IndexOutOfRange {
        index,
        size: paths.size(),
    };

    if let [only] = tour {
        return paths
            .get(*only, *only)
            .map(<[NodeId]>::to_vec)
            .ok_or_else(|| out_of_range(*only));
    }

    let mut full_path: Vec<NodeId> = Vec::new();
    for leg in tour.windows(2) {
        let &[from, to] = leg else { continue };
        let segment = paths
            .get(from, to)
            .ok_or_else(|| out_of_range(from.max(to)))?;
        let Some((&head, tail)) = segment.split_first() else {
            return Err(ReconstructError::MissingPath { from, to });
        };
        if full_path.last() != Some(&head) {
            full_path.push(head);
        }
        full_path.extend_from_slice(tail);
    }
    Ok(full_path)
}

/// Map and splice in one step.
///
/// # Examples
/// ```
/// use waypoint_core::{PathMatrix, reconstruct};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let paths = PathMatrix::from_rows(vec![
///     vec![vec![7], vec![7, 3, 9]],
///     vec![vec![9, 3, 7], vec![9]],
/// ])?;
/// let route = reconstruct(&[0, 1, 0], &[7, 9], &paths)?;
/// assert_eq!(route.node_tour, vec![7, 9, 7]);
/// assert_eq!(route.full_path, vec![7, 3, 9, 3, 7]);
/// # Ok(())
/// # }
/// ```
pub fn reconstruct(
    tour: &[usize],
    node_ids: &[NodeId],
    paths: &PathMatrix,
) -> Result<ReconstructedRoute, ReconstructError> {
    Ok(ReconstructedRoute {
        node_tour: map_indices(tour, node_ids)?,
        full_path: splice(tour, paths)?,
    })
}
