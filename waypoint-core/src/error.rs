//! Coarse classification shared by the planner's error types.

/// The class of failure behind an error.
///
/// A service boundary can map each class to a structured response without
/// matching on every concrete variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Required state is missing or stale, or an argument is out of range.
    Precondition,
    /// The graph cannot satisfy the request, e.g. a pair is unreachable.
    Topology,
    /// The request exceeds a configured size ceiling.
    Size,
    /// The caller supplied malformed input.
    Input,
}
