//! Tours over matrix indices and the strategies that produce them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::matrix::{Distance, DistanceMatrix};

/// Tour-search strategy.
///
/// # Examples
/// ```
/// use waypoint_core::Strategy;
///
/// let strategy: Strategy = "held-karp".parse().expect("known alias");
/// assert_eq!(strategy, Strategy::DynamicProgramming);
/// assert_eq!(strategy.as_str(), "dynamic_programming");
/// assert_eq!(strategy.to_string(), "Dynamic Programming");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Exhaustive permutation search.
    #[cfg_attr(feature = "serde", serde(alias = "brute-force", alias = "bruteforce"))]
    BruteForce,
    /// Held–Karp bitmask dynamic programming.
    #[cfg_attr(
        feature = "serde",
        serde(
            alias = "dynamic-programming",
            alias = "dynamic",
            alias = "held-karp",
            alias = "held_karp"
        )
    )]
    DynamicProgramming,
    /// Nearest-neighbour construction.
    #[cfg_attr(
        feature = "serde",
        serde(alias = "nearest-neighbour", alias = "nearest_neighbour")
    )]
    Greedy,
}

impl Strategy {
    /// Every strategy, exact ones first.
    pub const ALL: [Self; 3] = [Self::BruteForce, Self::DynamicProgramming, Self::Greedy];

    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BruteForce => "brute_force",
            Self::DynamicProgramming => "dynamic_programming",
            Self::Greedy => "greedy",
        }
    }

    /// Human-readable name for reports.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BruteForce => "Brute Force",
            Self::DynamicProgramming => "Dynamic Programming",
            Self::Greedy => "Greedy",
        }
    }

    /// Whether the strategy always finds a minimum-cost tour.
    #[must_use]
    pub const fn is_exact(self) -> bool {
        !matches!(self, Self::Greedy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}`; expected brute_force, dynamic_programming or greedy")]
pub struct StrategyParseError(pub String);

impl FromStr for Strategy {
    type Err = StrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute_force" | "brute-force" | "bruteforce" => Ok(Self::BruteForce),
            "dynamic_programming" | "dynamic-programming" | "dynamic" | "held-karp"
            | "held_karp" => Ok(Self::DynamicProgramming),
            "greedy" | "nearest-neighbour" | "nearest_neighbour" => Ok(Self::Greedy),
            _ => Err(StrategyParseError(s.to_owned())),
        }
    }
}

/// Closed walk over matrix indices.
///
/// A tour for `n` indices has `n + 1` entries and returns to its first index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Wrap a sequence of indices.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The tour of a single index: `[start, start]`.
    #[must_use]
    pub fn trivial(start: usize) -> Self {
        Self(vec![start, start])
    }

    /// Close an open visiting order by returning to its first index.
    ///
    /// # Examples
    /// ```
    /// use waypoint_core::Tour;
    ///
    /// let tour = Tour::closed(vec![2, 0, 1]);
    /// assert_eq!(tour.indices(), &[2, 0, 1, 2]);
    /// ```
    #[must_use]
    pub fn closed(mut order: Vec<usize>) -> Self {
        if let Some(&first) = order.first() {
            order.push(first);
        }
        Self(order)
    }

    /// Indices in visiting order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of entries, including the closing index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tour has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of consecutive leg distances in `matrix`.
    ///
    /// Returns `None` when an index is outside the matrix.
    ///
    /// # Examples
    /// ```
    /// use waypoint_core::{Distance, DistanceMatrix, Tour};
    ///
    /// # fn main() -> Result<(), waypoint_core::MatrixError> {
    /// let matrix = DistanceMatrix::from_metres(vec![
    ///     vec![0.0, 2.0, 9.0],
    ///     vec![2.0, 0.0, 3.0],
    ///     vec![9.0, 3.0, 0.0],
    /// ])?;
    /// let tour = Tour::new(vec![0, 1, 2, 0]);
    /// assert_eq!(tour.cost(&matrix), Some(Distance::Reachable(14.0)));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn cost(&self, matrix: &DistanceMatrix) -> Option<Distance> {
        self.0
            .windows(2)
            .map(|leg| match leg {
                [from, to] => matrix.get(*from, *to),
                _ => None,
            })
            .sum()
    }

    /// Consume the tour, yielding its indices.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Tour {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Output of a solver run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TourResult {
    /// Visiting order, closed at the start index.
    pub tour: Tour,
    /// Sum of leg distances in metres.
    pub total_cost: f64,
    /// Strategy that produced the tour.
    pub strategy: Strategy,
    /// Wall-clock time spent solving.
    pub solve_time: Duration,
}
