//! Solver configuration, result, and error types.

use std::fmt;

use crate::cfg::EXACT_PCT;
use crate::domain::Domain;

/// Order in which maps become search levels (first = level 0).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PriorityOrder {
    #[default]
    AsGiven,
    /// A permutation of `0..maps.len()`; `Explicit(vec![2, 0, 1])` searches map 2 first.
    Explicit(Vec<usize>),
    /// Highest `max_wt` first; equal weights keep the given order.
    ByMaxWeight,
}

/// Knobs for `solve`.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    pub priority_order: PriorityOrder,
    /// Skip branches whose upper bound cannot beat the incumbent.
    pub use_bound_prune: bool,
    /// Accept a result within this percentage of the optimum, in `(0, 100]`.
    /// At 100 the search is exact.
    pub optimality_pct: f64,
    /// Domain point whose summed value seeds the incumbent before the search.
    /// Ignored unless every map covers it.
    pub initial_solution: Option<Vec<u32>>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            priority_order: PriorityOrder::AsGiven,
            use_bound_prune: true,
            optimality_pct: EXACT_PCT,
            initial_solution: None,
        }
    }
}

/// Search counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub leaves_visited: u64,
    pub nodes_pruned: u64,
    pub intersections: u64,
}

/// Best discrete point and its summed value.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// One grid index per domain variable.
    pub point: Vec<u32>,
    pub value: f64,
    pub stats: SolveStats,
}

impl Solution {
    /// Continuous value of variable `name` at the solution point.
    pub fn value_of(&self, domain: &Domain, name: &str) -> Option<f64> {
        let ix = domain.index_of(name)?;
        domain.value_at(ix, *self.point.get(ix)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Map `index` (in the caller's order) is built over a different domain than map 0.
    DomainMismatch { index: usize },
    BadPriorityOrder { reason: String },
    BadOptimality { pct: f64 },
}

impl SolveError {
    pub(crate) fn order(reason: impl Into<String>) -> Self {
        Self::BadPriorityOrder {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DomainMismatch { index } => {
                write!(f, "map #{index} does not share the domain of map #0")
            }
            Self::BadPriorityOrder { reason } => write!(f, "invalid priority order: {reason}"),
            Self::BadOptimality { pct } => {
                write!(f, "optimality percentage {pct} is outside (0, 100]")
            }
        }
    }
}

impl std::error::Error for SolveError {}
