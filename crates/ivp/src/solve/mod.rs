//! Solver: best point of a weighted sum of piecewise maps.
//!
//! Purpose
//! - Search combinations of overlapping boxes, one map per level, instead of
//!   evaluating every domain point. Each level narrows the region inherited from
//!   the level above and adds the coefficients of the box it intersects.
//!
//! Conventions
//! - Maps are read-only here. Regions are owned values moved down the recursion,
//!   so concurrent solves over the same maps need no locking.
//! - Priority weights are already folded into each map's coefficients.
//! - Ties: a leaf replaces the incumbent only when strictly greater.
//! - Bound pruning adds the grid's cheap bound of every remaining level to the
//!   region's own maximum. At `optimality_pct = 100` the result equals the
//!   unpruned search.

mod search;
mod types;

pub use search::solve;
pub use types::{PriorityOrder, Solution, SolveError, SolveStats, SolverConfig};
