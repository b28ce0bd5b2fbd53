//! Interval programming: piecewise-linear objective functions and a solver for
//! their weighted sum.
//!
//! Flow
//! - Describe the decision space as a `Domain` of named, discretized variables.
//! - Build one `PdMap` per objective with `build::Builder` (uniform pieces, then
//!   refinement of the worst-fitting pieces) from any `regress::Aof`.
//! - Weight each map by its priority and hand the list to `solve::solve`.
//!
//! Everything is synchronous and single-threaded. Maps are mutated only while
//! being built; the solver reads them.

mod cfg;

pub mod api;
pub mod build;
pub mod domain;
pub mod ivp_box;
pub mod pdmap;
pub mod regress;
pub mod solve;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use domain::{Domain, DomainError, Snap};
pub use ivp_box::{Degree, Extent, IvpBox};
pub use pdmap::PdMap;

/// Common exports for one decision cycle.
pub mod prelude {
    pub use crate::build::{Builder, BuilderConfig, UnitSpec};
    pub use crate::domain::{Domain, Snap};
    pub use crate::ivp_box::{Degree, IvpBox};
    pub use crate::pdmap::PdMap;
    pub use crate::regress::{Aof, FnAof};
    pub use crate::solve::{solve, PriorityOrder, Solution, SolverConfig};
}

#[cfg(test)]
mod tests;
