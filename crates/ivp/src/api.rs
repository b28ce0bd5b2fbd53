//! Flat re-export of the public surface.
//!
//! Prefer these paths in callers that touch several subsystems at once.

// Decision space and pieces
pub use crate::domain::{Domain, DomainError, DomainVar, Snap};
pub use crate::ivp_box::{Degree, Extent, IvpBox};
// Piecewise maps
pub use crate::pdmap::{BoxIter, Grid, PdMap};
// Fitting
pub use crate::regress::{Aof, FnAof, Regressor};
// Construction
pub use crate::build::{
    build_1d_box, build_2d_box, build_point_box, build_uniform, domain_to_box, evaluate,
    evaluate_pinned, insert_plateaus, partition_region, refine, refine_directed,
    unit_box_for_amount, BuildError, Builder, BuilderConfig, DirectedRegion, RefineQueue,
    UnitSpec,
};
// Solving
pub use crate::solve::{solve, PriorityOrder, Solution, SolveError, SolveStats, SolverConfig};
