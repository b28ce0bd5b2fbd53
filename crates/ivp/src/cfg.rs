//! Numeric defaults for building and solving (internal).
//!
//! Policy
//! - Defaults are fixed constants so call sites stay free of magic numbers. The
//!   public config structs (`BuilderConfig`, `SolverConfig`) start from these.

/// Lattice samples per non-degenerate box dimension used by the regressor.
pub(crate) const SAMPLES_PER_DIM: usize = 3;
/// Singular-value cutoff for the least-squares solve in the regressor.
pub(crate) const LSQ_EPS: f64 = 1e-12;
/// Value range used when a built function is normalized.
pub(crate) const NORM_LOW: f64 = 0.0;
pub(crate) const NORM_HIGH: f64 = 100.0;
/// Optimality threshold (percent of global optimum) that guarantees the exact optimum.
pub(crate) const EXACT_PCT: f64 = 100.0;
/// Upper limit on grid cells per map; coarser cells are used beyond it.
pub(crate) const MAX_GRID_CELLS: usize = 1 << 20;
