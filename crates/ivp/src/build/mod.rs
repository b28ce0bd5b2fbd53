//! Builder: approximate an AOF with a piecewise-linear `PdMap`.
//!
//! Purpose
//! - Lay out a uniform partition, optionally re-partition chosen regions and
//!   points at a finer resolution, set plateau regions aside as whole pieces,
//!   fit every piece, then spend a cut budget on the pieces with the worst fit.
//!
//! Conventions
//! - Every stage keeps the partition invariant: each domain point lies in
//!   exactly one box.
//! - Stages that change geometry leave the grid stale; `refine` and `Builder`
//!   rebuild it once at the end.
//! - Box construction from continuous ranges returns `None` instead of an
//!   empty box. Misconfigured builds return `BuildError`.
//!
//! Layout
//! - `boxes.rs` (continuous ranges to boxes), `uniform.rs` (regular partition,
//!   plateaus), `queue.rs` (worklist), `smart.rs` (evaluation and error-driven
//!   cuts), `directed.rs` (region re-partition), `builder.rs` (the pipeline).

mod boxes;
mod builder;
mod directed;
mod queue;
mod smart;
mod uniform;

pub use boxes::{build_1d_box, build_2d_box, build_point_box, domain_to_box, unit_box_for_amount};
pub use builder::{BuildError, Builder, BuilderConfig, DirectedRegion, UnitSpec};
pub use directed::refine_directed;
pub use queue::RefineQueue;
pub use smart::{evaluate, evaluate_pinned, refine};
pub use uniform::{build_uniform, insert_plateaus, partition_region};
