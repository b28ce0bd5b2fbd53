//! End-to-end construction of a `PdMap` from an AOF.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::boxes::unit_box_for_amount;
use super::directed::refine_directed;
use super::smart::{evaluate_pinned, refine};
use super::uniform::{build_uniform, insert_plateaus};
use crate::cfg::{NORM_HIGH, NORM_LOW, SAMPLES_PER_DIM};
use crate::ivp_box::{Degree, Extent, IvpBox};
use crate::pdmap::PdMap;
use crate::regress::{Aof, Regressor};

/// Shape of the initial uniform pieces.
#[derive(Clone, Debug, PartialEq)]
pub enum UnitSpec {
    /// Aim for about this many pieces, split evenly over the dimensions.
    Amount(usize),
    /// Piece width in grid indices, one entry per domain variable.
    Extents(Vec<u32>),
}

/// Region to re-partition at a finer resolution before smart refinement.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectedRegion {
    pub region: IvpBox,
    pub unit: IvpBox,
}

/// Builder parameters.
///
/// The smart stage makes `max(refinement_budget, pieces * refine_percent / 100)`
/// cuts at most, where `pieces` is the count after the uniform, directed and
/// plateau stages.
#[derive(Clone, Debug, PartialEq)]
pub struct BuilderConfig {
    pub unit_box: UnitSpec,
    /// Grid cell extents, one per domain variable. Defaults to the unit box widths.
    pub grid_cell: Option<Vec<u32>>,
    pub refinement_budget: usize,
    pub refine_percent: f64,
    pub error_threshold: f64,
    pub degree: Degree,
    pub samples_per_dim: usize,
    pub refine_regions: Vec<DirectedRegion>,
    /// Point boxes that become pieces of their own.
    pub refine_points: Vec<IvpBox>,
    /// Regions kept as single pieces: fit once, never cut. They take precedence
    /// over directed regions and refine points they overlap.
    pub plateaus: Vec<IvpBox>,
    /// Rescale the result onto `[0, 100]`.
    pub normalize: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            unit_box: UnitSpec::Amount(1),
            grid_cell: None,
            refinement_budget: 0,
            refine_percent: 0.0,
            error_threshold: 0.0,
            degree: Degree::Linear,
            samples_per_dim: SAMPLES_PER_DIM,
            refine_regions: Vec::new(),
            refine_points: Vec::new(),
            plateaus: Vec::new(),
            normalize: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    EmptyDomain,
    BadUnitBox { reason: String },
    BadGridCell { reason: String },
    BadRegion { index: usize },
    BadRefinePoint { index: usize },
    BadPlateau { index: usize },
}

impl BuildError {
    fn unit(reason: impl Into<String>) -> Self {
        Self::BadUnitBox {
            reason: reason.into(),
        }
    }

    fn cell(reason: impl Into<String>) -> Self {
        Self::BadGridCell {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "domain has no variables"),
            Self::BadUnitBox { reason } => write!(f, "invalid unit box: {reason}"),
            Self::BadGridCell { reason } => write!(f, "invalid grid cell: {reason}"),
            Self::BadRegion { index } => write!(f, "refine region #{index} does not fit the domain"),
            Self::BadRefinePoint { index } => {
                write!(f, "refine point #{index} is not a point box inside the domain")
            }
            Self::BadPlateau { index } => write!(f, "plateau #{index} does not fit the domain"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Runs uniform, directed, plateau and smart refinement, then optional normalization.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    cfg: BuilderConfig,
}

impl Builder {
    pub fn new(cfg: BuilderConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.cfg
    }

    pub fn build<A: Aof + ?Sized>(&self, aof: &A) -> Result<PdMap, BuildError> {
        let cfg = &self.cfg;
        let domain = Arc::new(aof.domain().clone());
        if domain.is_empty() {
            return Err(BuildError::EmptyDomain);
        }

        let unit = match &cfg.unit_box {
            UnitSpec::Amount(n) => unit_box_for_amount(&domain, (*n).max(1))
                .ok_or_else(|| BuildError::unit("no unit box for amount"))?,
            UnitSpec::Extents(w) => {
                if w.len() != domain.size() {
                    return Err(BuildError::unit(format!(
                        "{} extents for {} variables",
                        w.len(),
                        domain.size()
                    )));
                }
                if w.contains(&0) {
                    return Err(BuildError::unit("zero-width extent"));
                }
                let extents = w
                    .iter()
                    .enumerate()
                    .map(|(k, &n)| Extent::new(k, 0, n - 1))
                    .collect();
                IvpBox::new(extents).ok_or_else(|| BuildError::unit("malformed extents"))?
            }
        };
        let mut map = build_uniform(domain.clone(), &unit, cfg.degree)
            .ok_or_else(|| BuildError::unit("empty uniform partition"))?;
        if let Some(cell) = &cfg.grid_cell {
            if cell.len() != domain.size() {
                return Err(BuildError::cell(format!(
                    "{} extents for {} variables",
                    cell.len(),
                    domain.size()
                )));
            }
            if cell.contains(&0) {
                return Err(BuildError::cell("zero-width extent"));
            }
            map.set_grid_cell(cell.clone());
        }

        for (index, r) in cfg.refine_regions.iter().enumerate() {
            map = refine_directed(&map, &r.region, &r.unit).ok_or(BuildError::BadRegion { index })?;
        }
        for (index, p) in cfg.refine_points.iter().enumerate() {
            let bad = BuildError::BadRefinePoint { index };
            if !p.is_point_box() {
                return Err(bad);
            }
            map = refine_directed(&map, p, p).ok_or(bad)?;
        }

        let universe = map.universe().ok_or(BuildError::EmptyDomain)?;
        if let Some(index) = cfg.plateaus.iter().position(|p| !p.contained_in(&universe)) {
            return Err(BuildError::BadPlateau { index });
        }
        let pinned_from = if cfg.plateaus.is_empty() {
            map.size()
        } else {
            let (with_plateaus, first) = insert_plateaus(&map, &cfg.plateaus)
                .ok_or(BuildError::BadPlateau { index: 0 })?;
            map = with_plateaus;
            first
        };

        let mut regressor = Regressor::new(aof, cfg.degree).with_samples(cfg.samples_per_dim);
        let mut queue = evaluate_pinned(&mut map, &mut regressor, pinned_from);

        let by_percent = (map.size() as f64 * cfg.refine_percent.max(0.0) / 100.0) as usize;
        let budget = cfg.refinement_budget.max(by_percent);
        let cuts = refine(&mut map, &mut queue, &mut regressor, budget, cfg.error_threshold);
        if cfg.normalize {
            map.normalize(NORM_LOW, NORM_HIGH);
        }
        if map.grid().is_none() {
            map.update_grid();
        }
        debug!(
            pieces = map.size(),
            plateaus = cfg.plateaus.len(),
            cuts,
            fits = regressor.total_fits(),
            evals = regressor.total_evals(),
            "built piecewise map"
        );
        Ok(map)
    }
}
