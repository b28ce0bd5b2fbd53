//! Depth-first search over box intersections, one level per map.

use tracing::{debug, trace};

use super::types::{PriorityOrder, Solution, SolveError, SolveStats, SolverConfig};
use crate::cfg::EXACT_PCT;
use crate::ivp_box::{Degree, IvpBox};
use crate::pdmap::PdMap;

/// Domain point maximizing the summed value of `maps`.
///
/// `Ok(None)` for an empty list or when any map has no boxes. Exact ties keep
/// the region found first (level-0 boxes in index order, then overlap order).
/// A covered `initial_solution` counts as found before every region.
pub fn solve(maps: &[&PdMap], cfg: &SolverConfig) -> Result<Option<Solution>, SolveError> {
    if maps.is_empty() {
        return Ok(None);
    }
    if !(cfg.optimality_pct > 0.0 && cfg.optimality_pct <= EXACT_PCT) {
        return Err(SolveError::BadOptimality {
            pct: cfg.optimality_pct,
        });
    }
    let domain = maps[0].domain();
    if let Some(index) = maps
        .iter()
        .position(|m| !std::sync::Arc::ptr_eq(m.domain(), domain) && **m.domain() != **domain)
    {
        return Err(SolveError::DomainMismatch { index });
    }
    let order = resolve_order(&cfg.priority_order, maps)?;
    if maps.iter().any(|m| m.is_empty()) {
        return Ok(None);
    }
    let levels: Vec<&PdMap> = order.iter().map(|&i| maps[i]).collect();

    let mut runner = SearchRunner::new(&levels, cfg);
    let seeded = cfg
        .initial_solution
        .as_deref()
        .is_some_and(|p| runner.seed(p));
    let found = runner.solve();
    debug!(
        maps = levels.len(),
        seeded,
        leaves = runner.stats.leaves_visited,
        pruned = runner.stats.nodes_pruned,
        intersections = runner.stats.intersections,
        value = found.as_ref().map(|(v, _)| *v),
        "solve finished"
    );
    Ok(found.map(|(value, region)| Solution {
        point: region.max_point(),
        value,
        stats: runner.stats,
    }))
}

pub(super) fn resolve_order(order: &PriorityOrder, maps: &[&PdMap]) -> Result<Vec<usize>, SolveError> {
    let n = maps.len();
    match order {
        PriorityOrder::AsGiven => Ok((0..n).collect()),
        PriorityOrder::ByMaxWeight => {
            let wt = |i: usize| maps[i].max_wt().unwrap_or(f64::NEG_INFINITY);
            let mut ixs: Vec<usize> = (0..n).collect();
            ixs.sort_by(|&a, &b| wt(b).total_cmp(&wt(a)));
            Ok(ixs)
        }
        PriorityOrder::Explicit(perm) => {
            if perm.len() != n {
                return Err(SolveError::order(format!(
                    "{} entries for {n} maps",
                    perm.len()
                )));
            }
            let mut seen = vec![false; n];
            for &i in perm {
                match seen.get_mut(i) {
                    Some(s) if !*s => *s = true,
                    Some(_) => return Err(SolveError::order(format!("map {i} listed twice"))),
                    None => return Err(SolveError::order(format!("map {i} out of range"))),
                }
            }
            Ok(perm.clone())
        }
    }
}

/// Region accumulated so far: extents narrowed by every level, coefficients summed.
fn as_region(b: &IvpBox, degree: Degree) -> IvpBox {
    let mut r = b.clone();
    if degree == Degree::Constant {
        r.slopes.iter_mut().for_each(|s| *s = 0.0);
    }
    r
}

struct SearchRunner<'a> {
    levels: &'a [&'a PdMap],
    prune: bool,
    /// `100 / pct - 1`; zero for an exact search.
    slack: f64,
    best: Option<(f64, IvpBox)>,
    stats: SolveStats,
}

impl<'a> SearchRunner<'a> {
    fn new(levels: &'a [&'a PdMap], cfg: &SolverConfig) -> Self {
        Self {
            levels,
            prune: cfg.use_bound_prune,
            slack: EXACT_PCT / cfg.optimality_pct - 1.0,
            best: None,
            stats: SolveStats::default(),
        }
    }

    /// Install `point` as the incumbent if every level covers it.
    fn seed(&mut self, point: &[u32]) -> bool {
        let mut value = 0.0;
        for m in self.levels {
            match m.eval_point(point) {
                Some(v) => value += v,
                None => return false,
            }
        }
        let coords: Vec<(usize, u32)> = point.iter().copied().enumerate().collect();
        let Some(mut region) = IvpBox::point(&coords) else {
            return false;
        };
        region.intercept = value;
        trace!(value, "seeded incumbent");
        self.best = Some((value, region));
        true
    }

    fn solve(&mut self) -> Option<(f64, IvpBox)> {
        let top = self.levels[0];
        for b in top.boxes() {
            self.recur(1, as_region(b, top.degree()));
        }
        self.best.take()
    }

    /// Upper bound on any completion of `region` from `level` on.
    fn bound(&self, level: usize, region: &IvpBox) -> f64 {
        self.levels[level..]
            .iter()
            .fold(region.max_val(), |acc, m| acc + m.cheap_bound(region))
    }

    fn beats_incumbent(&self, value: f64) -> bool {
        match &self.best {
            None => true,
            Some((best, _)) => value > *best + self.slack * best.abs(),
        }
    }

    fn recur(&mut self, level: usize, region: IvpBox) {
        if level == self.levels.len() {
            self.stats.leaves_visited += 1;
            let value = region.max_val();
            let better = match &self.best {
                None => true,
                Some((best, _)) => value > *best,
            };
            if better {
                trace!(value, "new incumbent");
                self.best = Some((value, region));
            }
            return;
        }
        if self.prune && self.best.is_some() && !self.beats_incumbent(self.bound(level, &region)) {
            self.stats.nodes_pruned += 1;
            return;
        }
        let map = self.levels[level];
        for ix in map.boxes_overlapping(&region) {
            let Some(b) = map.box_at(ix) else {
                continue;
            };
            self.stats.intersections += 1;
            if let Some(next) = region.intersect_as(b, map.degree()) {
                self.recur(level + 1, next);
            }
        }
    }
}
