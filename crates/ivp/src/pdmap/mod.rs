//! Piecewise-defined map (PdMap): one approximated objective function.
//!
//! Purpose
//! - Own the boxes of one piecewise function in an append-only arena plus the
//!   `Grid` that answers "which boxes overlap this region".
//!
//! Contract
//! - The boxes partition the domain (no gaps, no overlaps). The builder keeps
//!   this invariant; `PdMap` itself does not check it outside `is_partition`.
//! - Any mutable access (`append`, `box_at_mut`, weighting) drops the grid.
//!   Until `update_grid` runs again, overlap queries fall back to a linear scan.
//! - Indices are stable: boxes are never removed or reordered.

mod grid;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::domain::Domain;
use crate::ivp_box::{Degree, Extent, IvpBox};

pub use grid::Grid;

/// Iterator over box indices returned by overlap queries.
pub type BoxIter = std::vec::IntoIter<usize>;

/// Piecewise function over a shared domain.
#[derive(Clone, Debug)]
pub struct PdMap {
    domain: Arc<Domain>,
    boxes: Vec<IvpBox>,
    degree: Degree,
    grid_cell: Option<Vec<u32>>,
    grid: Option<Grid>,
}

impl PdMap {
    pub fn new(domain: Arc<Domain>, degree: Degree) -> Self {
        Self {
            domain,
            boxes: Vec::new(),
            degree,
            grid_cell: None,
            grid: None,
        }
    }

    pub fn with_boxes(domain: Arc<Domain>, degree: Degree, boxes: Vec<IvpBox>) -> Self {
        Self {
            boxes,
            ..Self::new(domain, degree)
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    #[inline]
    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    #[inline]
    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn boxes(&self) -> &[IvpBox] {
        &self.boxes
    }

    pub fn box_at(&self, ix: usize) -> Option<&IvpBox> {
        self.boxes.get(ix)
    }

    pub fn box_at_mut(&mut self, ix: usize) -> Option<&mut IvpBox> {
        self.grid = None;
        self.boxes.get_mut(ix)
    }

    /// Append a box and return its index.
    pub fn append(&mut self, b: IvpBox) -> usize {
        self.grid = None;
        self.boxes.push(b);
        self.boxes.len() - 1
    }

    /// Box spanning the whole domain (no coefficients).
    pub fn universe(&self) -> Option<IvpBox> {
        IvpBox::universe(&self.domain)
    }

    /// Cell extents used by the next `update_grid`.
    pub fn set_grid_cell(&mut self, cell: Vec<u32>) {
        self.grid_cell = Some(cell);
    }

    pub fn grid_cell(&self) -> Option<&[u32]> {
        self.grid_cell.as_deref()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Rebuild the spatial index from the current boxes.
    ///
    /// Without an explicit cell size the grid aims for about one cell per box.
    pub fn update_grid(&mut self) {
        let cell = match &self.grid_cell {
            Some(c) => c.clone(),
            None => even_cell(&self.domain, self.boxes.len()),
        };
        self.grid = Some(Grid::build(&self.domain, &self.boxes, self.degree, &cell));
    }

    /// Ascending indices of the boxes whose regions intersect `query`.
    pub fn boxes_overlapping(&self, query: &IvpBox) -> BoxIter {
        let hits = match &self.grid {
            Some(g) => g.query(query, &self.boxes),
            None => self
                .boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.intersects(query))
                .map(|(ix, _)| ix)
                .collect(),
        };
        hits.into_iter()
    }

    /// Upper bound on this map's value anywhere inside `query`.
    pub fn cheap_bound(&self, query: &IvpBox) -> f64 {
        match &self.grid {
            Some(g) => g.cheap_bound(query),
            None => self
                .boxes
                .iter()
                .filter(|b| b.intersects(query))
                .map(|b| b.max_val_as(self.degree))
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Value at a discrete point (one index per domain variable), if covered.
    pub fn eval_point(&self, point: &[u32]) -> Option<f64> {
        let query = point_query(point)?;
        let ix = self.boxes_overlapping(&query).next()?;
        Some(self.boxes[ix].eval_as(point, self.degree))
    }

    /// Largest value attained by any box.
    pub fn max_wt(&self) -> Option<f64> {
        self.boxes
            .iter()
            .map(|b| b.max_val_as(self.degree))
            .reduce(f64::max)
    }

    /// Smallest value attained by any box.
    pub fn min_wt(&self) -> Option<f64> {
        self.boxes
            .iter()
            .map(|b| b.min_val_as(self.degree))
            .reduce(f64::min)
    }

    /// A point where the map attains `max_wt`; the lowest box index wins ties.
    pub fn max_point(&self) -> Option<Vec<u32>> {
        let mut best: Option<(f64, &IvpBox)> = None;
        for b in &self.boxes {
            let v = b.max_val_as(self.degree);
            if best.map_or(true, |(top, _)| v > top) {
                best = Some((v, b));
            }
        }
        let (_, b) = best?;
        Some(match self.degree {
            Degree::Constant => b.extents().iter().map(|e| e.lo).collect(),
            Degree::Linear => b.max_point(),
        })
    }

    /// Scale every value by `w` (priority weighting).
    pub fn apply_weight(&mut self, w: f64) {
        self.grid = None;
        for b in &mut self.boxes {
            b.intercept *= w;
            b.slopes.iter_mut().for_each(|s| *s *= w);
        }
    }

    /// Affinely rescale all values so the function range becomes `[lo, hi]`.
    ///
    /// A flat function maps to `hi` everywhere.
    pub fn normalize(&mut self, lo: f64, hi: f64) {
        let (Some(min), Some(max)) = (self.min_wt(), self.max_wt()) else {
            return;
        };
        self.grid = None;
        let range = max - min;
        if range <= f64::EPSILON * max.abs().max(1.0) {
            for b in &mut self.boxes {
                b.intercept = hi;
                b.slopes.iter_mut().for_each(|s| *s = 0.0);
            }
            return;
        }
        let scale = (hi - lo) / range;
        for b in &mut self.boxes {
            b.intercept = (b.intercept - min) * scale + lo;
            b.slopes.iter_mut().for_each(|s| *s *= scale);
        }
    }

    /// Exhaustive check that every domain point lies in exactly one box.
    ///
    /// Cost is linear in the number of domain points; meant for tests and debugging.
    pub fn is_partition(&self) -> bool {
        let dims: Vec<u32> = self.domain.vars().iter().map(|v| v.points).collect();
        if dims.is_empty() {
            return false;
        }
        let mut point = vec![0u32; dims.len()];
        loop {
            if self.boxes.iter().filter(|b| b.contains(&point)).count() != 1 {
                return false;
            }
            let mut k = 0;
            loop {
                point[k] += 1;
                if point[k] < dims[k] {
                    break;
                }
                point[k] = 0;
                k += 1;
                if k == dims.len() {
                    return true;
                }
            }
        }
    }
}

fn point_query(point: &[u32]) -> Option<IvpBox> {
    IvpBox::new(
        point
            .iter()
            .enumerate()
            .map(|(d, &j)| Extent::new(d, j, j))
            .collect(),
    )
}

/// Cell extents giving about `pieces` cells, split evenly over the dimensions.
pub(crate) fn even_cell(domain: &Domain, pieces: usize) -> Vec<u32> {
    let dim = domain.size().max(1) as u32;
    let target = pieces.max(1) as u64;
    let mut per_dim = ((target as f64).powf(1.0 / f64::from(dim)).floor() as u64).max(1);
    while per_dim.saturating_pow(dim) < target {
        per_dim += 1;
    }
    while per_dim > 1 && (per_dim - 1).saturating_pow(dim) >= target {
        per_dim -= 1;
    }
    let per_dim = u32::try_from(per_dim).unwrap_or(u32::MAX);
    domain
        .vars()
        .iter()
        .map(|v| v.points.div_ceil(per_dim).max(1))
        .collect()
}
