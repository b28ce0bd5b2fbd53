//! Uniform cell grid over discrete indices.
//!
//! Each cell keeps the indices of the boxes touching it and the largest box
//! value among them. Overlap queries visit only the cells under the query box,
//! then filter candidates by exact intersection.

use crate::cfg::MAX_GRID_CELLS;
use crate::domain::Domain;
use crate::ivp_box::{Degree, IvpBox};

/// Spatial index for one `PdMap`.
#[derive(Clone, Debug)]
pub struct Grid {
    cell: Vec<u32>,
    cells_per_dim: Vec<u32>,
    strides: Vec<usize>,
    members: Vec<Vec<usize>>,
    cell_max: Vec<f64>,
}

impl Grid {
    /// Index `boxes` over `domain` with cells of `cell[k]` indices per dimension.
    ///
    /// Cell extents of zero are treated as one. When the cell count would exceed
    /// `MAX_GRID_CELLS`, the widest-count dimension is coarsened until it fits.
    pub fn build(domain: &Domain, boxes: &[IvpBox], degree: Degree, cell: &[u32]) -> Grid {
        let dim = domain.size();
        let mut cell: Vec<u32> = (0..dim)
            .map(|k| cell.get(k).copied().unwrap_or(1).max(1))
            .collect();
        let mut cells_per_dim = counts(domain, &cell);
        while total(&cells_per_dim) > MAX_GRID_CELLS {
            let Some((k, _)) = cells_per_dim
                .iter()
                .enumerate()
                .max_by_key(|&(k, &n)| (n, std::cmp::Reverse(k)))
            else {
                break;
            };
            cell[k] = cell[k].saturating_mul(2);
            cells_per_dim = counts(domain, &cell);
        }
        let mut strides = Vec::with_capacity(dim);
        let mut stride = 1usize;
        for &n in &cells_per_dim {
            strides.push(stride);
            stride *= n as usize;
        }
        let ncells = total(&cells_per_dim);
        let mut grid = Grid {
            cell,
            cells_per_dim,
            strides,
            members: vec![Vec::new(); ncells],
            cell_max: vec![f64::NEG_INFINITY; ncells],
        };
        for (ix, b) in boxes.iter().enumerate() {
            let Some(ranges) = grid.cell_ranges(b) else {
                continue;
            };
            let value = b.max_val_as(degree);
            let (members, cell_max) = (&mut grid.members, &mut grid.cell_max);
            for_each_cell(&grid.strides, &ranges, |c| {
                members[c].push(ix);
                if value > cell_max[c] {
                    cell_max[c] = value;
                }
            });
        }
        grid
    }

    /// Cell extent (in discrete indices) per dimension.
    pub fn cell_extents(&self) -> &[u32] {
        &self.cell
    }

    pub fn cell_count(&self) -> usize {
        self.members.len()
    }

    /// Ascending indices of boxes in `boxes` that intersect `query`.
    ///
    /// `boxes` must be the slice the grid was built from.
    pub fn query(&self, query: &IvpBox, boxes: &[IvpBox]) -> Vec<usize> {
        let Some(ranges) = self.cell_ranges(query) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for_each_cell(&self.strides, &ranges, |c| out.extend_from_slice(&self.members[c]));
        out.sort_unstable();
        out.dedup();
        out.retain(|&ix| boxes.get(ix).is_some_and(|b| b.intersects(query)));
        out
    }

    /// Upper bound on the value of any box reaching into `query`.
    ///
    /// `NEG_INFINITY` if no box touches the cells under `query`.
    pub fn cheap_bound(&self, query: &IvpBox) -> f64 {
        let Some(ranges) = self.cell_ranges(query) else {
            return f64::NEG_INFINITY;
        };
        let mut bound = f64::NEG_INFINITY;
        for_each_cell(&self.strides, &ranges, |c| bound = bound.max(self.cell_max[c]));
        bound
    }

    /// Inclusive cell-coordinate range per dimension, or `None` if `b` is not
    /// a full-domain box.
    fn cell_ranges(&self, b: &IvpBox) -> Option<Vec<(u32, u32)>> {
        if b.dims() != self.cell.len() {
            return None;
        }
        b.extents()
            .iter()
            .enumerate()
            .map(|(k, e)| {
                if e.dim != k {
                    return None;
                }
                let last = self.cells_per_dim[k].saturating_sub(1);
                Some(((e.lo / self.cell[k]).min(last), (e.hi / self.cell[k]).min(last)))
            })
            .collect()
    }
}

fn counts(domain: &Domain, cell: &[u32]) -> Vec<u32> {
    domain
        .vars()
        .iter()
        .zip(cell)
        .map(|(v, &c)| v.points.div_ceil(c).max(1))
        .collect()
}

fn total(cells_per_dim: &[u32]) -> usize {
    cells_per_dim
        .iter()
        .fold(1usize, |acc, &n| acc.saturating_mul(n as usize))
}

/// Visit every flat cell index inside `ranges` (odometer order, dim 0 fastest).
fn for_each_cell(strides: &[usize], ranges: &[(u32, u32)], mut f: impl FnMut(usize)) {
    if ranges.is_empty() {
        f(0);
        return;
    }
    let mut cur: Vec<u32> = ranges.iter().map(|r| r.0).collect();
    loop {
        let flat = cur
            .iter()
            .zip(strides)
            .map(|(&c, &s)| c as usize * s)
            .sum();
        f(flat);
        let mut k = 0;
        loop {
            if cur[k] < ranges[k].1 {
                cur[k] += 1;
                break;
            }
            cur[k] = ranges[k].0;
            k += 1;
            if k == ranges.len() {
                return;
            }
        }
    }
}
