use std::sync::Arc;

use tracing::debug;

use crate::domain::Domain;
use crate::ivp_box::{Degree, Extent, IvpBox};
use crate::pdmap::PdMap;

/// Partition `region` into pieces congruent to `unit` (per-extent width
/// `span + 1`), truncating the last piece along each dimension.
///
/// Pieces are emitted with dimension 0 varying fastest. `None` if the
/// dimensions of `region` and `unit` differ.
pub fn partition_region(region: &IvpBox, unit: &IvpBox) -> Option<Vec<IvpBox>> {
    if region.dims() != unit.dims() {
        return None;
    }
    let axes: Vec<Vec<(u32, u32)>> = region
        .extents()
        .iter()
        .zip(unit.extents())
        .map(|(r, u)| {
            let w = u.span().saturating_add(1);
            let mut cuts = Vec::new();
            let mut lo = r.lo;
            loop {
                let hi = lo.saturating_add(w - 1).min(r.hi);
                cuts.push((lo, hi));
                if hi == r.hi {
                    break;
                }
                lo = hi + 1;
            }
            cuts
        })
        .collect();

    let count: usize = axes.iter().map(Vec::len).product();
    let mut pieces = Vec::with_capacity(count);
    let mut cur = vec![0usize; axes.len()];
    loop {
        let extents = region
            .extents()
            .iter()
            .zip(&cur)
            .zip(&axes)
            .map(|((r, &c), axis)| Extent::new(r.dim, axis[c].0, axis[c].1))
            .collect();
        pieces.push(IvpBox::new(extents)?);
        let mut k = 0;
        loop {
            if k == axes.len() {
                return Some(pieces);
            }
            cur[k] += 1;
            if cur[k] < axes[k].len() {
                break;
            }
            cur[k] = 0;
            k += 1;
        }
    }
}

/// Regular partition of the whole domain into pieces shaped like `unit`.
///
/// Only geometry is laid out: coefficients are zero and the grid is not built.
/// The unit extents are recorded as the map's grid cell.
pub fn build_uniform(domain: Arc<Domain>, unit: &IvpBox, degree: Degree) -> Option<PdMap> {
    let universe = IvpBox::universe(&domain)?;
    if unit.dims() != universe.dims()
        || unit.extents().iter().enumerate().any(|(k, e)| e.dim != k)
    {
        return None;
    }
    let pieces = partition_region(&universe, unit)?;
    if pieces.is_empty() {
        return None;
    }
    debug!(pieces = pieces.len(), "uniform partition");
    let cell = unit.extents().iter().map(|e| e.span().saturating_add(1)).collect();
    let mut map = PdMap::with_boxes(domain, degree, pieces);
    map.set_grid_cell(cell);
    Some(map)
}

/// Carve `plateaus` out of `map` and append them whole, after every other box.
///
/// A plateau overlapping an earlier one keeps only its parts outside it.
/// Returns the new map and the index of its first plateau box, or `None` if
/// a plateau reaches outside the domain.
pub fn insert_plateaus(map: &PdMap, plateaus: &[IvpBox]) -> Option<(PdMap, usize)> {
    let universe = map.universe()?;
    if plateaus.iter().any(|p| !p.contained_in(&universe)) {
        return None;
    }
    let mut disjoint: Vec<IvpBox> = Vec::with_capacity(plateaus.len());
    for p in plateaus {
        let mut parts = vec![p.clone()];
        for q in &disjoint {
            parts = parts.iter().flat_map(|b| b.subtract(q)).collect();
        }
        disjoint.extend(parts);
    }

    let mut boxes = map.boxes().to_vec();
    for p in &disjoint {
        boxes = boxes.iter().flat_map(|b| b.subtract(p)).collect();
    }
    let first = boxes.len();
    debug!(remainder = first, plateaus = disjoint.len(), "plateaus inserted");
    boxes.extend(disjoint);

    let mut out = PdMap::with_boxes(map.domain().clone(), map.degree(), boxes);
    if let Some(cell) = map.grid_cell() {
        out.set_grid_cell(cell.to_vec());
    }
    Some((out, first))
}
