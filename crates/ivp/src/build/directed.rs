use tracing::debug;

use super::uniform::partition_region;
use crate::ivp_box::IvpBox;
use crate::pdmap::PdMap;

/// Rebuild `map` with a uniform partition at `unit` resolution inside `region`.
///
/// Boxes clear of the region are kept as they are; boxes crossing it are
/// replaced by the parts left after subtracting the region. New pieces inside
/// the region carry zero coefficients and still need fitting.
///
/// `None` if `region` or `unit` do not span every domain dimension, if
/// `region` reaches outside the domain, or if `unit` is wider than `region`.
pub fn refine_directed(map: &PdMap, region: &IvpBox, unit: &IvpBox) -> Option<PdMap> {
    let universe = map.universe()?;
    if !region.contained_in(&universe) || unit.dims() != region.dims() {
        return None;
    }
    if (0..unit.dims()).any(|k| unit.span(k) > region.span(k)) {
        return None;
    }

    let mut kept = Vec::with_capacity(map.size());
    let mut carved = Vec::new();
    for b in map.boxes() {
        if b.intersects(region) {
            carved.extend(b.subtract(region));
        } else {
            kept.push(b.clone());
        }
    }
    let fresh = partition_region(region, unit)?;
    debug!(
        kept = kept.len(),
        carved = carved.len(),
        fresh = fresh.len(),
        "directed refinement"
    );
    kept.extend(carved);
    kept.extend(fresh);

    let mut out = PdMap::with_boxes(map.domain().clone(), map.degree(), kept);
    if let Some(cell) = map.grid_cell() {
        out.set_grid_cell(cell.to_vec());
    }
    Some(out)
}
