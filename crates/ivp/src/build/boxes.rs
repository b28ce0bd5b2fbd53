//! Boxes from continuous ranges.
//!
//! Ranges are discretized conservatively: the index interval never reaches
//! outside the requested continuous interval, except when the interval falls
//! strictly between two grid points and collapses to the nearest one.

use crate::domain::{Domain, Snap};
use crate::ivp_box::{Extent, IvpBox};
use crate::pdmap::even_cell;

fn extent_1d(domain: &Domain, ix: usize, vmin: f64, vmax: f64) -> Option<Extent> {
    // Rejects NaN too.
    if !(vmin <= vmax) || domain.point_count(ix) == 0 {
        return None;
    }
    if vmin == vmax {
        let j = domain.discretize(ix, vmin, Snap::Nearest);
        return Some(Extent::new(ix, j, j));
    }
    let lo = domain.discretize(ix, vmin, Snap::Up);
    let hi = domain.discretize(ix, vmax, Snap::Down);
    if lo > hi {
        let j = domain.discretize(ix, (vmin + vmax) / 2.0, Snap::Nearest);
        return Some(Extent::new(ix, j, j));
    }
    Some(Extent::new(ix, lo, hi))
}

/// One-dimensional box over `var` covering `[vmin, vmax]`.
pub fn build_1d_box(domain: &Domain, var: &str, vmin: f64, vmax: f64) -> Option<IvpBox> {
    let ix = domain.index_of(var)?;
    IvpBox::new(vec![extent_1d(domain, ix, vmin, vmax)?])
}

/// Two-dimensional box; extents are stored in domain order regardless of
/// argument order. `None` if both names are the same.
pub fn build_2d_box(
    domain: &Domain,
    var1: &str,
    var2: &str,
    range1: (f64, f64),
    range2: (f64, f64),
) -> Option<IvpBox> {
    if var1 == var2 {
        return None;
    }
    let a = extent_1d(domain, domain.index_of(var1)?, range1.0, range1.1)?;
    let b = extent_1d(domain, domain.index_of(var2)?, range2.0, range2.1)?;
    let extents = if a.dim < b.dim { vec![a, b] } else { vec![b, a] };
    IvpBox::new(extents)
}

/// Point box at the nearest grid index of each `(var, value)`.
///
/// `None` on an unknown or repeated variable.
pub fn build_point_box(domain: &Domain, coords: &[(&str, f64)]) -> Option<IvpBox> {
    let mut pts = Vec::with_capacity(coords.len());
    for &(name, value) in coords {
        let ix = domain.index_of(name)?;
        pts.push((ix, domain.discretize(ix, value, Snap::Nearest)));
    }
    pts.sort_unstable_by_key(|&(ix, _)| ix);
    IvpBox::point(&pts)
}

/// Box spanning the whole domain.
pub fn domain_to_box(domain: &Domain) -> Option<IvpBox> {
    IvpBox::universe(domain)
}

/// Unit box for a uniform partition of roughly `amount` pieces, with the same
/// number of pieces along every dimension where the point counts allow it.
pub fn unit_box_for_amount(domain: &Domain, amount: usize) -> Option<IvpBox> {
    if domain.is_empty() {
        return None;
    }
    let cell = even_cell(domain, amount);
    IvpBox::new(
        cell.iter()
            .enumerate()
            .map(|(k, &w)| Extent::new(k, 0, w - 1))
            .collect(),
    )
}
