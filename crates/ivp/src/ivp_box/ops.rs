//! Box geometry: overlap, intersection with coefficient accumulation, midpoint
//! cuts, and subtraction into disjoint remainders.

use super::{Degree, Extent, IvpBox};

impl IvpBox {
    fn same_dims(&self, other: &IvpBox) -> bool {
        self.extents.len() == other.extents.len()
            && self
                .extents
                .iter()
                .zip(&other.extents)
                .all(|(a, b)| a.dim == b.dim)
    }

    /// True if both boxes share their dimensions and overlap in every one.
    pub fn intersects(&self, other: &IvpBox) -> bool {
        self.same_dims(other)
            && self
                .extents
                .iter()
                .zip(&other.extents)
                .all(|(a, b)| a.lo <= b.hi && b.lo <= a.hi)
    }

    /// Overlap region; slopes and intercepts of both boxes are summed.
    ///
    /// Returns `None` when the dimensions differ or any extent is empty.
    pub fn intersect(&self, other: &IvpBox) -> Option<IvpBox> {
        self.intersect_as(other, Degree::Linear)
    }

    /// `intersect`, reading `other` under the given value model: a constant
    /// `other` contributes its intercept only.
    pub fn intersect_as(&self, other: &IvpBox, other_degree: Degree) -> Option<IvpBox> {
        if !self.same_dims(other) {
            return None;
        }
        let mut extents = Vec::with_capacity(self.extents.len());
        for (a, b) in self.extents.iter().zip(&other.extents) {
            let lo = a.lo.max(b.lo);
            let hi = a.hi.min(b.hi);
            if lo > hi {
                return None;
            }
            extents.push(Extent::new(a.dim, lo, hi));
        }
        let slopes = match other_degree {
            Degree::Constant => self.slopes.clone(),
            Degree::Linear => self
                .slopes
                .iter()
                .zip(&other.slopes)
                .map(|(s, t)| s + t)
                .collect(),
        };
        Some(IvpBox {
            extents,
            slopes,
            intercept: self.intercept + other.intercept,
        })
    }

    /// True if every extent of `self` lies inside the matching extent of `other`.
    pub fn contained_in(&self, other: &IvpBox) -> bool {
        self.same_dims(other)
            && self
                .extents
                .iter()
                .zip(&other.extents)
                .all(|(a, b)| b.lo <= a.lo && a.hi <= b.hi)
    }

    /// Split extent `k` at its integer midpoint.
    ///
    /// `self` keeps `[lo, mid]`; the returned box covers `[mid + 1, hi]` and
    /// carries a copy of the coefficients. `None` if extent `k` has no span.
    pub fn cut(&mut self, k: usize) -> Option<IvpBox> {
        let e = *self.extents.get(k)?;
        if e.lo == e.hi {
            return None;
        }
        let mid = e.lo + (e.hi - e.lo) / 2;
        let mut upper = self.clone();
        upper.extents[k].lo = mid + 1;
        self.extents[k].hi = mid;
        Some(upper)
    }

    /// Disjoint pieces whose union is `self` minus `other`.
    ///
    /// Pieces keep `self`'s coefficients. An empty result means `self` lies
    /// entirely inside `other`.
    pub fn subtract(&self, other: &IvpBox) -> Vec<IvpBox> {
        if !self.intersects(other) {
            return vec![self.clone()];
        }
        let mut pieces = Vec::new();
        let mut rem = self.clone();
        for k in 0..rem.extents.len() {
            let cur = rem.extents[k];
            let cut = other.extents[k];
            if cur.lo < cut.lo {
                let mut below = rem.clone();
                below.extents[k].hi = cut.lo - 1;
                pieces.push(below);
            }
            if cut.hi < cur.hi {
                let mut above = rem.clone();
                above.extents[k].lo = cut.hi + 1;
                pieces.push(above);
            }
            rem.extents[k].lo = cur.lo.max(cut.lo);
            rem.extents[k].hi = cur.hi.min(cut.hi);
        }
        pieces
    }
}
