//! Axis-aligned discrete boxes carrying a linear value model.
//!
//! Purpose
//! - `IvpBox` is the atomic piece of a piecewise function: a closed index interval
//!   per dimension plus `intercept + Σ slope_k · x_k`, where `x_k` is the discrete
//!   index along extent `k` (not the continuous value).
//! - The same type doubles as the solver's search region: intersecting two boxes
//!   narrows the extents and sums the coefficients (see `ops`).
//!
//! Invariants
//! - Extents are ordered by strictly increasing domain index.
//! - `lo <= hi` for every extent.
//! - `slopes.len() == extents.len()`.

use crate::domain::Domain;

mod ops;


/// Value model of a piece: constant pieces ignore their slopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Degree {
    Constant,
    #[default]
    Linear,
}

/// Closed index interval `[lo, hi]` along domain dimension `dim`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Extent {
    pub dim: usize,
    pub lo: u32,
    pub hi: u32,
}

impl Extent {
    #[inline]
    pub fn new(dim: usize, lo: u32, hi: u32) -> Self {
        Self { dim, lo, hi }
    }

    /// Number of index steps covered (0 for a single index).
    #[inline]
    pub fn span(&self) -> u32 {
        self.hi - self.lo
    }

    #[inline]
    pub fn contains(&self, j: u32) -> bool {
        self.lo <= j && j <= self.hi
    }
}

/// Discrete hyper-rectangle with a linear (or constant) value model.
#[derive(Clone, Debug, PartialEq)]
pub struct IvpBox {
    extents: Vec<Extent>,
    pub slopes: Vec<f64>,
    pub intercept: f64,
}

impl IvpBox {
    /// Box with zero coefficients. `None` if an extent is inverted or the
    /// dimensions are not strictly increasing.
    pub fn new(extents: Vec<Extent>) -> Option<Self> {
        if extents.iter().any(|e| e.lo > e.hi) {
            return None;
        }
        if extents.windows(2).any(|w| w[0].dim >= w[1].dim) {
            return None;
        }
        let slopes = vec![0.0; extents.len()];
        Some(Self {
            extents,
            slopes,
            intercept: 0.0,
        })
    }

    /// Single-index box over the given `(dim, index)` pairs.
    pub fn point(coords: &[(usize, u32)]) -> Option<Self> {
        Self::new(coords.iter().map(|&(d, j)| Extent::new(d, j, j)).collect())
    }

    /// Box spanning every point of `domain`; `None` for an empty domain.
    pub fn universe(domain: &Domain) -> Option<Self> {
        if domain.is_empty() {
            return None;
        }
        Self::new(
            domain
                .vars()
                .iter()
                .enumerate()
                .map(|(d, v)| Extent::new(d, 0, v.points - 1))
                .collect(),
        )
    }

    /// Replace the value model; `slopes` must match the extent count.
    pub fn set_fit(&mut self, slopes: &[f64], intercept: f64) {
        debug_assert_eq!(slopes.len(), self.extents.len(), "slope count mismatch");
        self.slopes.clear();
        self.slopes.extend_from_slice(slopes);
        self.slopes.resize(self.extents.len(), 0.0);
        self.intercept = intercept;
    }

    #[inline]
    pub fn dims(&self) -> usize {
        self.extents.len()
    }

    #[inline]
    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }

    #[inline]
    pub fn extent(&self, k: usize) -> Extent {
        self.extents[k]
    }

    #[inline]
    pub fn span(&self, k: usize) -> u32 {
        self.extents[k].span()
    }

    pub fn is_point_box(&self) -> bool {
        self.extents.iter().all(|e| e.lo == e.hi)
    }

    /// Number of discrete points covered by the box.
    pub fn point_count(&self) -> u64 {
        self.extents
            .iter()
            .map(|e| u64::from(e.span()) + 1)
            .product()
    }

    /// `point[k]` is the index along extent `k`.
    pub fn contains(&self, point: &[u32]) -> bool {
        point.len() == self.extents.len()
            && self.extents.iter().zip(point).all(|(e, &j)| e.contains(j))
    }

    /// Linear model at a discrete point (no containment check).
    pub fn eval(&self, point: &[u32]) -> f64 {
        self.slopes
            .iter()
            .zip(point)
            .fold(self.intercept, |acc, (s, &j)| acc + s * f64::from(j))
    }

    /// Exact maximum of the linear model over the box.
    pub fn max_val(&self) -> f64 {
        self.extents
            .iter()
            .zip(&self.slopes)
            .fold(self.intercept, |acc, (e, &s)| {
                acc + (s * f64::from(e.lo)).max(s * f64::from(e.hi))
            })
    }

    /// Exact minimum of the linear model over the box.
    pub fn min_val(&self) -> f64 {
        self.extents
            .iter()
            .zip(&self.slopes)
            .fold(self.intercept, |acc, (e, &s)| {
                acc + (s * f64::from(e.lo)).min(s * f64::from(e.hi))
            })
    }

    /// A point attaining `max_val`; a zero slope picks `lo`.
    pub fn max_point(&self) -> Vec<u32> {
        self.extents
            .iter()
            .zip(&self.slopes)
            .map(|(e, &s)| if s > 0.0 { e.hi } else { e.lo })
            .collect()
    }

    /// `max_val` under the given value model.
    #[inline]
    pub fn max_val_as(&self, degree: Degree) -> f64 {
        match degree {
            Degree::Constant => self.intercept,
            Degree::Linear => self.max_val(),
        }
    }

    /// `min_val` under the given value model.
    #[inline]
    pub fn min_val_as(&self, degree: Degree) -> f64 {
        match degree {
            Degree::Constant => self.intercept,
            Degree::Linear => self.min_val(),
        }
    }

    /// `eval` under the given value model.
    #[inline]
    pub fn eval_as(&self, point: &[u32], degree: Degree) -> f64 {
        match degree {
            Degree::Constant => self.intercept,
            Degree::Linear => self.eval(point),
        }
    }

    /// Index of the extent with the largest span; ties go to the lowest index.
    pub fn longest_extent(&self) -> usize {
        let mut best = 0;
        for k in 1..self.extents.len() {
            if self.extents[k].span() > self.extents[best].span() {
                best = k;
            }
        }
        best
    }
}
