//! Regressor: fit a box's value model to an analytic objective function (AOF).
//!
//! Scheme
//! - Sample the AOF on a lattice inside the box: per spanning extent, `lo`, `hi`,
//!   and evenly spaced interior indices (`samples_per_dim` in total).
//! - Degree 0: intercept = sample mean. Degree 1: least squares for intercept and
//!   the slopes of the spanning extents, solved by SVD in box-local coordinates
//!   (`x - lo`) and shifted back to domain indices.
//! - Error = max absolute residual over a check lattice with `2 * samples_per_dim - 1`
//!   indices per extent: the fit samples plus the midpoints between them. A curve
//!   that happens to be linear at the fit samples still reports its miss.
//!   Deterministic for a given box.
//!
//! Non-spanning extents get slope 0. Domain variables the box does not constrain
//! are sampled at their low value.

#[cfg(test)]
mod tests;

use nalgebra::{DMatrix, DVector};

use crate::cfg::{LSQ_EPS, SAMPLES_PER_DIM};
use crate::domain::Domain;
use crate::ivp_box::{Degree, IvpBox};

/// Continuous objective over a domain.
pub trait Aof {
    fn domain(&self) -> &Domain;
    /// Value at a continuous point, one coordinate per domain variable in order.
    fn eval(&self, point: &[f64]) -> f64;
}

/// AOF backed by a closure.
pub struct FnAof<F> {
    domain: Domain,
    f: F,
}

impl<F> FnAof<F>
where
    F: Fn(&[f64]) -> f64,
{
    pub fn new(domain: Domain, f: F) -> Self {
        Self { domain, f }
    }
}

impl<F> Aof for FnAof<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn eval(&self, point: &[f64]) -> f64 {
        (self.f)(point)
    }
}

/// Least-squares fitter bound to one AOF.
pub struct Regressor<'a, A: Aof + ?Sized> {
    aof: &'a A,
    degree: Degree,
    samples_per_dim: usize,
    evals: u64,
    fits: u64,
}

impl<'a, A: Aof + ?Sized> Regressor<'a, A> {
    pub fn new(aof: &'a A, degree: Degree) -> Self {
        Self {
            aof,
            degree,
            samples_per_dim: SAMPLES_PER_DIM,
            evals: 0,
            fits: 0,
        }
    }

    /// Samples per spanning extent; clamped to at least 2 (both ends).
    pub fn with_samples(mut self, samples_per_dim: usize) -> Self {
        self.samples_per_dim = samples_per_dim.max(2);
        self
    }

    pub fn aof(&self) -> &'a A {
        self.aof
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn total_evals(&self) -> u64 {
        self.evals
    }

    pub fn total_fits(&self) -> u64 {
        self.fits
    }

    /// Store the best-fit coefficients in `b` and return the fit error (>= 0).
    pub fn fit(&mut self, b: &mut IvpBox) -> f64 {
        self.fits += 1;
        let domain = self.aof.domain();
        let axes: Vec<Vec<u32>> = b
            .extents()
            .iter()
            .map(|e| sample_indices(e.lo, e.hi, self.samples_per_dim))
            .collect();
        let fit_pts = lattice(&axes);

        let mut cont: Vec<f64> = domain.vars().iter().map(|v| v.low).collect();
        let ys: Vec<f64> = fit_pts
            .iter()
            .map(|p| self.sample(b, p, &mut cont))
            .collect();

        let mean = ys.iter().sum::<f64>() / ys.len().max(1) as f64;
        let zeros = vec![0.0; b.dims()];
        match self.degree {
            Degree::Constant => b.set_fit(&zeros, mean),
            Degree::Linear => match solve_linear(b, &fit_pts, &ys) {
                Some((slopes, intercept)) => b.set_fit(&slopes, intercept),
                None => b.set_fit(&zeros, mean),
            },
        }

        let mut err = fit_pts
            .iter()
            .zip(&ys)
            .map(|(p, y)| (b.eval_as(p, self.degree) - y).abs())
            .fold(0.0, f64::max);
        let check_axes: Vec<Vec<u32>> = b
            .extents()
            .iter()
            .map(|e| sample_indices(e.lo, e.hi, 2 * self.samples_per_dim - 1))
            .collect();
        for p in lattice(&check_axes) {
            // Fit samples are already counted.
            if p.iter().zip(&axes).all(|(j, axis)| axis.contains(j)) {
                continue;
            }
            let y = self.sample(b, &p, &mut cont);
            err = err.max((b.eval_as(&p, self.degree) - y).abs());
        }
        err
    }

    /// AOF value at box-local indices `p`; `cont` carries the fixed coordinates.
    fn sample(&mut self, b: &IvpBox, p: &[u32], cont: &mut [f64]) -> f64 {
        let domain = self.aof.domain();
        for (e, &j) in b.extents().iter().zip(p) {
            if let Some(v) = domain.value_at(e.dim, j) {
                cont[e.dim] = v;
            }
        }
        self.evals += 1;
        self.aof.eval(cont)
    }
}

/// Least squares over the spanning extents; `None` if the solve fails.
fn solve_linear(b: &IvpBox, lattice: &[Vec<u32>], ys: &[f64]) -> Option<(Vec<f64>, f64)> {
    let cols: Vec<usize> = (0..b.dims()).filter(|&k| b.span(k) > 0).collect();
    let a = DMatrix::from_fn(lattice.len(), cols.len() + 1, |r, c| {
        if c == 0 {
            1.0
        } else {
            let k = cols[c - 1];
            f64::from(lattice[r][k] - b.extent(k).lo)
        }
    });
    let y = DVector::from_column_slice(ys);
    let coef = a.svd(true, true).solve(&y, LSQ_EPS).ok()?;
    let mut slopes = vec![0.0; b.dims()];
    let mut intercept = coef[0];
    for (c, &k) in cols.iter().enumerate() {
        let s = coef[c + 1];
        slopes[k] = s;
        intercept -= s * f64::from(b.extent(k).lo);
    }
    Some((slopes, intercept))
}

/// `n` evenly spaced indices in `[lo, hi]` including both ends, deduplicated.
fn sample_indices(lo: u32, hi: u32, n: usize) -> Vec<u32> {
    if lo == hi {
        return vec![lo];
    }
    let span = u64::from(hi - lo);
    let n = (n.max(2) as u64).min(span + 1);
    let mut out: Vec<u32> = (0..n)
        .map(|i| lo + ((i * span + (n - 1) / 2) / (n - 1)) as u32)
        .collect();
    out.dedup();
    out
}

/// Cartesian product of per-extent index lists.
fn lattice(axes: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let mut out: Vec<Vec<u32>> = vec![Vec::with_capacity(axes.len())];
    for axis in axes {
        out = out
            .into_iter()
            .flat_map(|p| {
                axis.iter().map(move |&j| {
                    let mut q = p.clone();
                    q.push(j);
                    q
                })
            })
            .collect();
    }
    out
}
