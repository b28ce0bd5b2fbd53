use super::*;
use crate::ivp_box::Extent;

fn plane_domain() -> Domain {
    Domain::new()
        .with_var("x", 0.0, 20.0, 11)
        .and_then(|d| d.with_var("y", -5.0, 5.0, 11))
        .unwrap()
}

fn full_box() -> IvpBox {
    IvpBox::new(vec![Extent::new(0, 0, 10), Extent::new(1, 0, 10)]).unwrap()
}

#[test]
fn linear_aof_fits_exactly() {
    // x = 2 * ix, y = ix - 5 -> f = 3x - y + 1 = 6 ix - iy + 6
    let aof = FnAof::new(plane_domain(), |p: &[f64]| 3.0 * p[0] - p[1] + 1.0);
    let mut r = Regressor::new(&aof, Degree::Linear);
    let mut b = IvpBox::new(vec![Extent::new(0, 2, 7), Extent::new(1, 3, 9)]).unwrap();
    let err = r.fit(&mut b);
    assert!(err < 1e-9, "err = {err}");
    assert!((b.slopes[0] - 6.0).abs() < 1e-9);
    assert!((b.slopes[1] + 1.0).abs() < 1e-9);
    assert!((b.intercept - 6.0).abs() < 1e-9);
    assert!((b.eval(&[4, 5]) - aof.eval(&[8.0, 0.0])).abs() < 1e-9);
}

#[test]
fn constant_degree_uses_sample_mean() {
    let aof = FnAof::new(plane_domain(), |p: &[f64]| p[0]);
    let mut r = Regressor::new(&aof, Degree::Constant).with_samples(2);
    let mut b = full_box();
    let err = r.fit(&mut b);
    // Samples at x = 0 and x = 20.
    assert!((b.intercept - 10.0).abs() < 1e-12);
    assert!(b.slopes.iter().all(|&s| s == 0.0));
    assert!((err - 10.0).abs() < 1e-12);
}

#[test]
fn curvature_gives_positive_error_that_shrinks_on_halves() {
    let aof = FnAof::new(plane_domain(), |p: &[f64]| -(p[0] - 10.0).powi(2));
    let mut r = Regressor::new(&aof, Degree::Linear);
    let mut whole = full_box();
    let e_whole = r.fit(&mut whole);
    assert!(e_whole > 0.0);
    let mut upper = whole.cut(0).unwrap();
    let e_lower = r.fit(&mut whole);
    let e_upper = r.fit(&mut upper);
    assert!(e_lower < e_whole);
    assert!(e_upper < e_whole);
}

#[test]
fn fit_is_deterministic_and_counted() {
    let aof = FnAof::new(plane_domain(), |p: &[f64]| (p[0] * 0.3).sin() + p[1]);
    let mut r = Regressor::new(&aof, Degree::Linear);
    let mut a = full_box();
    let mut b = full_box();
    let ea = r.fit(&mut a);
    let eb = r.fit(&mut b);
    assert_eq!(ea, eb);
    assert_eq!(a, b);
    assert_eq!(r.total_fits(), 2);
    // 3x3 fit samples plus 16 check points on the 5x5 check lattice.
    assert_eq!(r.total_evals(), 2 * 25);
    assert!(std::ptr::eq(r.aof(), &aof));
}

#[test]
fn error_counts_points_between_fit_samples() {
    // Zero at every fit sample (0, 2, 4), +-1 in between.
    let d = Domain::new().with_var("x", 0.0, 4.0, 5).unwrap();
    let aof = FnAof::new(d, |p: &[f64]| (std::f64::consts::FRAC_PI_2 * p[0]).sin());
    let mut r = Regressor::new(&aof, Degree::Linear);
    let mut b = IvpBox::new(vec![Extent::new(0, 0, 4)]).unwrap();
    let err = r.fit(&mut b);
    assert!((err - 1.0).abs() < 1e-9, "err = {err}");
    assert!(b.eval(&[2]).abs() < 1e-9);
}

#[test]
fn point_box_fits_with_zero_error() {
    let aof = FnAof::new(plane_domain(), |p: &[f64]| p[0] * p[1]);
    let mut r = Regressor::new(&aof, Degree::Linear);
    let mut b = IvpBox::point(&[(0, 3), (1, 8)]).unwrap();
    assert!(r.fit(&mut b) < 1e-9);
    assert!((b.eval(&[3, 8]) - 18.0).abs() < 1e-9);
}

#[test]
fn sample_indices_cover_ends() {
    assert_eq!(sample_indices(4, 4, 3), vec![4]);
    assert_eq!(sample_indices(0, 1, 3), vec![0, 1]);
    assert_eq!(sample_indices(0, 10, 3), vec![0, 5, 10]);
    assert_eq!(sample_indices(2, 9, 4), vec![2, 4, 7, 9]);
}
