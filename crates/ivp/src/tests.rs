use crate::prelude::*;

fn helm() -> Domain {
    Domain::new()
        .with_var("x", 0.0, 20.0, 21)
        .and_then(|d| d.with_var("y", 0.0, 20.0, 21))
        .unwrap()
}

fn bowl_at(cx: f64, cy: f64) -> impl Fn(&[f64]) -> f64 {
    move |p: &[f64]| -(p[0] - cx).powi(2) - (p[1] - cy).powi(2)
}

#[test]
fn weighted_objectives_meet_in_between() {
    let cfg = BuilderConfig {
        unit_box: UnitSpec::Amount(16),
        refinement_budget: 200,
        normalize: true,
        ..BuilderConfig::default()
    };
    let builder = Builder::new(cfg);
    let mut near = builder.build(&FnAof::new(helm(), bowl_at(5.0, 5.0))).unwrap();
    let far = builder.build(&FnAof::new(helm(), bowl_at(15.0, 5.0))).unwrap();
    near.apply_weight(2.0);
    near.update_grid();

    let s = solve(&[&near, &far], &SolverConfig::default()).unwrap().unwrap();
    let x = s.value_of(near.domain(), "x").unwrap();
    let y = s.value_of(near.domain(), "y").unwrap();
    assert!((6.0..=11.0).contains(&x), "x = {x}");
    assert!((3.0..=7.0).contains(&y), "y = {y}");

    let by_points = near.eval_point(&s.point).unwrap() + far.eval_point(&s.point).unwrap();
    assert!((by_points - s.value).abs() < 1e-9);
    assert!(s.stats.leaves_visited > 0);
}

#[test]
fn version_is_set() {
    assert!(!crate::VERSION.is_empty());
}
