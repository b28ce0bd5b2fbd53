//! One decision cycle: two competing objectives over course and speed.
//!
//! - "waypoint" prefers heading 135 at 3 m/s,
//! - "avoid" penalizes headings near a contact bearing of 150,
//! - both maps are normalized, weighted by priority, and solved together.

use std::time::Instant;

use ivp::prelude::*;
use tracing::info;

fn angle_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn main() {
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_target(false)
        .init();

    let domain = Domain::new()
        .with_var("course", 0.0, 359.0, 360)
        .and_then(|d| d.with_var("speed", 0.0, 5.0, 21))
        .expect("helm domain");

    let builder = Builder::new(BuilderConfig {
        unit_box: UnitSpec::Amount(80),
        refinement_budget: 400,
        normalize: true,
        ..BuilderConfig::default()
    });

    let start = Instant::now();
    let waypoint = FnAof::new(domain.clone(), |p: &[f64]| {
        -angle_diff(p[0], 135.0) - 10.0 * (p[1] - 3.0).abs()
    });
    let avoid = FnAof::new(domain.clone(), |p: &[f64]| {
        let gap = angle_diff(p[0], 150.0);
        if gap < 30.0 {
            -(30.0 - gap) * p[1]
        } else {
            0.0
        }
    });
    let mut wpt_map = builder.build(&waypoint).expect("waypoint map");
    let mut avd_map = builder.build(&avoid).expect("avoid map");
    wpt_map.apply_weight(100.0);
    wpt_map.update_grid();
    avd_map.apply_weight(200.0);
    avd_map.update_grid();
    info!(
        waypoint_pieces = wpt_map.size(),
        avoid_pieces = avd_map.size(),
        ms = start.elapsed().as_secs_f64() * 1e3,
        "objectives built"
    );

    let start = Instant::now();
    // Heaviest map as the top level, seeded with its own best point.
    let cfg = SolverConfig {
        priority_order: PriorityOrder::ByMaxWeight,
        initial_solution: avd_map.max_point(),
        ..SolverConfig::default()
    };
    let solution = solve(&[&avd_map, &wpt_map], &cfg)
        .expect("solver config")
        .expect("a decision");
    let course = solution.value_of(&domain, "course").expect("course");
    let speed = solution.value_of(&domain, "speed").expect("speed");
    info!(
        course,
        speed,
        value = solution.value,
        leaves = solution.stats.leaves_visited,
        pruned = solution.stats.nodes_pruned,
        ms = start.elapsed().as_secs_f64() * 1e3,
        "decision"
    );
    println!("course={course:.0} speed={speed:.2} value={:.2}", solution.value);
}
