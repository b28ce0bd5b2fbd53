//! Criterion benches for map construction.
//!
//! - uniform partition of a 2D domain at several piece counts,
//! - full builder pipeline (fit + smart refinement) at several cut budgets.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ivp::build::{build_uniform, evaluate, refine, unit_box_for_amount, Builder, BuilderConfig, UnitSpec};
use ivp::regress::{FnAof, Regressor};
use ivp::{Degree, Domain};

fn helm() -> Domain {
    Domain::new()
        .with_var("course", 0.0, 359.0, 360)
        .and_then(|d| d.with_var("speed", 0.0, 5.0, 26))
        .expect("domain")
}

fn objective(p: &[f64]) -> f64 {
    let dc = (p[0] - 135.0).abs().min(360.0 - (p[0] - 135.0).abs());
    100.0 - 0.5 * dc - 4.0 * (p[1] - 3.2).powi(2)
}

fn bench_uniform(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_uniform");
    let domain = Arc::new(helm());
    for amount in [16usize, 256, 2048] {
        let unit = unit_box_for_amount(&domain, amount).expect("unit box");
        group.bench_with_input(BenchmarkId::from_parameter(amount), &unit, |b, unit| {
            b.iter(|| build_uniform(domain.clone(), unit, Degree::Linear))
        });
    }
    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine");
    let domain = Arc::new(helm());
    let aof = FnAof::new(helm(), objective);
    let unit = unit_box_for_amount(&domain, 64).expect("unit box");
    for budget in [50usize, 200, 800] {
        group.bench_function(BenchmarkId::new("smart", budget), |b| {
            b.iter_batched(
                || build_uniform(domain.clone(), &unit, Degree::Linear).expect("uniform map"),
                |mut map| {
                    let mut r = Regressor::new(&aof, Degree::Linear);
                    let mut q = evaluate(&mut map, &mut r);
                    refine(&mut map, &mut q, &mut r, budget, 0.0)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_builder(c: &mut Criterion) {
    let aof = FnAof::new(helm(), objective);
    let builder = Builder::new(BuilderConfig {
        unit_box: UnitSpec::Amount(100),
        refinement_budget: 300,
        normalize: true,
        ..BuilderConfig::default()
    });
    c.bench_function("builder_pipeline", |b| b.iter(|| builder.build(&aof)));
}

fn build_benches(c: &mut Criterion) {
    bench_uniform(c);
    bench_refine(c);
    bench_builder(c);
}

criterion_group!(benches, build_benches);
criterion_main!(benches);
