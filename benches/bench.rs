use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sat_phase::sat::cnf::Cnf;
use sat_phase::sat::dp::Dp;
use sat_phase::sat::dpll::Dpll;
use sat_phase::sat::generator::{clauses_for_ratio, random_k_cnf};
use sat_phase::sat::resolution::Resolution;
use sat_phase::sat::solver::{Budget, Limits, Solver};
use std::hint::black_box;
use std::time::Duration;

const RATIOS: [f64; 4] = [2.0, 4.0, 4.3, 6.0];

fn suite(num_vars: usize, ratio: f64, count: usize, seed: u64) -> Vec<Cnf> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let num_clauses = clauses_for_ratio(num_vars, ratio);
    (0..count)
        .map(|_| Cnf::from(random_k_cnf(&mut rng, num_vars, num_clauses, 3)))
        .collect()
}

fn run_all<S: Solver>(solver: &mut S, cnfs: &[Cnf], budget: &Budget) {
    for cnf in cnfs {
        let _ = black_box(solver.solve(cnf, budget));
    }
}

fn bench_phase_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("3-CNF n=12 - DPLL vs DP");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    for ratio in RATIOS {
        let cnfs = suite(12, ratio, 10, 42);
        group.bench_with_input(BenchmarkId::new("DPLL", ratio), &cnfs, |b, cnfs| {
            b.iter(|| run_all(&mut Dpll::default(), cnfs, &Budget::unlimited()));
        });
        group.bench_with_input(BenchmarkId::new("DP", ratio), &cnfs, |b, cnfs| {
            b.iter(|| run_all(&mut Dp::default(), cnfs, &Budget::unlimited()));
        });
    }
    group.finish();

    // Saturation grows quickly; keep it small and capped.
    let mut group = c.benchmark_group("3-CNF n=6 - all solvers");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));
    let limits = Limits {
        timeout: None,
        max_clauses: Some(20_000),
    };

    for ratio in RATIOS {
        let cnfs = suite(6, ratio, 5, 7);
        group.bench_with_input(BenchmarkId::new("Resolution", ratio), &cnfs, |b, cnfs| {
            b.iter(|| run_all(&mut Resolution::default(), cnfs, &limits.start()));
        });
        group.bench_with_input(BenchmarkId::new("DP", ratio), &cnfs, |b, cnfs| {
            b.iter(|| run_all(&mut Dp::default(), cnfs, &limits.start()));
        });
        group.bench_with_input(BenchmarkId::new("DPLL", ratio), &cnfs, |b, cnfs| {
            b.iter(|| run_all(&mut Dpll::default(), cnfs, &limits.start()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_phase_transition);

criterion_main!(benches);
