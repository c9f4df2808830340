//! Benchmarks for the exact solver and the Monte-Carlo path.

use chip_race::race::{exact_probabilities, simulate_many, ExactRace, ExactSolver};
use chip_race::stats::binomial::{critical_region, BinomialTest, Tail};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn classroom_game() -> ExactRace {
    ExactRace::from_fractions(
        &[(3, 18), (5, 18), (4, 18), (3, 18), (2, 18), (1, 18)],
        vec![3, 5, 4, 3, 2, 1],
        vec![3, 7, 4, 3, 1, 0],
    )
    .unwrap()
}

fn exact_solve_benchmark(c: &mut Criterion) {
    let game = classroom_game();

    c.bench_function("exact_classroom_solve", |b| {
        b.iter(|| exact_probabilities(black_box(&game)))
    });
}

fn exact_warm_memo_benchmark(c: &mut Criterion) {
    let mut solver = ExactSolver::new(classroom_game());
    solver.solve();

    c.bench_function("exact_classroom_warm_memo", |b| b.iter(|| black_box(solver.solve())));
}

fn simulate_10k_benchmark(c: &mut Criterion) {
    let game = classroom_game().to_float();

    c.bench_function("simulate_10k_playouts", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            simulate_many(black_box(&game), 10_000, 1.96, &mut rng).unwrap()
        })
    });
}

fn critical_region_benchmark(c: &mut Criterion) {
    let test = BinomialTest::new(500, 0.3, 0.05, Tail::Two).unwrap();

    c.bench_function("binomial_critical_region_n500", |b| {
        b.iter(|| critical_region(black_box(&test)))
    });
}

criterion_group!(
    benches,
    exact_solve_benchmark,
    exact_warm_memo_benchmark,
    simulate_10k_benchmark,
    critical_region_benchmark
);
criterion_main!(benches);
