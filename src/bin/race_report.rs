//! Classroom report: exact vs. simulated chip race probabilities.
//!
//! Usage:
//!   cargo run --release --bin race_report
//!
//! Set `RUST_LOG=debug` for solver and simulation details.

use std::error::Error;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use chip_race::race::{
    convergence_study, ConvergencePoint, ExactRace, ExactSolver, Outcome, SimulationConfig,
    SimulationReport, Simulator,
};

/// Playouts per panel, as used in class.
const RUN_COUNTS: [u64; 2] = [50, 200];

/// JSON summary printed at the end.
#[derive(Serialize)]
struct Summary {
    exact: [String; 3],
    exact_float: [f64; 3],
    simulations: Vec<SimulationReport>,
    convergence: Vec<ConvergencePoint>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Chip Race: exact vs. simulated ===\n");

    let game = ExactRace::from_fractions(
        &[(3, 18), (5, 18), (4, 18), (3, 18), (2, 18), (1, 18)],
        vec![3, 5, 4, 3, 2, 1],
        vec![3, 7, 4, 3, 1, 0],
    )?;

    let weights: Vec<String> = game.weights().iter().map(|w| w.to_string()).collect();
    println!("Field weights: {}", weights.join(", "));
    println!("Chips A: {:?}", game.chips_a());
    println!("Chips B: {:?}", game.chips_b());
    println!();

    // Exact
    let start = Instant::now();
    let mut solver = ExactSolver::new(game.clone());
    let exact = solver.solve();
    let exact_float = exact.to_f64();
    println!(
        "Exact solve: {} states in {:.2}s",
        solver.memo_len(),
        start.elapsed().as_secs_f64()
    );
    for outcome in Outcome::ALL {
        println!("  {:<8} = {}", outcome, exact.get(outcome));
    }

    // Simulations
    let float_game = game.to_float();
    let mut simulations = Vec::with_capacity(RUN_COUNTS.len());

    for (i, &runs) in RUN_COUNTS.iter().enumerate() {
        let config = SimulationConfig::default().with_runs(runs);
        let mut sim = Simulator::new(float_game.clone(), config)?;

        let pb = ProgressBar::new(runs);
        pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} playouts")?);
        let report = sim.run_with_callback(10, |done| pb.set_position(done));
        pb.finish_and_clear();

        println!("\n--- Results for n = {} ---", runs);
        for outcome in Outcome::ALL {
            let estimate = report.get(outcome);
            let exact_value = exact_float[outcome.index()];
            println!(
                "{:<8}: phat = {:.5}, CI = ({:.5} - {:.5}), deviation = {:.5}, exact = {}",
                outcome,
                estimate.p_hat,
                estimate.ci_low,
                estimate.ci_high,
                (estimate.p_hat - exact_value).abs(),
                exact.get(outcome)
            );
        }

        log::debug!("panel {} finished: {:?}", i + 1, sim.stats());
        simulations.push(report);
    }

    // Convergence
    println!("\n--- Convergence over 20 seeded repeats ---");
    let convergence =
        convergence_study(&float_game, &exact, &[50, 200, 1_000, 5_000], 20, 1.96, 42)?;
    for point in &convergence {
        println!(
            "n = {:>5}: mean |phat - exact| = {:.5}, exact inside CI = {:.1}%",
            point.runs,
            point.mean_abs_deviation,
            point.exact_coverage * 100.0
        );
    }

    let summary = Summary {
        exact: [
            exact.a_wins.to_string(),
            exact.b_wins.to_string(),
            exact.tie.to_string(),
        ],
        exact_float,
        simulations,
        convergence,
    };

    println!("\n=== Summary (JSON) ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
