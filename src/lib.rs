//! # Chip Race
//!
//! Exact versus simulated probabilities for teaching inferential statistics.
//!
//! ## Features
//!
//! - **Exact Solver**: Memoized recursion over `BigRational`, outcome
//!   probabilities with no rounding error
//! - **Monte-Carlo Simulation**: Seeded playouts with Wilson confidence intervals
//! - **Convergence Study**: Parallel seeded repeats measuring distance to the exact answer
//! - **Binomial Tools**: Wald / Wilson / Clopper–Pearson intervals, critical
//!   regions, prediction-band inversion, coverage experiments
//!
//! ## Quick Start
//!
//! ```
//! use chip_race::race::{exact_probabilities, ExactRace, SimulationConfig, Simulator};
//!
//! let game = ExactRace::from_fractions(&[(1, 3), (2, 3)], vec![1, 2], vec![2, 1]).unwrap();
//!
//! // Ground truth
//! let exact = exact_probabilities(&game);
//!
//! // Estimate
//! let config = SimulationConfig::default().with_runs(5_000).with_seed(42);
//! let mut sim = Simulator::new(game.to_float(), config).unwrap();
//! let report = sim.run();
//!
//! println!("exact: {}", exact);
//! println!("simulated P(A) = {:.3}", report.a_wins.p_hat);
//! ```
//!
//! ## Modules
//!
//! - [`race`]: Race game model, exact solver, playouts and aggregation
//! - [`stats`]: Confidence intervals and binomial testing
//! - [`sampling`]: Categorical sampling shared by both
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────┐      ┌───────────────────────────┐
//! │    Exact Solver           │      │   Monte-Carlo Aggregator   │
//! │  BigRational + FxHashMap  │      │  playouts → counts → CIs   │
//! └─────────────┬─────────────┘      └──────┬──────────────┬──────┘
//!               │                           │              │
//!               │ exact triple              ▼              ▼
//!               │                   ┌──────────────┐ ┌───────────┐
//!               └──────────────────▶│ Convergence  │ │  Wilson   │
//!                                   │    Study     │ │ Interval  │
//!                                   └──────────────┘ └───────────┘
//! ```

#![warn(missing_docs)]

/// Chip race game module.
///
/// Exact and simulated outcome probabilities for the race.
pub mod race;

/// Statistics module.
///
/// Interval estimators and binomial tests.
pub mod stats;

/// Categorical sampling.
pub mod sampling;

// Re-export commonly used types at crate root for convenience
pub use race::{
    exact_probabilities, simulate_many, ExactProbabilities, ExactRace, ExactSolver, FloatRace,
    Outcome, SimulationConfig, SimulationReport, Simulator,
};
pub use stats::{wilson_interval, ConfidenceInterval};
