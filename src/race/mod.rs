//! Chip race game: exact solver and Monte-Carlo counterpart.
//!
//! # Overview
//!
//! Two competitors hold chips on a set of weighted fields. Each round one
//! field is drawn at random and both competitors drop a chip there if they
//! still have one. Whoever runs out of chips first wins; running out on the
//! same draw is a tie.
//!
//! The module answers "how likely is each outcome?" twice:
//!
//! 1. [`exact`]: memoized recursion over exact rationals, no error at all
//! 2. [`simulation`]: many random playouts with Wilson intervals
//!
//! Comparing the two is the point of the exercise: the exact triple is the
//! ground truth the simulated intervals should cover.
//!
//! # Example
//!
//! ```
//! use chip_race::race::{exact_probabilities, simulate_many, ExactRace};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let game = ExactRace::from_fractions(&[(1, 2), (1, 2)], vec![1, 0], vec![0, 1]).unwrap();
//! let exact = exact_probabilities(&game);
//! println!("{}", exact);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let report = simulate_many(&game.to_float(), 10_000, 1.96, &mut rng).unwrap();
//! assert_eq!(report.a_wins.count + report.b_wins.count, 10_000);
//! assert_eq!(report.tie.count, 0);
//! ```

pub mod config;
pub mod exact;
pub mod game;
pub mod playout;
pub mod simulation;

// Re-export main types for convenient access
pub use config::{
    ConfigError, ExactRace, FloatRace, RaceConfig, SimulationConfig, SimulationStats,
    WEIGHT_SUM_TOLERANCE,
};
pub use exact::{exact_probabilities, ExactProbabilities, ExactSolver};
pub use game::Outcome;
pub use playout::play_once;
pub use simulation::{
    convergence_study, simulate_many, ConvergencePoint, OutcomeEstimate, SimulationReport, Simulator,
};
