//! Monte-Carlo estimation of race outcome probabilities.
//!
//! Many independent playouts are tallied into empirical frequencies, each
//! reported with a Wilson confidence interval. A convergence study repeats
//! this over several seeds and run counts and measures the distance to the
//! exact answer.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::race::config::{validate_z, ConfigError, FloatRace, SimulationConfig, SimulationStats};
use crate::race::exact::ExactProbabilities;
use crate::race::game::Outcome;
use crate::race::playout::play_once;
use crate::stats::interval::{wilson_interval, ConfidenceInterval};

/// Simulated frequency of one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEstimate {
    /// Number of playouts ending in this outcome.
    pub count: u64,
    /// Empirical proportion `count / runs`.
    pub p_hat: f64,
    /// Lower Wilson bound.
    pub ci_low: f64,
    /// Upper Wilson bound.
    pub ci_high: f64,
}

impl OutcomeEstimate {
    fn from_count(count: u64, runs: u64, z: f64) -> Self {
        let p_hat = if runs == 0 {
            0.0
        } else {
            count as f64 / runs as f64
        };
        let ConfidenceInterval { low, high } = wilson_interval(count, runs, z);

        Self {
            count,
            p_hat,
            ci_low: low,
            ci_high: high,
        }
    }

    /// Wilson interval as a value.
    pub fn interval(&self) -> ConfidenceInterval {
        ConfidenceInterval::new(self.ci_low, self.ci_high)
    }
}

/// Estimates for all three outcomes of a batch of playouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Playouts run.
    pub runs: u64,
    /// z-score used for the intervals.
    pub z: f64,
    /// A finished first.
    pub a_wins: OutcomeEstimate,
    /// B finished first.
    pub b_wins: OutcomeEstimate,
    /// Both finished on the same draw.
    pub tie: OutcomeEstimate,
}

impl SimulationReport {
    /// Tally raw outcome counts (indexed as [`Outcome::ALL`]) into estimates.
    pub fn from_counts(counts: [u64; 3], z: f64) -> Self {
        let runs = counts.iter().sum();
        Self {
            runs,
            z,
            a_wins: OutcomeEstimate::from_count(counts[0], runs, z),
            b_wins: OutcomeEstimate::from_count(counts[1], runs, z),
            tie: OutcomeEstimate::from_count(counts[2], runs, z),
        }
    }

    /// Estimate for one outcome.
    pub fn get(&self, outcome: Outcome) -> &OutcomeEstimate {
        match outcome {
            Outcome::AWins => &self.a_wins,
            Outcome::BWins => &self.b_wins,
            Outcome::Tie => &self.tie,
        }
    }

    /// Estimates in [`Outcome::ALL`] order.
    pub fn estimates(&self) -> [&OutcomeEstimate; 3] {
        [&self.a_wins, &self.b_wins, &self.tie]
    }
}

/// Run `runs` playouts and report each outcome's frequency with a Wilson
/// interval at z-score `z`.
///
/// Zero runs yield zero frequencies with `(0, 0)` intervals.
///
/// # Errors
/// Fails with [`ConfigError::InvalidZ`] unless `z` is positive and finite.
pub fn simulate_many<R: Rng + ?Sized>(
    config: &FloatRace,
    runs: u64,
    z: f64,
    rng: &mut R,
) -> Result<SimulationReport, ConfigError> {
    validate_z(z)?;
    Ok(tally(config, runs, z, rng))
}

fn tally<R: Rng + ?Sized>(config: &FloatRace, runs: u64, z: f64, rng: &mut R) -> SimulationReport {
    let mut counts = [0u64; 3];
    for _ in 0..runs {
        counts[play_once(config, rng).index()] += 1;
    }
    SimulationReport::from_counts(counts, z)
}

/// Owns a game, simulation settings and a random generator.
///
/// # Example
/// ```
/// use chip_race::race::{FloatRace, SimulationConfig, Simulator};
///
/// let game = FloatRace::new(vec![0.5, 0.5], vec![1, 0], vec![0, 1]).unwrap();
/// let mut sim = Simulator::new(game, SimulationConfig::default().with_runs(1_000).with_seed(1)).unwrap();
/// let report = sim.run();
/// assert_eq!(report.runs, 1_000);
/// ```
pub struct Simulator {
    /// The game being simulated.
    game: FloatRace,

    /// Configuration for the simulator.
    config: SimulationConfig,

    /// Random number generator.
    rng: StdRng,

    /// Statistics of the last batch.
    stats: SimulationStats,
}

impl Simulator {
    /// Create a simulator, seeding from the config or from entropy.
    pub fn new(game: FloatRace, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            game,
            config,
            rng,
            stats: SimulationStats::default(),
        })
    }

    /// Play a single game with the simulator's generator.
    pub fn play_once(&mut self) -> Outcome {
        play_once(&self.game, &mut self.rng)
    }

    /// Run the configured number of playouts.
    pub fn run(&mut self) -> SimulationReport {
        self.run_with_callback(0, |_| {})
    }

    /// Run the configured number of playouts, reporting progress.
    ///
    /// `callback` receives the number of completed playouts every
    /// `callback_interval` playouts (never, if the interval is 0).
    pub fn run_with_callback<F>(&mut self, callback_interval: u64, mut callback: F) -> SimulationReport
    where
        F: FnMut(u64),
    {
        let start_time = Instant::now();
        let mut counts = [0u64; 3];

        for i in 0..self.config.runs {
            counts[play_once(&self.game, &mut self.rng).index()] += 1;

            if callback_interval > 0 && (i + 1) % callback_interval == 0 {
                callback(i + 1);
            }
        }

        self.stats = SimulationStats {
            runs: self.config.runs,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            runs_per_second: 0.0,
        };
        self.stats.update_rate();

        log::debug!(
            "simulated {} playouts in {:.3}s ({:.0}/s)",
            self.stats.runs,
            self.stats.elapsed_seconds,
            self.stats.runs_per_second
        );

        SimulationReport::from_counts(counts, self.config.z)
    }

    /// Get reference to the game.
    pub fn game(&self) -> &FloatRace {
        &self.game
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Statistics of the most recent batch.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }
}

/// Agreement between simulation and exact answer at one run count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// Playouts per repeat.
    pub runs: u64,
    /// Number of independently seeded repeats.
    pub repeats: usize,
    /// Mean of `|p_hat − exact|` over outcomes and repeats.
    pub mean_abs_deviation: f64,
    /// Fraction of Wilson intervals containing the exact value.
    pub exact_coverage: f64,
}

/// Measure how simulated frequencies approach the exact probabilities.
///
/// For every entry of `run_counts`, `repeats` simulations are run in
/// parallel; repeat `i` is seeded with `base_seed + i`, so the study is
/// deterministic regardless of thread scheduling.
///
/// # Errors
/// Fails with [`ConfigError::InvalidZ`] unless `z` is positive and finite.
pub fn convergence_study(
    game: &FloatRace,
    exact: &ExactProbabilities,
    run_counts: &[u64],
    repeats: usize,
    z: f64,
    base_seed: u64,
) -> Result<Vec<ConvergencePoint>, ConfigError> {
    validate_z(z)?;
    let exact_values = exact.to_f64();

    let points: Vec<ConvergencePoint> = run_counts
        .iter()
        .map(|&runs| {
            let reports: Vec<SimulationReport> = (0..repeats)
                .into_par_iter()
                .map(|i| {
                    let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
                    tally(game, runs, z, &mut rng)
                })
                .collect();

            let mut deviation = 0.0;
            let mut covered = 0usize;
            for report in &reports {
                for (estimate, &exact_value) in report.estimates().iter().zip(exact_values.iter()) {
                    deviation += (estimate.p_hat - exact_value).abs();
                    if estimate.interval().contains(exact_value) {
                        covered += 1;
                    }
                }
            }

            let cells = (repeats * Outcome::ALL.len()).max(1) as f64;
            let point = ConvergencePoint {
                runs,
                repeats,
                mean_abs_deviation: deviation / cells,
                exact_coverage: covered as f64 / cells,
            };

            log::info!(
                "n_runs={}: mean |p_hat - exact| = {:.5}, exact value inside CI {:.1}%",
                point.runs,
                point.mean_abs_deviation,
                point.exact_coverage * 100.0
            );

            point
        })
        .collect();

    Ok(points)
}
