//! Interval estimation and binomial testing.
//!
//! The Wilson interval validates the race simulation; the remaining
//! modules cover the binomial side of the course material:
//!
//! - [`interval`]: Wilson, Wald and Clopper–Pearson intervals, z from a
//!   confidence level
//! - [`binomial`]: exact pmf tables, critical regions, rejection rates
//! - [`band`]: prediction band `p ± z·σ(p)` and its inversion to an interval
//! - [`coverage`]: repeated-sampling coverage of the Wilson interval

use thiserror::Error;

pub mod band;
pub mod binomial;
pub mod coverage;
pub mod interval;

pub use band::{band_sections, invert_band, prediction_band, DEFAULT_BAND_GRID};
pub use binomial::{
    alpha_hat, binomial_cdf, binomial_pmf, binomial_sf, critical_region, exact_size,
    simulate_binomial, window_mu_sigma, BinomialTest, CriticalRegion, Tail,
};
pub use coverage::{simulate_wilson_coverage, CoverageReport};
pub use interval::{
    all_intervals, clopper_pearson_interval, wald_interval, wilson_interval, z_value,
    ConfidenceInterval, IntervalMethod, MethodInterval,
};

/// Errors raised for statistics inputs outside their domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Confidence level must lie strictly between 0 and 1.
    #[error("confidence level {0} is outside (0, 1)")]
    InvalidConfidence(f64),
    /// Probability must lie in [0, 1].
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    /// Significance level must lie strictly between 0 and 1.
    #[error("significance level {0} is outside (0, 1)")]
    InvalidAlpha(f64),
    /// Search grid needs at least two points.
    #[error("grid must have at least 2 points, got {0}")]
    InvalidGrid(usize),
    /// Observed count exceeds the number of trials.
    #[error("observed {k} successes in only {n} trials")]
    CountExceedsTrials {
        /// Successes.
        k: u64,
        /// Trials.
        n: u64,
    },
}
