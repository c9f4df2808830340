//! Repeated-sampling coverage of the Wilson interval.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::stats::binomial::simulate_binomial;
use crate::stats::interval::{wilson_interval, z_value, ConfidenceInterval};
use crate::stats::StatsError;

/// Outcome of a coverage experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Observed success count of each replicate.
    pub counts: Vec<u64>,
    /// Wilson interval of each replicate.
    pub intervals: Vec<ConfidenceInterval>,
    /// Whether each interval contains the true proportion.
    pub covered: Vec<bool>,
    /// Fraction of intervals that cover the true proportion.
    pub rate: f64,
}

/// Draw `m` samples of size `n` from `Bin(n, p_true)` and build a Wilson
/// interval at confidence `gamma` for each.
///
/// Results are reproducible for a given seed; `None` seeds from entropy.
pub fn simulate_wilson_coverage(
    n: u64,
    p_true: f64,
    gamma: f64,
    m: usize,
    seed: Option<u64>,
) -> Result<CoverageReport, StatsError> {
    if !(0.0..=1.0).contains(&p_true) {
        return Err(StatsError::InvalidProbability(p_true));
    }
    let z = z_value(gamma)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let counts = simulate_binomial(n, p_true, m, &mut rng);
    let intervals: Vec<ConfidenceInterval> = counts.iter().map(|&k| wilson_interval(k, n, z)).collect();
    let covered: Vec<bool> = intervals.iter().map(|ci| ci.contains(p_true)).collect();

    let rate = if m == 0 {
        0.0
    } else {
        covered.iter().filter(|&&c| c).count() as f64 / m as f64
    };

    log::debug!(
        "wilson coverage n={} p={} gamma={}: {:.3} over {} replicates",
        n,
        p_true,
        gamma,
        rate,
        m
    );

    Ok(CoverageReport {
        counts,
        intervals,
        covered,
        rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_near_nominal() {
        let report = simulate_wilson_coverage(100, 0.3, 0.95, 5_000, Some(1)).unwrap();
        assert_eq!(report.intervals.len(), 5_000);
        assert_eq!(report.covered.len(), 5_000);
        assert!(
            report.rate > 0.92 && report.rate < 0.98,
            "coverage {} far from 0.95",
            report.rate
        );
    }

    #[test]
    fn test_coverage_is_reproducible() {
        let first = simulate_wilson_coverage(30, 0.5, 0.9, 200, Some(11)).unwrap();
        let second = simulate_wilson_coverage(30, 0.5, 0.9, 200, Some(11)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_coverage_flags_match_intervals() {
        let report = simulate_wilson_coverage(20, 0.1, 0.95, 300, Some(5)).unwrap();
        for (ci, &covered) in report.intervals.iter().zip(report.covered.iter()) {
            assert_eq!(ci.contains(0.1), covered);
        }
    }

    #[test]
    fn test_coverage_rejects_bad_input() {
        assert_eq!(
            simulate_wilson_coverage(20, 1.2, 0.95, 10, Some(1)),
            Err(StatsError::InvalidProbability(1.2))
        );
        assert_eq!(
            simulate_wilson_coverage(20, 0.5, 0.0, 10, Some(1)),
            Err(StatsError::InvalidConfidence(0.0))
        );
        assert_eq!(simulate_wilson_coverage(20, 0.5, 0.95, 0, Some(1)).unwrap().rate, 0.0);
    }
}
