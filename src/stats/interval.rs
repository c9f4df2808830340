//! Confidence intervals for a binomial proportion.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::stats::binomial::{binomial_cdf, binomial_sf};
use crate::stats::StatsError;

/// Bisection steps for the Clopper–Pearson bounds (well below f64 resolution).
const BISECTION_STEPS: usize = 100;

/// A two-sided interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl ConfidenceInterval {
    /// Degenerate `(0, 0)` interval used when there are no observations.
    pub const EMPTY: ConfidenceInterval = ConfidenceInterval { low: 0.0, high: 0.0 };

    /// Create an interval from its bounds.
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `high - low`.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies in the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Two-sided standard-normal quantile for confidence level `gamma`.
///
/// Returns `Φ⁻¹(1 − (1 − gamma)/2)`, so `z_value(0.95) ≈ 1.96`.
pub fn z_value(gamma: f64) -> Result<f64, StatsError> {
    if !(gamma > 0.0 && gamma < 1.0) {
        return Err(StatsError::InvalidConfidence(gamma));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|_| StatsError::InvalidConfidence(gamma))?;
    let alpha = 1.0 - gamma;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Wilson score interval for `k` successes in `n` trials.
///
/// No observations (`n = 0`) gives the empty `(0, 0)` interval. The bounds
/// are not clamped to `[0, 1]`; the formula stays inside that range up to
/// round-off.
pub fn wilson_interval(k: u64, n: u64, z: f64) -> ConfidenceInterval {
    if n == 0 {
        return ConfidenceInterval::EMPTY;
    }

    let n = n as f64;
    let phat = k as f64 / n;
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (phat + z2 / (2.0 * n)) / denom;
    let halfwidth = (z / denom) * (phat * (1.0 - phat) / n + z2 / (4.0 * n * n)).sqrt();

    ConfidenceInterval::new(center - halfwidth, center + halfwidth)
}

/// Wald (normal approximation) interval `p̂ ± z·sqrt(p̂(1−p̂)/n)`.
///
/// Unclamped, so it can leave `[0, 1]` near the boundaries.
pub fn wald_interval(k: u64, n: u64, z: f64) -> ConfidenceInterval {
    if n == 0 {
        return ConfidenceInterval::EMPTY;
    }

    let n = n as f64;
    let phat = k as f64 / n;
    let halfwidth = z * (phat * (1.0 - phat) / n).sqrt();

    ConfidenceInterval::new(phat - halfwidth, phat + halfwidth)
}

/// Clopper–Pearson (exact) interval at confidence level `gamma`.
///
/// The lower bound solves `P(X ≥ k | p) = α/2`, the upper bound
/// `P(X ≤ k | p) = α/2`, both by bisection on the exact binomial tails.
/// With no trials nothing is known and the interval is `[0, 1]`.
pub fn clopper_pearson_interval(k: u64, n: u64, gamma: f64) -> Result<ConfidenceInterval, StatsError> {
    if !(gamma > 0.0 && gamma < 1.0) {
        return Err(StatsError::InvalidConfidence(gamma));
    }
    if k > n {
        return Err(StatsError::CountExceedsTrials { k, n });
    }
    if n == 0 {
        return Ok(ConfidenceInterval::new(0.0, 1.0));
    }

    let half_alpha = (1.0 - gamma) / 2.0;

    // P(X >= k | p) grows with p.
    let low = if k == 0 {
        0.0
    } else {
        bisect(|p| binomial_sf(k, n, p) < half_alpha)
    };

    // P(X <= k | p) shrinks with p.
    let high = if k == n {
        1.0
    } else {
        bisect(|p| binomial_cdf(k, n, p) > half_alpha)
    };

    Ok(ConfidenceInterval::new(low, high))
}

/// Boundary in `[0, 1]` where `below(p)` switches from true to false.
fn bisect<F: Fn(f64) -> bool>(below: F) -> f64 {
    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if below(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Interval construction methods compared in class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalMethod {
    /// Normal approximation around `p̂`.
    Wald,
    /// Wilson score interval.
    Wilson,
    /// Exact interval from binomial tails.
    ClopperPearson,
}

impl IntervalMethod {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            IntervalMethod::Wald => "Wald",
            IntervalMethod::Wilson => "Wilson",
            IntervalMethod::ClopperPearson => "Clopper–Pearson",
        }
    }
}

/// One row of a method comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInterval {
    /// Construction method.
    pub method: IntervalMethod,
    /// Resulting interval.
    pub interval: ConfidenceInterval,
    /// Interval width.
    pub width: f64,
}

/// Wald, Wilson and Clopper–Pearson intervals for the same data, in that order.
pub fn all_intervals(k: u64, n: u64, gamma: f64) -> Result<Vec<MethodInterval>, StatsError> {
    let z = z_value(gamma)?;
    let rows = [
        (IntervalMethod::Wald, wald_interval(k, n, z)),
        (IntervalMethod::Wilson, wilson_interval(k, n, z)),
        (IntervalMethod::ClopperPearson, clopper_pearson_interval(k, n, gamma)?),
    ];

    Ok(rows
        .into_iter()
        .map(|(method, interval)| MethodInterval {
            method,
            interval,
            width: interval.width(),
        })
        .collect())
}
