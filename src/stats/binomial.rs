//! Exact binomial distribution tables and the binomial test.
//!
//! The pmf is built by a multiplicative recursion carried out in log space,
//! so tables stay usable for the few-thousand-trial sizes seen in class
//! without an external statistics library.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sampling::sample_categorical;
use crate::stats::StatsError;

/// Probability mass function of `Bin(n, p)` as a table indexed by `k`.
///
/// `p ≤ 0` puts all mass on 0 and `p ≥ 1` all mass on `n`.
pub fn binomial_pmf(n: u64, p: f64) -> Vec<f64> {
    let size = n as usize + 1;
    let mut pmf = vec![0.0; size];

    if p <= 0.0 {
        pmf[0] = 1.0;
        return pmf;
    }
    if p >= 1.0 {
        pmf[size - 1] = 1.0;
        return pmf;
    }

    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let nf = n as f64;

    // ln C(n, k) accumulated as ln C(n, k-1) + ln((n-k+1)/k).
    let mut ln_choose = 0.0;
    for (k, mass) in pmf.iter_mut().enumerate() {
        if k > 0 {
            let kf = k as f64;
            ln_choose += (nf - kf + 1.0).ln() - kf.ln();
        }
        let kf = k as f64;
        *mass = (ln_choose + kf * ln_p + (nf - kf) * ln_q).exp();
    }

    pmf
}

/// Upper tail `P(X ≥ k)`; zero for `k > n`.
pub fn binomial_sf(k: u64, n: u64, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    binomial_pmf(n, p)[k as usize..].iter().sum()
}

/// Lower tail `P(X ≤ k)`; one for `k ≥ n`.
pub fn binomial_cdf(k: u64, n: u64, p: f64) -> f64 {
    if k >= n {
        return 1.0;
    }
    binomial_pmf(n, p)[..=k as usize].iter().sum()
}

/// Which side(s) of the distribution reject the null hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tail {
    /// Reject for large counts: `K = {k ≥ k_right}`.
    #[default]
    Right,
    /// Reject for small counts: `K = {k ≤ k_left}`.
    Left,
    /// Reject in both tails with `α/2` each.
    Two,
}

/// A binomial test of `H0: p = p0` with `n` trials at level `alpha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinomialTest {
    /// Number of trials.
    pub n: u64,
    /// Success probability under the null hypothesis.
    pub p0: f64,
    /// Significance level.
    pub alpha: f64,
    /// Rejection side.
    pub tail: Tail,
}

impl BinomialTest {
    /// Create a validated test description.
    pub fn new(n: u64, p0: f64, alpha: f64, tail: Tail) -> Result<Self, StatsError> {
        let test = Self { n, p0, alpha, tail };
        test.validate()?;
        Ok(test)
    }

    /// Validate the test parameters.
    pub fn validate(&self) -> Result<(), StatsError> {
        if !(0.0..=1.0).contains(&self.p0) {
            return Err(StatsError::InvalidProbability(self.p0));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(StatsError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

/// Rejection region of a binomial test.
///
/// A missing bound means that side rejects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriticalRegion {
    /// Largest rejected count in the left tail.
    pub k_left: Option<u64>,
    /// Smallest rejected count in the right tail.
    pub k_right: Option<u64>,
}

impl CriticalRegion {
    /// Whether `k` falls in the rejection region.
    pub fn rejects(&self, k: u64) -> bool {
        self.k_left.is_some_and(|left| k <= left) || self.k_right.is_some_and(|right| k >= right)
    }

    /// Whether neither tail rejects anything.
    pub fn is_empty(&self) -> bool {
        self.k_left.is_none() && self.k_right.is_none()
    }
}

/// Critical region of `test` under `Bin(n, p0)`.
///
/// - right: smallest `k` with `P(X ≥ k) ≤ α`
/// - left: largest `k` with `P(X ≤ k) ≤ α`, scanning up from zero
/// - two: both cut-offs at `α/2`
pub fn critical_region(test: &BinomialTest) -> Result<CriticalRegion, StatsError> {
    test.validate()?;

    let pmf = binomial_pmf(test.n, test.p0);
    let region = match test.tail {
        Tail::Right => CriticalRegion {
            k_left: None,
            k_right: right_cutoff(&pmf, test.alpha),
        },
        Tail::Left => CriticalRegion {
            k_left: left_cutoff(&pmf, test.alpha),
            k_right: None,
        },
        Tail::Two => {
            let half = test.alpha / 2.0;
            CriticalRegion {
                k_left: left_cutoff(&pmf, half),
                k_right: right_cutoff(&pmf, half),
            }
        }
    };

    log::debug!(
        "critical region for n={} p0={} alpha={} {:?}: {:?}",
        test.n,
        test.p0,
        test.alpha,
        test.tail,
        region
    );

    Ok(region)
}

fn right_cutoff(pmf: &[f64], level: f64) -> Option<u64> {
    (0..pmf.len())
        .find(|&k| pmf[k..].iter().sum::<f64>() <= level)
        .map(|k| k as u64)
}

fn left_cutoff(pmf: &[f64], level: f64) -> Option<u64> {
    let mut cdf = 0.0;
    let mut cutoff = None;
    for (k, mass) in pmf.iter().enumerate() {
        cdf += mass;
        if cdf <= level {
            cutoff = Some(k as u64);
        } else {
            break;
        }
    }
    cutoff
}

/// Exact probability of landing in `region` under the null hypothesis.
pub fn exact_size(test: &BinomialTest, region: &CriticalRegion) -> f64 {
    binomial_pmf(test.n, test.p0)
        .iter()
        .enumerate()
        .filter(|&(k, _)| region.rejects(k as u64))
        .map(|(_, mass)| mass)
        .sum()
}

/// Draw `runs` counts from `Bin(n, p)`.
pub fn simulate_binomial<R: Rng + ?Sized>(n: u64, p: f64, runs: usize, rng: &mut R) -> Vec<u64> {
    let pmf = binomial_pmf(n, p);
    (0..runs)
        .map(|_| sample_categorical(&pmf, rng) as u64)
        .collect()
}

/// Fraction of `samples` rejected by `region` on the given side(s).
///
/// An empty region or an empty sample gives 0.
pub fn alpha_hat(samples: &[u64], region: &CriticalRegion, tail: Tail) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let effective = match tail {
        Tail::Right => CriticalRegion {
            k_left: None,
            ..*region
        },
        Tail::Left => CriticalRegion {
            k_right: None,
            ..*region
        },
        Tail::Two => *region,
    };
    if effective.is_empty() {
        return 0.0;
    }

    let rejected = samples.iter().filter(|&&k| effective.rejects(k)).count();
    rejected as f64 / samples.len() as f64
}

/// Display window `mu ± nsigma·sigma`, clamped to `[0, n]`.
///
/// Returns `(lo, hi, mu, sigma)`. A degenerate distribution shows the full
/// range.
pub fn window_mu_sigma(n: u64, p: f64, nsigma: f64) -> (u64, u64, f64, f64) {
    let nf = n as f64;
    let mu = nf * p;
    let sigma = (nf * p * (1.0 - p)).sqrt();
    if sigma.is_nan() || sigma <= 0.0 {
        return (0, n, mu, sigma);
    }

    let lo = (mu - nsigma * sigma).floor().max(0.0) as u64;
    let hi = ((mu + nsigma * sigma).ceil() as u64).min(n);
    (lo, hi, mu, sigma)
}
