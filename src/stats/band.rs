//! Prediction band for the sample proportion and its inversion.
//!
//! For each true `p`, the band `p ± z·sqrt(p(1−p)/n)` bounds where the
//! observed proportion `h` usually lands. Reading the band sideways at an
//! observed `h` gives an interval for `p`.

use crate::stats::interval::z_value;
use crate::stats::StatsError;

/// Grid resolution used when none is specified.
pub const DEFAULT_BAND_GRID: usize = 20_001;

/// Lower and upper band edge at `p`.
pub fn prediction_band(p: f64, n: u64, z: f64) -> (f64, f64) {
    let se = (p * (1.0 - p) / n as f64).max(0.0).sqrt();
    (p - z * se, p + z * se)
}

/// Interval of `p` values whose band contains `h_obs`.
///
/// Scans `grid` evenly spaced values of `p` in `[0, 1]` and returns the
/// first and last one inside the band, or `None` if no grid point
/// qualifies.
pub fn invert_band(h_obs: f64, n: u64, gamma: f64, grid: usize) -> Result<Option<(f64, f64)>, StatsError> {
    if grid < 2 {
        return Err(StatsError::InvalidGrid(grid));
    }
    let z = z_value(gamma)?;

    let step = 1.0 / (grid - 1) as f64;
    let mut bounds: Option<(f64, f64)> = None;

    for i in 0..grid {
        let p = i as f64 * step;
        let (lower, upper) = prediction_band(p, n, z);
        if lower <= h_obs && h_obs <= upper {
            bounds = match bounds {
                None => Some((p, p)),
                Some((left, _)) => Some((left, p)),
            };
        }
    }

    Ok(bounds)
}

/// `k` evenly spaced points from `p_left` to `p_right`.
///
/// Bounds given in the wrong order are swapped. Empty when `k` is zero or a
/// bound is not finite.
pub fn band_sections(p_left: f64, p_right: f64, k: usize) -> Vec<f64> {
    if k == 0 || !p_left.is_finite() || !p_right.is_finite() {
        return Vec::new();
    }

    let (lo, hi) = if p_right < p_left {
        (p_right, p_left)
    } else {
        (p_left, p_right)
    };

    if k == 1 {
        return vec![lo];
    }

    let step = (hi - lo) / (k - 1) as f64;
    (0..k).map(|i| lo + i as f64 * step).collect()
}
