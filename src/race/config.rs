//! Configuration for race games and Monte-Carlo runs.
//!
//! A [`RaceConfig`] bundles the field distribution with both chip vectors.
//! It comes in two flavours sharing one shape:
//! - `RaceConfig<f64>` for simulation, weights summing to 1 within tolerance
//! - `RaceConfig<BigRational>` for the exact solver, weights summing to exactly 1

use num::traits::{ToPrimitive, Zero};
use num::{BigInt, BigRational, One};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{z_value, StatsError};

/// Absolute tolerance on the float weight sum.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Errors raised when a game or simulation configuration is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The field distribution has no entries.
    #[error("field distribution is empty")]
    NoFields,
    /// A chip vector does not have one slot per field.
    #[error("chip vector {competitor} has {len} slots but there are {fields} fields")]
    LengthMismatch {
        /// Which competitor ('A' or 'B').
        competitor: char,
        /// Length of the offending chip vector.
        len: usize,
        /// Number of fields.
        fields: usize,
    },
    /// A weight is negative (or not finite on the float path).
    #[error("weight {weight} of field {field} is negative or not finite")]
    InvalidWeight {
        /// Field index.
        field: usize,
        /// The weight as written.
        weight: String,
    },
    /// A fraction was given with a zero denominator.
    #[error("fraction {numer}/0 of field {field} has a zero denominator")]
    ZeroDenominator {
        /// Field index.
        field: usize,
        /// Numerator of the fraction.
        numer: u64,
    },
    /// Both competitors hold chips on fields that are never drawn, so the
    /// race cannot end.
    #[error("neither side can finish: A needs zero-weight field {field_a}, B needs zero-weight field {field_b}")]
    Unfinishable {
        /// A zero-weight field where A holds chips.
        field_a: usize,
        /// A zero-weight field where B holds chips.
        field_b: usize,
    },
    /// Weights do not add up to one.
    #[error("field weights sum to {sum}, expected 1")]
    WeightSum {
        /// The actual sum as written.
        sum: String,
    },
    /// z-score is not a usable positive number.
    #[error("z-score {0} must be positive and finite")]
    InvalidZ(f64),
}

/// Race game with float weights, used for simulation.
pub type FloatRace = RaceConfig<f64>;

/// Race game with exact rational weights, used by the exact solver.
pub type ExactRace = RaceConfig<BigRational>;

/// A validated race game: field weights plus the two chip vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceConfig<W> {
    weights: Vec<W>,
    chips_a: Vec<u32>,
    chips_b: Vec<u32>,
}

impl<W> RaceConfig<W> {
    /// Field weights.
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Chips competitor A must shed, per field.
    pub fn chips_a(&self) -> &[u32] {
        &self.chips_a
    }

    /// Chips competitor B must shed, per field.
    pub fn chips_b(&self) -> &[u32] {
        &self.chips_b
    }

    /// Number of fields.
    pub fn num_fields(&self) -> usize {
        self.weights.len()
    }

    /// Upper bound `∏(A[j]+1)·∏(B[j]+1)` on the number of `(V, W)` states.
    ///
    /// Saturates at `u128::MAX`.
    pub fn state_space_bound(&self) -> u128 {
        self.chips_a
            .iter()
            .chain(self.chips_b.iter())
            .fold(1u128, |acc, &c| acc.saturating_mul(c as u128 + 1))
    }

    fn check_shape(num_weights: usize, chips_a: &[u32], chips_b: &[u32]) -> Result<(), ConfigError> {
        if num_weights == 0 {
            return Err(ConfigError::NoFields);
        }
        for (competitor, chips) in [('A', chips_a), ('B', chips_b)] {
            if chips.len() != num_weights {
                return Err(ConfigError::LengthMismatch {
                    competitor,
                    len: chips.len(),
                    fields: num_weights,
                });
            }
        }
        Ok(())
    }

    /// At least one side must be able to finish. A side holding chips on a
    /// zero-weight field never does.
    fn check_finishable(zero_weight: &[bool], chips_a: &[u32], chips_b: &[u32]) -> Result<(), ConfigError> {
        match (stuck_field(zero_weight, chips_a), stuck_field(zero_weight, chips_b)) {
            (Some(field_a), Some(field_b)) => Err(ConfigError::Unfinishable { field_a, field_b }),
            _ => Ok(()),
        }
    }
}

fn stuck_field(zero_weight: &[bool], chips: &[u32]) -> Option<usize> {
    zero_weight
        .iter()
        .zip(chips)
        .position(|(&zero, &c)| zero && c > 0)
}

impl<W: Clone> RaceConfig<W> {
    /// The same game with the competitors' roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            weights: self.weights.clone(),
            chips_a: self.chips_b.clone(),
            chips_b: self.chips_a.clone(),
        }
    }
}

impl RaceConfig<f64> {
    /// Create a float-weighted game for simulation.
    ///
    /// # Errors
    /// Fails if there are no fields, a chip vector has the wrong length, a
    /// weight is negative or not finite, or the weights do not sum to 1
    /// within [`WEIGHT_SUM_TOLERANCE`]. Also fails with
    /// [`ConfigError::Unfinishable`] when both sides hold chips on
    /// zero-weight fields, since no playout of that game ever ends.
    pub fn new(weights: Vec<f64>, chips_a: Vec<u32>, chips_b: Vec<u32>) -> Result<Self, ConfigError> {
        Self::check_shape(weights.len(), &chips_a, &chips_b)?;

        for (field, &weight) in weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    field,
                    weight: weight.to_string(),
                });
            }
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                sum: sum.to_string(),
            });
        }

        let zero_weight: Vec<bool> = weights.iter().map(|&w| w == 0.0).collect();
        Self::check_finishable(&zero_weight, &chips_a, &chips_b)?;

        Ok(Self {
            weights,
            chips_a,
            chips_b,
        })
    }
}

impl RaceConfig<BigRational> {
    /// Create an exactly weighted game for the exact solver.
    ///
    /// # Errors
    /// Fails on shape problems, negative weights, a weight sum that is not
    /// exactly 1, or a game neither side can finish.
    pub fn new(
        weights: Vec<BigRational>,
        chips_a: Vec<u32>,
        chips_b: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        Self::check_shape(weights.len(), &chips_a, &chips_b)?;

        for (field, weight) in weights.iter().enumerate() {
            if weight < &BigRational::zero() {
                return Err(ConfigError::InvalidWeight {
                    field,
                    weight: weight.to_string(),
                });
            }
        }

        let sum = weights
            .iter()
            .fold(BigRational::zero(), |acc, w| acc + w);
        if !sum.is_one() {
            return Err(ConfigError::WeightSum {
                sum: sum.to_string(),
            });
        }

        let zero_weight: Vec<bool> = weights.iter().map(|w| w.is_zero()).collect();
        Self::check_finishable(&zero_weight, &chips_a, &chips_b)?;

        Ok(Self {
            weights,
            chips_a,
            chips_b,
        })
    }

    /// Create an exact game from `(numerator, denominator)` pairs.
    pub fn from_fractions(
        fractions: &[(u64, u64)],
        chips_a: Vec<u32>,
        chips_b: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        let weights = fractions
            .iter()
            .enumerate()
            .map(|(field, &(numer, denom))| {
                if denom == 0 {
                    Err(ConfigError::ZeroDenominator { field, numer })
                } else {
                    Ok(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(weights, chips_a, chips_b)
    }

    /// Float copy of this game for the Monte-Carlo path.
    ///
    /// Exact weights already sum to one, so the float weights are within
    /// round-off of one and are not revalidated.
    pub fn to_float(&self) -> FloatRace {
        RaceConfig {
            weights: self.weights.iter().map(rational_to_f64).collect(),
            chips_a: self.chips_a.clone(),
            chips_b: self.chips_b.clone(),
        }
    }
}

/// Nearest `f64` to an exact rational.
pub(crate) fn rational_to_f64(value: &BigRational) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Settings for a batch of Monte-Carlo playouts.
///
/// # Example
/// ```
/// use chip_race::race::SimulationConfig;
///
/// let config = SimulationConfig::default().with_runs(500).with_seed(7);
/// assert_eq!(config.runs, 500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent playouts.
    pub runs: u64,

    /// Two-sided z-score for the Wilson intervals (1.96 for 95 %).
    pub z: f64,

    /// Random seed for reproducibility.
    ///
    /// If `None`, the generator is seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: 10_000,
            z: 1.96,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new SimulationConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of playouts.
    pub fn with_runs(mut self, runs: u64) -> Self {
        self.runs = runs;
        self
    }

    /// Builder method: set the z-score directly.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// Builder method: derive the z-score from a two-sided confidence level.
    pub fn with_confidence(mut self, gamma: f64) -> Result<Self, StatsError> {
        self.z = z_value(gamma)?;
        Ok(self)
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_z(self.z)
    }
}

/// Reject a z-score that is not positive and finite.
pub(crate) fn validate_z(z: f64) -> Result<(), ConfigError> {
    if !z.is_finite() || z <= 0.0 {
        return Err(ConfigError::InvalidZ(z));
    }
    Ok(())
}

/// Timing statistics for a batch of playouts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Playouts completed.
    pub runs: u64,

    /// Total time spent simulating (in seconds).
    pub elapsed_seconds: f64,

    /// Playouts per second.
    pub runs_per_second: f64,
}

impl SimulationStats {
    /// Update playouts per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.runs_per_second = self.runs as f64 / self.elapsed_seconds;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_config_accepts_valid_game() {
        let config = FloatRace::new(vec![0.25, 0.75], vec![1, 2], vec![2, 0]).unwrap();
        assert_eq!(config.num_fields(), 2);
        assert_eq!(config.chips_a(), &[1, 2]);
        assert_eq!(config.state_space_bound(), 2 * 3 * 3);
    }

    #[test]
    fn test_float_config_rejects_bad_input() {
        assert_eq!(
            FloatRace::new(vec![], vec![], vec![]),
            Err(ConfigError::NoFields)
        );
        assert!(matches!(
            FloatRace::new(vec![0.5, 0.5], vec![1], vec![1, 1]),
            Err(ConfigError::LengthMismatch { competitor: 'A', len: 1, fields: 2 })
        ));
        assert!(matches!(
            FloatRace::new(vec![1.5, -0.5], vec![1, 1], vec![1, 1]),
            Err(ConfigError::InvalidWeight { field: 1, .. })
        ));
        assert!(matches!(
            FloatRace::new(vec![0.5, 0.4], vec![1, 1], vec![1, 1]),
            Err(ConfigError::WeightSum { .. })
        ));
        assert!(matches!(
            FloatRace::new(vec![f64::NAN, 1.0], vec![1, 1], vec![1, 1]),
            Err(ConfigError::InvalidWeight { field: 0, .. })
        ));
    }

    #[test]
    fn test_config_rejects_unfinishable_game() {
        // Field 1 is never drawn and both sides need it.
        assert_eq!(
            FloatRace::new(vec![1.0, 0.0], vec![0, 1], vec![0, 1]),
            Err(ConfigError::Unfinishable { field_a: 1, field_b: 1 })
        );
        assert_eq!(
            FloatRace::new(vec![0.0, 1.0, 0.0], vec![1, 1, 0], vec![0, 2, 3]),
            Err(ConfigError::Unfinishable { field_a: 0, field_b: 2 })
        );
        assert_eq!(
            ExactRace::from_fractions(&[(1, 1), (0, 1)], vec![2, 1], vec![1, 1]),
            Err(ConfigError::Unfinishable { field_a: 1, field_b: 1 })
        );

        // One stuck side is fine: the other side still finishes.
        assert!(FloatRace::new(vec![1.0, 0.0], vec![2, 0], vec![0, 1]).is_ok());
        assert!(ExactRace::from_fractions(&[(1, 1), (0, 1)], vec![3, 0], vec![0, 1]).is_ok());
    }

    #[test]
    fn test_float_config_tolerates_round_off() {
        let third = 1.0 / 3.0;
        assert!(FloatRace::new(vec![third; 3], vec![1; 3], vec![1; 3]).is_ok());
    }

    #[test]
    fn test_exact_config_requires_exact_sum() {
        assert!(ExactRace::from_fractions(&[(1, 3), (2, 3)], vec![1, 1], vec![1, 1]).is_ok());
        assert!(matches!(
            ExactRace::from_fractions(&[(1, 3), (1, 3)], vec![1, 1], vec![1, 1]),
            Err(ConfigError::WeightSum { .. })
        ));
        assert_eq!(
            ExactRace::from_fractions(&[(1, 0), (1, 1)], vec![1, 1], vec![1, 1]),
            Err(ConfigError::ZeroDenominator { field: 0, numer: 1 })
        );
    }

    #[test]
    fn test_exact_to_float_and_swap() {
        let exact = ExactRace::from_fractions(&[(1, 4), (3, 4)], vec![2, 0], vec![0, 1]).unwrap();
        let float = exact.to_float();
        assert_eq!(float.weights(), &[0.25, 0.75]);

        let swapped = exact.swapped();
        assert_eq!(swapped.chips_a(), &[0, 1]);
        assert_eq!(swapped.chips_b(), &[2, 0]);
        assert_eq!(swapped.weights(), exact.weights());
    }

    #[test]
    fn test_simulation_config_builders() {
        let config = SimulationConfig::new().with_runs(50).with_z(2.58).with_seed(3);
        assert_eq!(config.runs, 50);
        assert_eq!(config.z, 2.58);
        assert_eq!(config.seed, Some(3));
        assert!(config.validate().is_ok());

        assert_eq!(
            SimulationConfig::default().with_z(0.0).validate(),
            Err(ConfigError::InvalidZ(0.0))
        );

        let from_gamma = SimulationConfig::default().with_confidence(0.95).unwrap();
        assert!((from_gamma.z - 1.959964).abs() < 1e-5);
    }
}
