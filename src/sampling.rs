//! Categorical sampling by cumulative-sum inversion.
//!
//! Shared by the race playout (drawing a field) and the binomial samplers
//! (drawing a success count from a pmf table).

use rand::Rng;

/// Sample an index according to a discrete probability distribution.
///
/// Draws `r` uniformly from `[0, 1)` and returns the first index whose
/// running cumulative weight exceeds `r`.
///
/// Weights are used as given, without renormalization. If they sum to less
/// than one and `r` lands past the total, no index qualifies and the draw
/// falls back to index 0.
///
/// # Panics
/// Panics if `weights` is empty.
pub fn sample_categorical<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    assert!(!weights.is_empty(), "cannot sample from an empty distribution");

    let r: f64 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &weight) in weights.iter().enumerate() {
        cumsum += weight;
        if r < cumsum {
            return i;
        }
    }

    0
}
