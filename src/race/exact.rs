//! Exact outcome probabilities by memoized recursion over rationals.
//!
//! The race is an absorbing Markov chain on chip-vector pairs `(V, W)`.
//! Every state-changing draw removes at least one chip, so the states form
//! a finite DAG and the recursion
//!
//! ```text
//! P(V, W) = Σ_active j  p[j] / s · P(V', W')      s = Σ_active j p[j]
//! ```
//!
//! always terminates. Fields where both sides are done are inert: drawing
//! them changes nothing, so they drop out and the remaining weights are
//! renormalized by `s`.
//!
//! Each field's pair is fixed by how often that field has been drawn, so at
//! most `∏(max(A[j], B[j]) + 1)` states are reachable per orientation.

use std::fmt;

use num::traits::{One, Zero};
use num::BigRational;
use rustc_hash::FxHashMap;

use crate::race::config::{rational_to_f64, ConfigError, ExactRace};
use crate::race::game::{apply_draw, is_active, is_finished, Outcome};

/// Nominal state-space size above which a solve is logged as expensive.
const LARGE_STATE_SPACE: u128 = 10_000_000;

/// Exact probabilities of the three outcomes; they sum to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactProbabilities {
    /// P(A finishes strictly first).
    pub a_wins: BigRational,
    /// P(B finishes strictly first).
    pub b_wins: BigRational,
    /// P(both finish on the same draw).
    pub tie: BigRational,
}

impl ExactProbabilities {
    /// Probability of one outcome.
    pub fn get(&self, outcome: Outcome) -> &BigRational {
        match outcome {
            Outcome::AWins => &self.a_wins,
            Outcome::BWins => &self.b_wins,
            Outcome::Tie => &self.tie,
        }
    }

    /// Nearest floats, in [`Outcome::ALL`] order.
    pub fn to_f64(&self) -> [f64; 3] {
        [
            rational_to_f64(&self.a_wins),
            rational_to_f64(&self.b_wins),
            rational_to_f64(&self.tie),
        ]
    }
}

impl fmt::Display for ExactProbabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P(A) = {}, P(B) = {}, P(tie) = {}",
            self.a_wins, self.b_wins, self.tie
        )
    }
}

/// Memoizing solver bound to one game.
///
/// The memo table persists across calls, so repeated queries against the
/// same game reuse earlier work. Access is through `&mut self`; the solver
/// is meant for one thread at a time.
#[derive(Debug, Clone)]
pub struct ExactSolver {
    /// The game being solved.
    game: ExactRace,

    /// P(first side finishes strictly first), keyed by `V` followed by `W`.
    memo: FxHashMap<Vec<u32>, BigRational>,
}

impl ExactSolver {
    /// Create a solver for `game`.
    pub fn new(game: ExactRace) -> Self {
        let bound = game.state_space_bound();
        if bound > LARGE_STATE_SPACE {
            log::warn!(
                "state space bound {} for chips {:?} vs {:?}; exact solve may be slow",
                bound,
                game.chips_a(),
                game.chips_b()
            );
        }

        Self {
            game,
            memo: FxHashMap::default(),
        }
    }

    /// Solve the configured game.
    ///
    /// `P(A) = P(A, B)` and `P(B) = P(B, A)` come from the same recursion
    /// with the roles exchanged; the tie probability is the exact remainder.
    ///
    /// The starting position is classified before any draw, so a side that
    /// starts with no chips wins outright against a side that has some.
    /// Playouts always draw once first and can report a tie there instead
    /// (see [`play_once`](crate::race::playout::play_once)).
    pub fn solve(&mut self) -> ExactProbabilities {
        let forward = state_key(self.game.chips_a(), self.game.chips_b());
        let backward = state_key(self.game.chips_b(), self.game.chips_a());

        let a_wins = self.first_to_finish(&forward);
        let b_wins = self.first_to_finish(&backward);
        let tie = BigRational::one() - &a_wins - &b_wins;

        log::debug!(
            "exact solve over {} fields: {} memoized states",
            self.game.num_fields(),
            self.memo.len()
        );

        ExactProbabilities { a_wins, b_wins, tie }
    }

    /// Probability that a side holding `v` finishes strictly before a side
    /// holding `w`, playing on this solver's field weights.
    ///
    /// # Errors
    /// Fails if either vector does not have one slot per field.
    pub fn win_probability(&mut self, v: &[u32], w: &[u32]) -> Result<BigRational, ConfigError> {
        let fields = self.game.num_fields();
        for (competitor, chips) in [('A', v), ('B', w)] {
            if chips.len() != fields {
                return Err(ConfigError::LengthMismatch {
                    competitor,
                    len: chips.len(),
                    fields,
                });
            }
        }
        Ok(self.first_to_finish(&state_key(v, w)))
    }

    fn first_to_finish(&mut self, state: &[u32]) -> BigRational {
        let fields = self.game.num_fields();
        let (v, w) = state.split_at(fields);

        match (is_finished(v), is_finished(w)) {
            (true, true) => return BigRational::zero(),
            (true, false) => return BigRational::one(),
            (false, true) => return BigRational::zero(),
            (false, false) => {}
        }

        if let Some(cached) = self.memo.get(state) {
            return cached.clone();
        }

        let mut active_weight = BigRational::zero();
        let mut weighted_sum = BigRational::zero();
        let mut next = state.to_vec();

        for field in 0..fields {
            if !is_active(v, w, field) {
                continue;
            }
            let weight = self.game.weights()[field].clone();
            if weight.is_zero() {
                continue;
            }

            next.copy_from_slice(state);
            let (next_v, next_w) = next.split_at_mut(fields);
            apply_draw(next_v, next_w, field);

            let sub = self.first_to_finish(&next);
            weighted_sum += &weight * sub;
            active_weight += weight;
        }

        let prob = if active_weight.is_zero() {
            BigRational::zero()
        } else {
            weighted_sum / active_weight
        };

        self.memo.insert(state.to_vec(), prob.clone());
        prob
    }

    /// Number of memoized states.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Drop all memoized states.
    pub fn clear(&mut self) {
        self.memo.clear();
    }

    /// Get reference to the game.
    pub fn game(&self) -> &ExactRace {
        &self.game
    }
}

/// Exact outcome probabilities of `game` using a fresh solver.
pub fn exact_probabilities(game: &ExactRace) -> ExactProbabilities {
    ExactSolver::new(game.clone()).solve()
}

fn state_key(v: &[u32], w: &[u32]) -> Vec<u32> {
    let mut key = Vec::with_capacity(v.len() + w.len());
    key.extend_from_slice(v);
    key.extend_from_slice(w);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::BigInt;

    fn ratio(numer: i64, denom: i64) -> BigRational {
        BigRational::new(BigInt::from(numer), BigInt::from(denom))
    }

    fn classroom_game() -> ExactRace {
        ExactRace::from_fractions(
            &[(3, 18), (5, 18), (4, 18), (3, 18), (2, 18), (1, 18)],
            vec![3, 5, 4, 3, 2, 1],
            vec![3, 7, 4, 3, 1, 0],
        )
        .unwrap()
    }

    fn assert_valid(probs: &ExactProbabilities) {
        let total = &probs.a_wins + &probs.b_wins + &probs.tie;
        assert_eq!(total, BigRational::one());
        for outcome in Outcome::ALL {
            let p = probs.get(outcome);
            assert!(p >= &BigRational::zero() && p <= &BigRational::one(), "{} = {}", outcome, p);
        }
    }

    #[test]
    fn test_split_fields_is_a_coin_flip() {
        let game = ExactRace::from_fractions(&[(1, 2), (1, 2)], vec![1, 0], vec![0, 1]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, ratio(1, 2));
        assert_eq!(probs.b_wins, ratio(1, 2));
        assert_eq!(probs.tie, BigRational::zero());
    }

    #[test]
    fn test_single_field_is_a_tie() {
        let game = ExactRace::from_fractions(&[(1, 1)], vec![1], vec![1]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, BigRational::zero());
        assert_eq!(probs.b_wins, BigRational::zero());
        assert_eq!(probs.tie, BigRational::one());
    }

    #[test]
    fn test_shared_field_hand_computed() {
        // Field 0 finishes B at once; field 1 leaves both needing field 0.
        let game = ExactRace::from_fractions(&[(1, 2), (1, 2)], vec![1, 1], vec![1, 0]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, BigRational::zero());
        assert_eq!(probs.b_wins, ratio(1, 2));
        assert_eq!(probs.tie, ratio(1, 2));
    }

    #[test]
    fn test_inert_fields_are_renormalized_away() {
        let game = ExactRace::from_fractions(&[(1, 2), (1, 4), (1, 4)], vec![1, 0, 0], vec![0, 1, 0]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, ratio(2, 3));
        assert_eq!(probs.b_wins, ratio(1, 3));
        assert_eq!(probs.tie, BigRational::zero());
    }

    #[test]
    fn test_more_chips_on_only_field_loses() {
        let game = ExactRace::from_fractions(&[(1, 1)], vec![2], vec![1]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.b_wins, BigRational::one());
        assert_valid(&probs);
    }

    #[test]
    fn test_zero_weight_field_never_helps() {
        // B needs field 1, which is never drawn.
        let game = ExactRace::from_fractions(&[(1, 1), (0, 1)], vec![3, 0], vec![0, 1]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, BigRational::one());
        assert_eq!(probs.b_wins, BigRational::zero());
        assert_eq!(probs.tie, BigRational::zero());
    }

    #[test]
    fn test_classroom_game_is_consistent() {
        let game = classroom_game();
        let probs = exact_probabilities(&game);
        assert_valid(&probs);
        assert!(probs.a_wins > BigRational::zero());
        assert!(probs.b_wins > BigRational::zero());
    }

    #[test]
    fn test_swapping_competitors_swaps_probabilities() {
        let game = classroom_game();
        let probs = exact_probabilities(&game);
        let swapped = exact_probabilities(&game.swapped());

        assert_eq!(probs.a_wins, swapped.b_wins);
        assert_eq!(probs.b_wins, swapped.a_wins);
        assert_eq!(probs.tie, swapped.tie);
    }

    #[test]
    fn test_equal_vectors_are_fair() {
        let game = ExactRace::from_fractions(&[(1, 6), (1, 3), (1, 2)], vec![2, 1, 3], vec![2, 1, 3]).unwrap();
        let probs = exact_probabilities(&game);
        assert_eq!(probs.a_wins, probs.b_wins);
        // Both sides shed chips together, so the race always ties.
        assert_eq!(probs.tie, BigRational::one());
    }

    #[test]
    fn test_memo_is_reused_across_queries() {
        let mut solver = ExactSolver::new(classroom_game());
        let first = solver.solve();
        let states = solver.memo_len();
        assert!(states > 0);

        let second = solver.solve();
        assert_eq!(first, second);
        assert_eq!(solver.memo_len(), states);

        // Reachable states are bounded by per-field draw counts, twice over.
        let per_orientation: usize = [3usize, 7, 4, 3, 2, 1].iter().map(|m| m + 1).product();
        assert!(states <= 2 * per_orientation);

        solver.clear();
        assert_eq!(solver.memo_len(), 0);
    }

    #[test]
    fn test_win_probability_from_intermediate_state() {
        let mut solver = ExactSolver::new(
            ExactRace::from_fractions(&[(1, 2), (1, 2)], vec![1, 1], vec![1, 0]).unwrap(),
        );
        // After field 1 is drawn both sides need only field 0.
        assert_eq!(solver.win_probability(&[1, 0], &[1, 0]).unwrap(), BigRational::zero());
        assert_eq!(solver.win_probability(&[0, 0], &[1, 0]).unwrap(), BigRational::one());
        assert!(matches!(
            solver.win_probability(&[1], &[1, 0]),
            Err(ConfigError::LengthMismatch { competitor: 'A', len: 1, fields: 2 })
        ));
    }

    #[test]
    fn test_to_f64() {
        let game = ExactRace::from_fractions(&[(1, 2), (1, 4), (1, 4)], vec![1, 0, 0], vec![0, 1, 0]).unwrap();
        let [a, b, tie] = exact_probabilities(&game).to_f64();
        assert!((a - 2.0 / 3.0).abs() < 1e-15);
        assert!((b - 1.0 / 3.0).abs() < 1e-15);
        assert_eq!(tie, 0.0);
    }
}
