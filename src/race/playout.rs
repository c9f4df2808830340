//! Single-game playout driven by an injected random source.

use rand::Rng;

use crate::race::config::FloatRace;
use crate::race::game::{apply_draw, terminal_outcome, Outcome};
use crate::sampling::sample_categorical;

/// Play one race to its end and report who finished first.
///
/// Fields are drawn from the configured distribution until at least one
/// competitor has no chips left. The first draw always happens, even for
/// competitors that start with empty vectors.
///
/// That first draw can differ from the exact solver, which checks the
/// starting position before drawing. With `p = [1]`, `A = [0]`, `B = [1]`
/// the solver reports `P(A) = 1`, while every playout here ends in
/// [`Outcome::Tie`] because the first draw also empties B.
pub fn play_once<R: Rng + ?Sized>(config: &FloatRace, rng: &mut R) -> Outcome {
    let weights = config.weights();
    let mut chips_a = config.chips_a().to_vec();
    let mut chips_b = config.chips_b().to_vec();

    loop {
        let field = sample_categorical(weights, rng);
        apply_draw(&mut chips_a, &mut chips_b, field);

        if let Some(outcome) = terminal_outcome(&chips_a, &chips_b) {
            return outcome;
        }
    }
}
