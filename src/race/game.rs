//! Race game model shared by the playout engine and the exact solver.
//!
//! Two competitors each hold a chip vector with one slot per field. Every
//! round one field is drawn; each competitor who still has chips on that
//! field sheds one. A competitor is finished once every slot is zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Terminal result of one race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Competitor A emptied its chips strictly before B.
    AWins,
    /// Competitor B emptied its chips strictly before A.
    BWins,
    /// Both emptied their chips on the same draw.
    Tie,
}

impl Outcome {
    /// All outcomes in reporting order.
    pub const ALL: [Outcome; 3] = [Outcome::AWins, Outcome::BWins, Outcome::Tie];

    /// Position of this outcome in [`Outcome::ALL`].
    pub fn index(self) -> usize {
        match self {
            Outcome::AWins => 0,
            Outcome::BWins => 1,
            Outcome::Tie => 2,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::AWins => "A wins",
            Outcome::BWins => "B wins",
            Outcome::Tie => "Tie",
        };
        // `pad` so table widths like `{:<8}` apply.
        f.pad(label)
    }
}

/// Whether a competitor has shed every chip.
pub fn is_finished(chips: &[u32]) -> bool {
    chips.iter().all(|&c| c == 0)
}

/// Whether `field` still matters to either competitor.
pub fn is_active(v: &[u32], w: &[u32], field: usize) -> bool {
    v[field] > 0 || w[field] > 0
}

/// Apply one draw of `field` to both chip vectors in place.
///
/// Each side loses a chip on that field only if it still has one there.
pub fn apply_draw(a: &mut [u32], b: &mut [u32], field: usize) {
    if a[field] > 0 {
        a[field] -= 1;
    }
    if b[field] > 0 {
        b[field] -= 1;
    }
}

/// Classify a position reached after at least one draw.
///
/// Returns `None` while both competitors still hold chips.
pub fn terminal_outcome(a: &[u32], b: &[u32]) -> Option<Outcome> {
    match (is_finished(a), is_finished(b)) {
        (true, true) => Some(Outcome::Tie),
        (true, false) => Some(Outcome::AWins),
        (false, true) => Some(Outcome::BWins),
        (false, false) => None,
    }
}
