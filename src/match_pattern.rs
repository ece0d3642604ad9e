//! Match-pattern generation: which trial indices must repeat the value
//! from `n_back` trials earlier, per channel.
//!
//! A pattern is a plan, not realized data — the trial synthesizer wires the
//! flagged indices to their predecessors afterwards. Indices below the lag
//! can never be matches (no predecessor exists).
//!
//! Two strategies:
//! - **free-random**: every eligible index matches independently with
//!   probability [`MATCH_PROBABILITY`] per channel.
//! - **fixed-quota ("Jaeggi")**: exactly 2 simultaneous position+sound
//!   matches, 2 position-only, 2 sound-only, drawn without replacement.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::constants::{
    JAEGGI_MIN_ELIGIBLE, JAEGGI_SIMULTANEOUS_MATCHES, JAEGGI_SINGLE_MATCHES, MATCH_PROBABILITY,
};

/// Per-channel match flags, one `bool` per trial index.
///
/// Color and visual rows stay all-false under fixed-quota generation, which
/// plans only the position and sound channels.
#[derive(Clone, Debug)]
pub struct MatchPattern {
    pub position: Vec<bool>,
    pub sound: Vec<bool>,
    pub color: Vec<bool>,
    pub visual: Vec<bool>,
}

impl MatchPattern {
    fn empty(num_trials: usize) -> Self {
        Self {
            position: vec![false; num_trials],
            sound: vec![false; num_trials],
            color: vec![false; num_trials],
            visual: vec![false; num_trials],
        }
    }
}

/// Free-random pattern: independent 25% match chance per channel for every
/// index `>= n_back`. Channels are uncorrelated.
///
/// `interference_level` is accepted by the caller's config but does not
/// currently alter this distribution.
pub fn random_pattern(num_trials: usize, n_back: usize, rng: &mut SmallRng) -> MatchPattern {
    let mut pattern = MatchPattern::empty(num_trials);

    for i in n_back..num_trials {
        pattern.position[i] = rng.random_bool(MATCH_PROBABILITY);
        pattern.sound[i] = rng.random_bool(MATCH_PROBABILITY);
        pattern.color[i] = rng.random_bool(MATCH_PROBABILITY);
        pattern.visual[i] = rng.random_bool(MATCH_PROBABILITY);
    }

    pattern
}

/// Fixed-quota ("Jaeggi") pattern for the position and sound channels.
///
/// Draws 6 distinct indices from `[n_back, num_trials)`: the first 2 match
/// on both channels, the next 2 on position only, the last 2 on sound only.
/// Selection order among eligible indices is uniform; only the final quotas
/// matter.
///
/// Panics if fewer than 6 indices are eligible — the caller must validate
/// `trials_per_session - n_back >= 6` before enabling Jaeggi mode.
pub fn jaeggi_pattern(num_trials: usize, n_back: usize, rng: &mut SmallRng) -> MatchPattern {
    let eligible = num_trials.saturating_sub(n_back);
    assert!(
        eligible >= JAEGGI_MIN_ELIGIBLE,
        "jaeggi pattern needs >= {} eligible indices, got {} (trials={}, n_back={})",
        JAEGGI_MIN_ELIGIBLE,
        eligible,
        num_trials,
        n_back
    );

    let mut pattern = MatchPattern::empty(num_trials);
    let mut available: Vec<usize> = (n_back..num_trials).collect();

    let draw = |available: &mut Vec<usize>, rng: &mut SmallRng| -> usize {
        available.swap_remove(rng.random_range(0..available.len()))
    };

    for _ in 0..JAEGGI_SIMULTANEOUS_MATCHES {
        let idx = draw(&mut available, rng);
        pattern.position[idx] = true;
        pattern.sound[idx] = true;
    }
    for _ in 0..JAEGGI_SINGLE_MATCHES {
        let idx = draw(&mut available, rng);
        pattern.position[idx] = true;
    }
    for _ in 0..JAEGGI_SINGLE_MATCHES {
        let idx = draw(&mut available, rng);
        pattern.sound[idx] = true;
    }

    pattern
}
