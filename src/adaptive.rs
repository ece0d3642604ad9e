//! Level adaptation: the staircase that moves the n-back level between
//! sessions.
//!
//! Pure decision function — the caller (profile update) applies the result.
//! Manual sessions never reach this code path.

use serde::Serialize;

use crate::types::GameConfig;

/// Outcome of one adaptation step.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDecision {
    pub next_level: usize,
    pub new_strike_count: u32,
}

/// Map a session's total score and the strike history to the next level.
///
/// - at or above `increase_threshold`: level up, strikes reset.
/// - below `maintain_threshold`: one strike; on the `decrease_strikes`-th
///   strike the level drops (never below 1) and strikes reset.
/// - in between: level and strikes both unchanged.
pub fn determine_next_level(
    current_level: usize,
    score: f64,
    strike_count: u32,
    config: &GameConfig,
) -> LevelDecision {
    if score >= config.increase_threshold {
        LevelDecision {
            next_level: current_level + 1,
            new_strike_count: 0,
        }
    } else if score < config.maintain_threshold {
        let strikes = strike_count + 1;
        if strikes >= config.decrease_strikes {
            LevelDecision {
                next_level: current_level.saturating_sub(1).max(1),
                new_strike_count: 0,
            }
        } else {
            LevelDecision {
                next_level: current_level,
                new_strike_count: strikes,
            }
        }
    } else {
        LevelDecision {
            next_level: current_level,
            new_strike_count: strike_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default() // thresholds 80/50, 3 strikes
    }

    #[test]
    fn test_score_at_threshold_increases_level() {
        let d = determine_next_level(3, 85.0, 0, &config());
        assert_eq!(d, LevelDecision { next_level: 4, new_strike_count: 0 });
        let d = determine_next_level(3, 80.0, 2, &config());
        assert_eq!(d, LevelDecision { next_level: 4, new_strike_count: 0 });
    }

    #[test]
    fn test_low_score_accrues_strike_without_decrease() {
        let d = determine_next_level(3, 40.0, 1, &config());
        assert_eq!(d, LevelDecision { next_level: 3, new_strike_count: 2 });
    }

    #[test]
    fn test_third_strike_decreases_level() {
        let d = determine_next_level(3, 40.0, 2, &config());
        assert_eq!(d, LevelDecision { next_level: 2, new_strike_count: 0 });
    }

    #[test]
    fn test_level_never_drops_below_one() {
        let d = determine_next_level(1, 40.0, 2, &config());
        assert_eq!(d, LevelDecision { next_level: 1, new_strike_count: 0 });
    }

    #[test]
    fn test_middle_band_preserves_strikes() {
        // Maintain threshold is inclusive: exactly 50 is not a strike, and
        // a previously accrued strike is not forgiven either.
        let d = determine_next_level(4, 50.0, 2, &config());
        assert_eq!(d, LevelDecision { next_level: 4, new_strike_count: 2 });
        let d = determine_next_level(4, 65.0, 1, &config());
        assert_eq!(d, LevelDecision { next_level: 4, new_strike_count: 1 });
    }
}
