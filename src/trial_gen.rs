//! Trial synthesis: realize a match pattern into a concrete stimulus sequence.
//!
//! Trials are built in order so each one can reference the already-built
//! trial at its lag. Every active channel first gets a fresh uniform draw;
//! channels the pattern flags are then overwritten with the predecessor's
//! value and marked `should_match`. A channel that coincidentally repeats
//! its predecessor without being flagged stays a non-match — there is no
//! accidental-match suppression.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::constants::{COLORS, GRID_POSITIONS};
use crate::match_pattern::{jaeggi_pattern, random_pattern};
use crate::types::{ArithmeticOp, GameConfig, GameMode, Modality, Response, Trial};

/// Generate the full ordered trial sequence for one session.
///
/// The rng is the caller's injected randomness seam; seeding it makes the
/// whole sequence deterministic.
pub fn generate_trials(
    game_mode: GameMode,
    n_back_level: usize,
    config: &GameConfig,
    rng: &mut SmallRng,
) -> Vec<Trial> {
    let num_trials = config.trials_per_session;
    let modalities = game_mode.modalities();
    let pool = config.sound_set().pool();

    let pattern = if config.jaeggi_mode {
        jaeggi_pattern(num_trials, n_back_level, rng)
    } else {
        random_pattern(num_trials, n_back_level, rng)
    };

    let has_color = modalities.contains(&Modality::Color);
    let has_visual = modalities.contains(&Modality::Visual);
    let operations = config.arithmetic_operations.enabled();

    let mut trials: Vec<Trial> = Vec::with_capacity(num_trials);

    for i in 0..num_trials {
        let n_back = if config.variable_n_back {
            rng.random_range(1..=n_back_level)
        } else {
            n_back_level
        };

        let mut trial = Trial {
            index: i,
            n_back,
            position: rng.random_range(0..GRID_POSITIONS),
            sound: pool[rng.random_range(0..pool.len())].to_string(),
            color: None,
            visual_cue: None,
            arithmetic_operation: None,
            arithmetic_number: None,
            arithmetic_correct_answer: None,
            position_should_match: false,
            sound_should_match: false,
            color_should_match: None,
            visual_should_match: None,
            position_response: Response::Unanswered,
            sound_response: Response::Unanswered,
            color_response: Response::Unanswered,
            visual_response: Response::Unanswered,
            arithmetic_answer: None,
        };

        if has_color {
            trial.color = Some(COLORS[rng.random_range(0..COLORS.len())].to_string());
            trial.color_should_match = Some(false);
        }
        if has_visual {
            trial.visual_cue = Some(pool[rng.random_range(0..pool.len())].to_string());
            trial.visual_should_match = Some(false);
        }
        if game_mode.uses_arithmetic() {
            trial.arithmetic_operation = Some(operations[rng.random_range(0..operations.len())]);
            trial.arithmetic_number = Some(rng.random_range(0..=config.arithmetic_max_number));
        }

        // Wire mandated matches to the value at this trial's own lag.
        if i >= trial.n_back {
            let predecessor = &trials[i - trial.n_back];

            if pattern.position[i] {
                trial.position = predecessor.position;
                trial.position_should_match = true;
            }
            if pattern.sound[i] {
                trial.sound = predecessor.sound.clone();
                trial.sound_should_match = true;
            }
            if pattern.color[i] && trial.color.is_some() && predecessor.color.is_some() {
                trial.color = predecessor.color.clone();
                trial.color_should_match = Some(true);
            }
            if pattern.visual[i] && trial.visual_cue.is_some() && predecessor.visual_cue.is_some() {
                trial.visual_cue = predecessor.visual_cue.clone();
                trial.visual_should_match = Some(true);
            }

            // The arithmetic answer always combines the current and lag
            // operands; it is not gated by any match flag.
            if let (Some(op), Some(current), Some(pred_number)) = (
                trial.arithmetic_operation,
                trial.arithmetic_number,
                predecessor.arithmetic_number,
            ) {
                trial.arithmetic_correct_answer = Some(combine_arithmetic(pred_number, current, op));
            }
        }

        trials.push(trial);
    }

    trials
}

/// Combine the lag-`n` operand with the current one.
///
/// Addition, subtraction, and multiplication are exact; division yields the
/// quotient rounded to 2 decimals, or 0 when the divisor is 0.
pub fn combine_arithmetic(n_back_number: i64, current_number: i64, op: ArithmeticOp) -> f64 {
    match op {
        ArithmeticOp::Plus => (n_back_number + current_number) as f64,
        ArithmeticOp::Minus => (n_back_number - current_number) as f64,
        ArithmeticOp::Times => (n_back_number * current_number) as f64,
        ArithmeticOp::Divide => {
            if current_number != 0 {
                (n_back_number as f64 / current_number as f64 * 100.0).round() / 100.0
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_session_length_matches_config() {
        let mut rng = SmallRng::seed_from_u64(42);
        let trials = generate_trials(GameMode::DualNback, 2, &config(), &mut rng);
        assert_eq!(trials.len(), 20);
        for (i, trial) in trials.iter().enumerate() {
            assert_eq!(trial.index, i);
            assert_eq!(trial.n_back, 2);
            assert!(trial.position < GRID_POSITIONS);
        }
    }

    #[test]
    fn test_no_matches_before_lag() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let trials = generate_trials(GameMode::TripleNback, 3, &config(), &mut rng);
            for trial in trials.iter().take(3) {
                assert!(!trial.position_should_match);
                assert!(!trial.sound_should_match);
                assert_eq!(trial.color_should_match, Some(false));
            }
        }
    }

    #[test]
    fn test_flagged_channels_equal_their_predecessor() {
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            let trials = generate_trials(GameMode::TripleNback, 2, &config(), &mut rng);
            for trial in &trials {
                let lag = trial.n_back;
                if trial.position_should_match {
                    assert_eq!(trial.position, trials[trial.index - lag].position);
                }
                if trial.sound_should_match {
                    assert_eq!(trial.sound, trials[trial.index - lag].sound);
                }
                if trial.color_should_match == Some(true) {
                    assert_eq!(trial.color, trials[trial.index - lag].color);
                }
            }
        }
    }

    #[test]
    fn test_inactive_channels_stay_empty() {
        let mut rng = SmallRng::seed_from_u64(1);
        let trials = generate_trials(GameMode::DualNback, 2, &config(), &mut rng);
        for trial in &trials {
            assert!(trial.color.is_none());
            assert!(trial.visual_cue.is_none());
            assert!(trial.arithmetic_number.is_none());
            assert!(trial.color_should_match.is_none());
        }
    }

    #[test]
    fn test_variable_n_back_lag_in_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut cfg = config();
        cfg.variable_n_back = true;
        let trials = generate_trials(GameMode::DualNback, 4, &cfg, &mut rng);
        for trial in &trials {
            assert!(trial.n_back >= 1 && trial.n_back <= 4, "lag {}", trial.n_back);
        }
    }

    #[test]
    fn test_arithmetic_answer_always_set_past_lag() {
        let mut rng = SmallRng::seed_from_u64(11);
        let trials = generate_trials(GameMode::ArithmeticNback, 1, &config(), &mut rng);
        for trial in &trials {
            assert!(trial.arithmetic_operation.is_some());
            let number = trial.arithmetic_number.unwrap();
            assert!((0..=12).contains(&number));
            if trial.index >= trial.n_back {
                let expected = combine_arithmetic(
                    trials[trial.index - trial.n_back].arithmetic_number.unwrap(),
                    number,
                    trial.arithmetic_operation.unwrap(),
                );
                assert_eq!(trial.arithmetic_correct_answer, Some(expected));
            } else {
                assert!(trial.arithmetic_correct_answer.is_none());
            }
        }
    }

    #[test]
    fn test_combine_arithmetic() {
        assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Plus), 10.0);
        // Operand order: predecessor minus current.
        assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Minus), 4.0);
        assert_eq!(combine_arithmetic(3, 7, ArithmeticOp::Minus), -4.0);
        assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Times), 21.0);
        assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Divide), 2.33);
        assert_eq!(combine_arithmetic(1, 3, ArithmeticOp::Divide), 0.33);
        assert_eq!(combine_arithmetic(7, 0, ArithmeticOp::Divide), 0.0);
    }

    #[test]
    fn test_generation_deterministic_for_seed() {
        let mut rng1 = SmallRng::seed_from_u64(77);
        let mut rng2 = SmallRng::seed_from_u64(77);
        let a = generate_trials(GameMode::QuadrupleCombination, 2, &config(), &mut rng1);
        let b = generate_trials(GameMode::QuadrupleCombination, 2, &config(), &mut rng2);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.sound, y.sound);
            assert_eq!(x.color, y.color);
            assert_eq!(x.visual_cue, y.visual_cue);
            assert_eq!(x.position_should_match, y.position_should_match);
        }
    }

    #[test]
    fn test_jaeggi_session_has_exact_quotas() {
        let mut rng = SmallRng::seed_from_u64(21);
        let mut cfg = config();
        cfg.jaeggi_mode = true;
        let trials = generate_trials(GameMode::DualNback, 2, &cfg, &mut rng);
        let both = trials
            .iter()
            .filter(|t| t.position_should_match && t.sound_should_match)
            .count();
        let pos = trials
            .iter()
            .filter(|t| t.position_should_match && !t.sound_should_match)
            .count();
        let sound = trials
            .iter()
            .filter(|t| !t.position_should_match && t.sound_should_match)
            .count();
        assert_eq!((both, pos, sound), (2, 2, 2));
    }
}
