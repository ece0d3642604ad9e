//! End-to-end engine flow: generate → respond → score → adapt, the way the
//! session-management layer drives it.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use nback::adaptive::determine_next_level;
use nback::profile::Profile;
use nback::scoring::{calculate_session_score, check_trial_response};
use nback::trial_gen::combine_arithmetic;
use nback::types::{ArithmeticOp, GameConfig, GameMode, Response, Session};

#[test]
fn full_adaptive_round() {
    let mut profile = Profile::new("tester", 0);
    let mut rng = SmallRng::seed_from_u64(42);

    let mut session = Session::new(
        profile.current_game_mode,
        profile.current_n_back_level,
        &profile.config,
        1_000,
        false,
        &mut rng,
    );
    assert_eq!(session.trials.len(), 20);

    // Play perfectly: affirm exactly the ground-truth matches.
    for trial in &mut session.trials {
        for &m in session.game_mode.modalities() {
            if trial.should_match(m) == Some(true) {
                trial.record_response(m, Response::Matched);
            } else {
                trial.record_response(m, Response::NonMatch);
            }
        }
    }
    let scores = session.finish(61_000);
    assert_eq!(session.end_time, Some(61_000));
    assert_eq!(scores.total_score, 100.0);

    profile.apply_session(&session, "2026-08-29");
    assert_eq!(profile.current_n_back_level, 3);
    assert_eq!(profile.strike_count, 0);
    assert_eq!(profile.daily_stats["2026-08-29"].total_sessions(), 1);
}

#[test]
fn per_trial_feedback_matches_session_scoring() {
    let mut rng = SmallRng::seed_from_u64(7);
    let config = GameConfig::default();
    let mut session = Session::new(GameMode::DualNback, 2, &config, 0, false, &mut rng);

    // Affirm everything; per-trial checks must then flag exactly the
    // non-matches as wrong.
    for trial in &mut session.trials {
        trial.record_response(nback::types::Modality::Position, Response::Matched);
        let check = check_trial_response(trial);
        assert_eq!(check.position_correct, trial.position_should_match);
    }
}

#[test]
fn config_snapshot_isolates_running_session() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut config = GameConfig::default();
    let session = Session::new(GameMode::DualNback, 2, &config, 0, false, &mut rng);

    // Editing the live config after session start must not switch the
    // scoring semantics of the snapshot.
    config.jaeggi_mode = true;
    let scores = calculate_session_score(&session);
    // Standard semantics: nothing affirmed and a quarter-density pattern
    // leaves correct rejections out, so no channel can score above 0 here.
    for score in [scores.position_score, scores.sound_score].into_iter().flatten() {
        assert_eq!(score, 0.0);
    }
    assert!(!session.config.jaeggi_mode);
}

#[test]
fn level_adapter_threshold_fixtures() {
    let config = GameConfig::default(); // 80 / 50 / 3 strikes

    let d = determine_next_level(3, 85.0, 0, &config);
    assert_eq!((d.next_level, d.new_strike_count), (4, 0));

    let d = determine_next_level(3, 40.0, 2, &config);
    assert_eq!((d.next_level, d.new_strike_count), (2, 0));

    let d = determine_next_level(3, 40.0, 1, &config);
    assert_eq!((d.next_level, d.new_strike_count), (3, 2));

    let d = determine_next_level(1, 40.0, 2, &config);
    assert_eq!((d.next_level, d.new_strike_count), (1, 0));
}

#[test]
fn arithmetic_fixtures() {
    assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Divide), 2.33);
    // Subtraction is predecessor minus current.
    assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Minus), 4.0);
    assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Plus), 10.0);
    assert_eq!(combine_arithmetic(7, 3, ArithmeticOp::Times), 21.0);
    assert_eq!(combine_arithmetic(5, 0, ArithmeticOp::Divide), 0.0);
}

#[test]
fn arithmetic_session_scores_typed_answers() {
    let mut rng = SmallRng::seed_from_u64(13);
    let config = GameConfig::default();
    let mut session = Session::new(GameMode::ArithmeticNback, 1, &config, 0, false, &mut rng);

    // Answer every derivable trial correctly, and ignore the sound channel.
    for trial in &mut session.trials {
        if let Some(correct) = trial.arithmetic_correct_answer {
            trial.record_arithmetic_answer(correct);
        }
    }
    let scores = calculate_session_score(&session);
    assert_eq!(scores.arithmetic_score, Some(100.0));
    // Total pools sound (all misses on its matches) with arithmetic, so it
    // sits strictly between the two channel scores unless sound had no
    // countable trials at all.
    match scores.sound_score {
        Some(sound) => {
            assert!(scores.total_score > sound);
            assert!(scores.total_score < 100.0);
        }
        None => assert_eq!(scores.total_score, 100.0),
    }
}
