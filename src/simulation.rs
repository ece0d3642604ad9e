//! Session simulation — plays N sessions with a synthetic subject.
//!
//! Useful for validating scoring distributions and the adaptive staircase
//! without a human in the loop: a [`SubjectModel`] affirms matches with a
//! configurable hit rate and false-alarms on non-matches at another, and the
//! batch runner measures the resulting total-score distribution.
//!
//! Batch runs are rayon-parallel with a per-session seed derived from the
//! base seed, so any individual session can be replayed in isolation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::profile::Profile;
use crate::types::{GameConfig, GameMode, Response, Session};

/// Stochastic response policy standing in for a human subject.
#[derive(Clone, Copy, Debug)]
pub struct SubjectModel {
    /// P(affirm | trial is a match).
    pub hit_rate: f64,
    /// P(affirm | trial is not a match).
    pub false_alarm_rate: f64,
    /// P(typed answer is correct | arithmetic answer exists).
    pub arithmetic_accuracy: f64,
}

impl Default for SubjectModel {
    fn default() -> Self {
        Self {
            hit_rate: 0.8,
            false_alarm_rate: 0.1,
            arithmetic_accuracy: 0.8,
        }
    }
}

impl SubjectModel {
    /// A subject that never misses and never false-alarms.
    pub fn perfect() -> Self {
        Self {
            hit_rate: 1.0,
            false_alarm_rate: 0.0,
            arithmetic_accuracy: 1.0,
        }
    }
}

/// Generate one session, fill in the subject's responses, and score it.
pub fn play_session(
    game_mode: GameMode,
    n_back_level: usize,
    config: &GameConfig,
    subject: &SubjectModel,
    rng: &mut SmallRng,
) -> Session {
    let mut session = Session::new(game_mode, n_back_level, config, 0, false, rng);
    let modalities = game_mode.modalities();

    for trial in &mut session.trials {
        for &modality in modalities {
            let Some(should_match) = trial.should_match(modality) else {
                continue;
            };
            let p = if should_match {
                subject.hit_rate
            } else {
                subject.false_alarm_rate
            };
            if rng.random_bool(p) {
                trial.record_response(modality, Response::Matched);
            }
        }
        if let Some(correct) = trial.arithmetic_correct_answer {
            let answer = if rng.random_bool(subject.arithmetic_accuracy) {
                correct
            } else {
                correct + 1.0
            };
            trial.record_arithmetic_answer(answer);
        }
    }

    session.finish(0);
    session
}

// ── Batch simulation ────────────────────────────────────────────────────────

/// Total-score distribution over a batch of independent sessions.
pub struct SimulationResult {
    pub scores: Vec<f64>,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub elapsed: std::time::Duration,
}

/// Play `num_sessions` independent sessions in parallel at a fixed level.
pub fn simulate_batch(
    game_mode: GameMode,
    n_back_level: usize,
    config: &GameConfig,
    subject: &SubjectModel,
    num_sessions: usize,
    seed: u64,
) -> SimulationResult {
    let start = Instant::now();

    let mut scores: Vec<f64> = (0..num_sessions)
        .into_par_iter()
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i as u64));
            let session = play_session(game_mode, n_back_level, config, subject, &mut rng);
            session.scores.map(|s| s.total_score).unwrap_or(0.0)
        })
        .collect();

    let elapsed = start.elapsed();

    let mean = scores.iter().sum::<f64>() / num_sessions.max(1) as f64;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / num_sessions.max(1) as f64;
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    scores.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median = scores.get(num_sessions / 2).copied().unwrap_or(0.0);

    SimulationResult {
        scores,
        mean,
        std_dev: variance.sqrt(),
        min,
        max,
        median,
        elapsed,
    }
}

// ── Adaptive course ─────────────────────────────────────────────────────────

/// Trajectory of one profile through a sequential adaptive run.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResult {
    /// Level each session was played at, in order.
    pub levels: Vec<usize>,
    pub scores: Vec<f64>,
    pub final_level: usize,
    pub level_increases: usize,
    pub level_decreases: usize,
}

/// Sessions folded into one day of profile history.
const COURSE_SESSIONS_PER_DAY: usize = 10;

/// Run a profile through `num_sessions` consecutive adaptive sessions,
/// letting the level adapter move the difficulty between them.
pub fn simulate_course(
    game_mode: GameMode,
    config: &GameConfig,
    subject: &SubjectModel,
    num_sessions: usize,
    seed: u64,
) -> CourseResult {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut profile = Profile::new("simulated", 0);
    profile.current_game_mode = game_mode;
    profile.current_n_back_level = game_mode.starting_level();
    profile.config = config.clone();

    // Fixed-quota generation needs trials - level >= JAEGGI_MIN_ELIGIBLE;
    // a strong subject would otherwise climb past the playable range.
    let max_level = if config.jaeggi_mode {
        config.trials_per_session - crate::constants::JAEGGI_MIN_ELIGIBLE
    } else {
        usize::MAX
    };

    let mut levels = Vec::with_capacity(num_sessions);
    let mut scores = Vec::with_capacity(num_sessions);
    let mut increases = 0;
    let mut decreases = 0;

    for i in 0..num_sessions {
        let level = profile.current_n_back_level;
        levels.push(level);

        let session = play_session(game_mode, level, config, subject, &mut rng);
        scores.push(session.scores.map(|s| s.total_score).unwrap_or(0.0));

        let date = format!("day-{:03}", i / COURSE_SESSIONS_PER_DAY);
        profile.apply_session(&session, &date);
        profile.current_n_back_level = profile.current_n_back_level.min(max_level);

        if profile.current_n_back_level > level {
            increases += 1;
        } else if profile.current_n_back_level < level {
            decreases += 1;
        }
    }

    CourseResult {
        levels,
        scores,
        final_level: profile.current_n_back_level,
        level_increases: increases,
        level_decreases: decreases,
    }
}

// ── Serializable statistics ─────────────────────────────────────────────────

/// JSON-exportable batch summary (the CLI writes this with `--output`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatistics {
    pub num_sessions: usize,
    pub seed: u64,
    pub game_mode: GameMode,
    pub n_back_level: usize,
    pub jaeggi_mode: bool,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

pub fn aggregate_statistics(
    result: &SimulationResult,
    game_mode: GameMode,
    n_back_level: usize,
    config: &GameConfig,
    seed: u64,
) -> SimulationStatistics {
    SimulationStatistics {
        num_sessions: result.scores.len(),
        seed,
        game_mode,
        n_back_level,
        jaeggi_mode: config.jaeggi_mode,
        mean: result.mean,
        std_dev: result.std_dev,
        min: result.min,
        max: result.max,
        median: result.median,
    }
}
