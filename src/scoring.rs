//! Response scoring: per-trial correctness and whole-session percentages.
//!
//! Two accuracy semantics, selected by the session's `jaeggi_mode` snapshot:
//!
//! - **Standard** (signal-detection): a trial counts toward a channel only
//!   when it was a target or the user claimed it was one. Correct rejections
//!   are excluded from the denominator. The total is a pooled ratio — sum of
//!   correct over sum of counted across all active channels — not an average
//!   of per-channel percentages.
//! - **Jaeggi** (fixed-quota): every trial past the baseline lag counts,
//!   correct rejections included. The total is the minimum across the
//!   present per-channel scores; the weakest channel bounds the session.
//!
//! The arithmetic channel is answer-based rather than affirmation-based: it
//! counts whenever a correct answer exists for the trial, in both modes, and
//! it pools into the Standard total but never enters the Jaeggi minimum.

use serde::Serialize;

use crate::types::{Modality, Session, SessionScores, Trial};

/// Per-channel correctness for one trial, for live feedback and scoring.
/// Optional channels are `None` when the trial does not carry them.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialCheck {
    pub position_correct: bool,
    pub sound_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arithmetic_correct: Option<bool>,
}

/// Compare a trial's recorded responses against its ground truth.
///
/// A match-judged channel is correct when the affirmation state equals
/// `should_match` (an unanswered trial counts as not affirming). The
/// arithmetic channel is correct when the typed answer equals the derived
/// one.
pub fn check_trial_response(trial: &Trial) -> TrialCheck {
    TrialCheck {
        position_correct: trial.position_response.affirmed() == trial.position_should_match,
        sound_correct: trial.sound_response.affirmed() == trial.sound_should_match,
        color_correct: trial
            .color_should_match
            .map(|sm| trial.color_response.affirmed() == sm),
        visual_correct: trial
            .visual_should_match
            .map(|sm| trial.visual_response.affirmed() == sm),
        arithmetic_correct: trial.arithmetic_correct_answer.map(|correct| {
            trial
                .arithmetic_answer
                .is_some_and(|answer| (answer - correct).abs() < 1e-9)
        }),
    }
}

#[derive(Clone, Copy, Default)]
struct Tally {
    correct: u32,
    counted: u32,
}

impl Tally {
    fn percentage(&self) -> Option<f64> {
        (self.counted > 0).then(|| self.correct as f64 / self.counted as f64 * 100.0)
    }
}

/// Score a completed session.
///
/// Trials at `index < n_back_level` (the session baseline) are skipped for
/// every channel; they cannot be matches. A channel that ends up with zero
/// countable trials is omitted from the output and from the total
/// aggregation — "never tested" is not "scored 0%".
pub fn calculate_session_score(session: &Session) -> SessionScores {
    let modalities = session.game_mode.modalities();
    let jaeggi = session.config.jaeggi_mode;

    let mut position = Tally::default();
    let mut sound = Tally::default();
    let mut color = Tally::default();
    let mut visual = Tally::default();
    let mut arithmetic = Tally::default();

    for trial in &session.trials {
        if trial.index < session.n_back_level {
            continue;
        }
        let check = check_trial_response(trial);

        for &modality in modalities {
            let tally = match modality {
                Modality::Position => &mut position,
                Modality::Sound => &mut sound,
                Modality::Color => &mut color,
                Modality::Visual => &mut visual,
                Modality::Arithmetic => continue,
            };
            // Channel value missing on this trial: nothing to judge.
            let Some(should_match) = trial.should_match(modality) else {
                continue;
            };
            let affirmed = trial.response(modality).affirmed();

            if jaeggi {
                tally.counted += 1;
                if affirmed == should_match {
                    tally.correct += 1;
                }
            } else if should_match || affirmed {
                tally.counted += 1;
                if affirmed == should_match {
                    tally.correct += 1;
                }
            }
        }

        // Arithmetic counts whenever an answer was derivable, in both modes.
        if let Some(correct) = check.arithmetic_correct {
            arithmetic.counted += 1;
            if correct {
                arithmetic.correct += 1;
            }
        }
    }

    let mut scores = SessionScores {
        position_score: position.percentage(),
        sound_score: sound.percentage(),
        color_score: color.percentage(),
        visual_score: visual.percentage(),
        arithmetic_score: arithmetic.percentage(),
        total_score: 0.0,
    };

    scores.total_score = if jaeggi {
        // Weakest-channel score; arithmetic is excluded from the minimum.
        modalities
            .iter()
            .filter_map(|m| match m {
                Modality::Position => scores.position_score,
                Modality::Sound => scores.sound_score,
                Modality::Color => scores.color_score,
                Modality::Visual => scores.visual_score,
                Modality::Arithmetic => None,
            })
            .fold(None::<f64>, |acc, s| Some(acc.map_or(s, |a| a.min(s))))
            .unwrap_or(0.0)
    } else {
        let mut pooled = Tally::default();
        for &modality in modalities {
            let tally = match modality {
                Modality::Position => position,
                Modality::Sound => sound,
                Modality::Color => color,
                Modality::Visual => visual,
                Modality::Arithmetic => continue,
            };
            pooled.correct += tally.correct;
            pooled.counted += tally.counted;
        }
        if session.game_mode.uses_arithmetic() {
            pooled.correct += arithmetic.correct;
            pooled.counted += arithmetic.counted;
        }
        pooled.percentage().unwrap_or(0.0)
    };

    scores
}
