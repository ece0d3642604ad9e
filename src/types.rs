//! Core data model: game modes, trials, sessions, and configuration.
//!
//! A [`Session`] is one play-through: an ordered list of [`Trial`]s generated
//! up-front by [`crate::trial_gen::generate_trials`], filled in with user
//! responses by the presentation layer, then scored by
//! [`crate::scoring::calculate_session_score`]. The [`GameConfig`] is
//! snapshotted into the session at start so later edits cannot retroactively
//! alter a running or scored session.
//!
//! Serde field names are camelCase so the persistence collaborator can read
//! and write the same JSON records the UI layer stores.

use serde::{Deserialize, Serialize};

use crate::constants::{LETTERS, NATO, NUMBERS};

// ── Modality ────────────────────────────────────────────────────────────────

/// One sensory/cognitive dimension a trial can carry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Position,
    Sound,
    Color,
    Visual,
    Arithmetic,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Position => "position",
            Modality::Sound => "sound",
            Modality::Color => "color",
            Modality::Visual => "visual",
            Modality::Arithmetic => "arithmetic",
        }
    }
}

// ── Game mode ───────────────────────────────────────────────────────────────

/// A game mode activates a fixed subset of modalities and (for the
/// arithmetic family) the arithmetic channel on top of them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    PositionNback,
    AudioNback,
    DualNback,
    TripleNback,
    DualCombination,
    TripleCombination,
    QuadrupleCombination,
    ArithmeticNback,
    DualArithmetic,
    TripleArithmetic,
}

impl GameMode {
    pub const ALL: [GameMode; 10] = [
        GameMode::PositionNback,
        GameMode::AudioNback,
        GameMode::DualNback,
        GameMode::TripleNback,
        GameMode::DualCombination,
        GameMode::TripleCombination,
        GameMode::QuadrupleCombination,
        GameMode::ArithmeticNback,
        GameMode::DualArithmetic,
        GameMode::TripleArithmetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::PositionNback => "position-nback",
            GameMode::AudioNback => "audio-nback",
            GameMode::DualNback => "dual-nback",
            GameMode::TripleNback => "triple-nback",
            GameMode::DualCombination => "dual-combination",
            GameMode::TripleCombination => "triple-combination",
            GameMode::QuadrupleCombination => "quadruple-combination",
            GameMode::ArithmeticNback => "arithmetic-nback",
            GameMode::DualArithmetic => "dual-arithmetic",
            GameMode::TripleArithmetic => "triple-arithmetic",
        }
    }

    /// Parse a CLI-style mode name (the kebab-case form of [`Self::as_str`]).
    pub fn from_arg(s: &str) -> Option<GameMode> {
        GameMode::ALL.iter().copied().find(|m| m.as_str() == s)
    }

    /// Active match-judged modalities for this mode (the arithmetic channel
    /// is separate — see [`Self::uses_arithmetic`]).
    pub fn modalities(&self) -> &'static [Modality] {
        use Modality::*;
        match self {
            GameMode::PositionNback => &[Position],
            GameMode::AudioNback => &[Sound],
            GameMode::DualNback => &[Position, Sound],
            GameMode::TripleNback => &[Position, Color, Sound],
            GameMode::DualCombination => &[Visual, Sound],
            GameMode::TripleCombination => &[Position, Visual, Sound],
            GameMode::QuadrupleCombination => &[Position, Sound, Color, Visual],
            GameMode::ArithmeticNback => &[Sound],
            GameMode::DualArithmetic => &[Position, Sound],
            GameMode::TripleArithmetic => &[Position, Color, Sound],
        }
    }

    /// Default n-back level when starting a fresh adaptive run in this mode.
    pub fn starting_level(&self) -> usize {
        match self {
            GameMode::DualNback | GameMode::TripleNback => 2,
            _ => 1,
        }
    }

    /// Only dual n-back follows the original fixed-quota protocol.
    pub fn supports_jaeggi(&self) -> bool {
        matches!(self, GameMode::DualNback)
    }

    /// Whether trials in this mode carry an arithmetic operand/operation.
    pub fn uses_arithmetic(&self) -> bool {
        matches!(
            self,
            GameMode::ArithmeticNback | GameMode::DualArithmetic | GameMode::TripleArithmetic
        )
    }
}

// ── Sound sets ──────────────────────────────────────────────────────────────

/// Which symbol pool the sound channel (and visual cue) draws from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSet {
    #[default]
    Letters,
    Numbers,
    Nato,
}

impl SoundSet {
    /// The symbol pool for this set. Numbers are truncated to 8 entries to
    /// match the letter-set size.
    pub fn pool(&self) -> &'static [&'static str] {
        match self {
            SoundSet::Letters => &LETTERS,
            SoundSet::Numbers => &NUMBERS[..8],
            SoundSet::Nato => &NATO,
        }
    }
}

// ── Arithmetic operations ───────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOp {
    Plus,
    Minus,
    Times,
    Divide,
}

impl ArithmeticOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOp::Plus => "plus",
            ArithmeticOp::Minus => "minus",
            ArithmeticOp::Times => "times",
            ArithmeticOp::Divide => "divide",
        }
    }
}

/// Per-operator enable flags from the settings screen.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArithmeticOperations {
    pub addition: bool,
    pub subtraction: bool,
    pub multiplication: bool,
    pub division: bool,
}

impl Default for ArithmeticOperations {
    fn default() -> Self {
        Self {
            addition: true,
            subtraction: true,
            multiplication: true,
            division: true,
        }
    }
}

impl ArithmeticOperations {
    /// Enabled operators, falling back to addition-only when the settings
    /// screen disabled everything.
    pub fn enabled(&self) -> Vec<ArithmeticOp> {
        let mut ops = Vec::with_capacity(4);
        if self.addition {
            ops.push(ArithmeticOp::Plus);
        }
        if self.subtraction {
            ops.push(ArithmeticOp::Minus);
        }
        if self.multiplication {
            ops.push(ArithmeticOp::Times);
        }
        if self.division {
            ops.push(ArithmeticOp::Divide);
        }
        if ops.is_empty() {
            ops.push(ArithmeticOp::Plus);
        }
        ops
    }
}

// ── Responses ───────────────────────────────────────────────────────────────

/// Tri-state user response for one match-judged channel.
///
/// `Unanswered` (the key was never pressed) and `NonMatch` (an explicit
/// "no match") are distinct states, but both count as not affirming.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    #[default]
    Unanswered,
    Matched,
    NonMatch,
}

impl Response {
    /// Whether the user claimed a match.
    #[inline]
    pub fn affirmed(&self) -> bool {
        matches!(self, Response::Matched)
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

/// All engine tunables, snapshotted into each [`Session`] at start.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    /// Trials generated per session.
    pub trials_per_session: usize,
    /// Milliseconds the presentation layer allots per trial.
    pub time_per_trial: u32,
    /// Milliseconds the stimulus itself stays visible.
    pub stimulus_duration: u32,
    /// Fixed-quota generation and all-trials scoring (see `scoring`).
    pub jaeggi_mode: bool,
    /// Total score at or above this raises the level.
    pub increase_threshold: f64,
    /// Total score below this accrues a strike.
    pub maintain_threshold: f64,
    /// Strikes before the level drops.
    pub decrease_strikes: u32,
    /// Ordered sound-set preference; only the first entry is consulted.
    pub sound_sets: Vec<SoundSet>,
    /// Randomize each trial's lag uniformly in `[1, n]`.
    pub variable_n_back: bool,
    /// Declared tunable; does not currently alter the match distribution.
    pub interference_level: f64,
    /// Upper bound (inclusive) for arithmetic operands.
    pub arithmetic_max_number: i64,
    /// Declared tunable; negative operands are not currently drawn.
    pub arithmetic_use_negatives: bool,
    pub arithmetic_operations: ArithmeticOperations,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            trials_per_session: 20,
            time_per_trial: 3000,
            stimulus_duration: 1000,
            jaeggi_mode: false,
            increase_threshold: 80.0,
            maintain_threshold: 50.0,
            decrease_strikes: 3,
            sound_sets: vec![SoundSet::Letters],
            variable_n_back: false,
            interference_level: 0.0,
            arithmetic_max_number: 12,
            arithmetic_use_negatives: false,
            arithmetic_operations: ArithmeticOperations::default(),
        }
    }
}

impl GameConfig {
    /// The active sound set: first configured entry, or letters.
    pub fn sound_set(&self) -> SoundSet {
        self.sound_sets.first().copied().unwrap_or_default()
    }
}

// ── Trial ───────────────────────────────────────────────────────────────────

/// One stimulus presentation.
///
/// Channel values and `*_should_match` ground truth are fixed at generation
/// time; `*_response` fields start [`Response::Unanswered`] and are filled by
/// the presentation layer during play. Optional channels (`color`,
/// `visual_cue`, arithmetic) are `None` in modes that do not activate them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    /// 0-based sequence position.
    pub index: usize,
    /// The lag this trial is tested against. Equals the session baseline
    /// unless variable n-back drew a per-trial lag in `[1, baseline]`.
    pub n_back: usize,

    /// Grid cell, `0..GRID_POSITIONS`.
    pub position: u8,
    pub sound: String,
    pub color: Option<String>,
    pub visual_cue: Option<String>,
    pub arithmetic_operation: Option<ArithmeticOp>,
    pub arithmetic_number: Option<i64>,
    /// Combination of this trial's operand with the one at lag `n_back`,
    /// rounded to 2 decimals. Only set once `index >= n_back`.
    pub arithmetic_correct_answer: Option<f64>,

    pub position_should_match: bool,
    pub sound_should_match: bool,
    pub color_should_match: Option<bool>,
    pub visual_should_match: Option<bool>,

    pub position_response: Response,
    pub sound_response: Response,
    pub color_response: Response,
    pub visual_response: Response,
    /// The user's typed arithmetic answer, if any.
    pub arithmetic_answer: Option<f64>,
}

impl Trial {
    /// Record a match affirmation (or explicit rejection) for one channel.
    /// Arithmetic answers go through [`Self::record_arithmetic_answer`].
    pub fn record_response(&mut self, modality: Modality, response: Response) {
        match modality {
            Modality::Position => self.position_response = response,
            Modality::Sound => self.sound_response = response,
            Modality::Color => self.color_response = response,
            Modality::Visual => self.visual_response = response,
            Modality::Arithmetic => {}
        }
    }

    pub fn record_arithmetic_answer(&mut self, answer: f64) {
        self.arithmetic_answer = Some(answer);
    }

    /// Ground-truth match flag for a channel; `None` when inactive.
    pub fn should_match(&self, modality: Modality) -> Option<bool> {
        match modality {
            Modality::Position => Some(self.position_should_match),
            Modality::Sound => Some(self.sound_should_match),
            Modality::Color => self.color_should_match,
            Modality::Visual => self.visual_should_match,
            Modality::Arithmetic => None,
        }
    }

    /// Recorded response for a channel.
    pub fn response(&self, modality: Modality) -> Response {
        match modality {
            Modality::Position => self.position_response,
            Modality::Sound => self.sound_response,
            Modality::Color => self.color_response,
            Modality::Visual => self.visual_response,
            Modality::Arithmetic => Response::Unanswered,
        }
    }
}

// ── Session ─────────────────────────────────────────────────────────────────

/// Per-channel percentage scores plus the session total.
///
/// A channel with zero countable trials is `None` — "never tested" is
/// distinct from "scored 0%".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arithmetic_score: Option<f64>,
    pub total_score: f64,
}

/// One play-through: the trial list plus the config snapshot taken at start.
///
/// Timestamps are caller-supplied epoch milliseconds; the engine has no
/// clock of its own.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub game_mode: GameMode,
    /// Baseline lag for the session. Individual trials may carry a smaller
    /// lag when variable n-back is enabled.
    pub n_back_level: usize,
    pub trials: Vec<Trial>,
    pub start_time: u64,
    pub end_time: Option<u64>,
    /// Manual sessions never feed the level adapter.
    pub is_manual: bool,
    pub config: GameConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<SessionScores>,
}

impl Session {
    /// Generate a fresh session: trials are synthesized immediately, the
    /// config is snapshotted.
    pub fn new(
        game_mode: GameMode,
        n_back_level: usize,
        config: &GameConfig,
        start_time: u64,
        is_manual: bool,
        rng: &mut rand::rngs::SmallRng,
    ) -> Self {
        let trials = crate::trial_gen::generate_trials(game_mode, n_back_level, config, rng);
        Self {
            game_mode,
            n_back_level,
            trials,
            start_time,
            end_time: None,
            is_manual,
            config: config.clone(),
            scores: None,
        }
    }

    /// Score the completed session and stamp the end time.
    pub fn finish(&mut self, end_time: u64) -> SessionScores {
        let scores = crate::scoring::calculate_session_score(self);
        self.end_time = Some(end_time);
        self.scores = Some(scores);
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_roundtrip_through_arg_names() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_arg(mode.as_str()), Some(mode));
        }
        assert_eq!(GameMode::from_arg("quintuple-nback"), None);
    }

    #[test]
    fn test_mode_serde_matches_arg_names() {
        for mode in GameMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_sound_set_pools_are_same_size() {
        assert_eq!(SoundSet::Letters.pool().len(), 8);
        assert_eq!(SoundSet::Numbers.pool().len(), 8);
        assert_eq!(SoundSet::Nato.pool().len(), 8);
    }

    #[test]
    fn test_all_operations_disabled_falls_back_to_addition() {
        let ops = ArithmeticOperations {
            addition: false,
            subtraction: false,
            multiplication: false,
            division: false,
        };
        assert_eq!(ops.enabled(), vec![ArithmeticOp::Plus]);
    }

    #[test]
    fn test_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.trials_per_session, 20);
        assert_eq!(config.increase_threshold, 80.0);
        assert_eq!(config.maintain_threshold, 50.0);
        assert_eq!(config.decrease_strikes, 3);
        assert_eq!(config.sound_set(), SoundSet::Letters);
    }

    #[test]
    fn test_config_json_roundtrip_uses_camel_case() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"trialsPerSession\":20"));
        assert!(json.contains("\"jaeggiMode\":false"));
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trials_per_session, config.trials_per_session);
    }

    #[test]
    fn test_response_affirmed() {
        assert!(Response::Matched.affirmed());
        assert!(!Response::NonMatch.affirmed());
        assert!(!Response::Unanswered.affirmed());
    }
}
