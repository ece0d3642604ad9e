//! Persistent per-user state: adaptive level, strike history, and daily
//! aggregates.
//!
//! The engine only mutates in-memory structures; loading and saving them is
//! the persistence collaborator's job, which is why everything here derives
//! serde. Dates are caller-supplied ISO strings — the engine has no clock.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adaptive::determine_next_level;
use crate::scoring::calculate_session_score;
use crate::types::{GameConfig, GameMode, Session};

/// Compact per-session record kept in the daily history.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub game_mode: GameMode,
    pub n_back_level: usize,
    pub total_score: f64,
}

/// One day's appended session history. Entries are never mutated after
/// being appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: String,
    pub sessions: Vec<SessionSummary>,
    pub average_n_back: f64,
}

impl DailyStats {
    pub fn total_sessions(&self) -> usize {
        self.sessions.len()
    }
}

/// Per-user state across sessions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    /// Epoch milliseconds, caller-supplied at creation.
    pub created_at: u64,
    pub current_n_back_level: usize,
    pub current_game_mode: GameMode,
    /// Consecutive below-maintain-threshold sessions.
    pub strike_count: u32,
    /// Daily history keyed by ISO date; BTreeMap keeps exports ordered.
    pub daily_stats: BTreeMap<String, DailyStats>,
    pub config: GameConfig,
}

impl Profile {
    pub fn new(name: impl Into<String>, created_at: u64) -> Self {
        Self {
            name: name.into(),
            created_at,
            current_n_back_level: GameMode::DualNback.starting_level(),
            current_game_mode: GameMode::DualNback,
            strike_count: 0,
            daily_stats: BTreeMap::new(),
            config: GameConfig::default(),
        }
    }

    /// Fold a finished session into the profile: run the level adapter and
    /// append the day's history.
    ///
    /// Manual (fixed-level) sessions leave the profile untouched — they
    /// mutate neither level, strikes, nor history.
    pub fn apply_session(&mut self, session: &Session, date: &str) {
        if session.is_manual {
            return;
        }
        let scores = session
            .scores
            .unwrap_or_else(|| calculate_session_score(session));

        let decision = determine_next_level(
            session.n_back_level,
            scores.total_score,
            self.strike_count,
            &session.config,
        );
        self.current_n_back_level = decision.next_level;
        self.strike_count = decision.new_strike_count;

        let day = self
            .daily_stats
            .entry(date.to_string())
            .or_insert_with(|| DailyStats {
                date: date.to_string(),
                sessions: Vec::new(),
                average_n_back: 0.0,
            });
        day.sessions.push(SessionSummary {
            game_mode: session.game_mode,
            n_back_level: session.n_back_level,
            total_score: scores.total_score,
        });
        day.average_n_back = day
            .sessions
            .iter()
            .map(|s| s.n_back_level as f64)
            .sum::<f64>()
            / day.sessions.len() as f64;
    }

    /// Tab-separated daily history: date, average n-back, session count.
    pub fn export_stats(&self) -> String {
        let mut lines = vec!["Date\tAverage N-Back\tSessions".to_string()];
        for (date, stats) in &self.daily_stats {
            lines.push(format!(
                "{}\t{:.2}\t{}",
                date,
                stats.average_n_back,
                stats.total_sessions()
            ));
        }
        lines.join("\n")
    }

    pub fn clear_history(&mut self) {
        self.daily_stats.clear();
    }
}
