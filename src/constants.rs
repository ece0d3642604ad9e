//! Stimulus pools and generation constants.
//!
//! Every channel draws its values uniformly from a fixed pool:
//! - position: one of [`GRID_POSITIONS`] cells on the 3×3 board (center unused)
//! - sound / visual cue: the active sound set ([`LETTERS`], [`NUMBERS`], [`NATO`])
//! - color: [`COLORS`]
//! - arithmetic: an enabled operator plus an operand in `[0, arithmetic_max_number]`

/// Number of grid cells a position stimulus can occupy.
pub const GRID_POSITIONS: u8 = 8;

/// Consonant sound set (the classic dual n-back letters).
pub const LETTERS: [&str; 8] = ["C", "H", "K", "L", "Q", "R", "S", "T"];

/// Spoken-number sound set. Only the first 8 entries are used for stimuli,
/// matching the letter-set size.
pub const NUMBERS: [&str; 14] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13",
];

/// NATO phonetic alphabet sound set.
pub const NATO: [&str; 8] = [
    "ALPHA", "BRAVO", "CHARLIE", "DELTA", "ECHO", "FOXTROT", "GOLF", "HOTEL",
];

/// Color stimulus palette.
pub const COLORS: [&str; 4] = ["blue", "green", "yellow", "red"];

/// Shape pool, reserved for a future shape channel; no current game mode
/// generates shape stimuli.
pub const SHAPES: [&str; 4] = ["circle", "triangle", "square", "diamond"];

/// Per-channel, per-trial match probability in free-random pattern generation.
pub const MATCH_PROBABILITY: f64 = 0.25;

/// Jaeggi fixed quotas: 2 simultaneous position+sound matches,
/// plus 2 position-only and 2 sound-only matches per session.
pub const JAEGGI_SIMULTANEOUS_MATCHES: usize = 2;
pub const JAEGGI_SINGLE_MATCHES: usize = 2;

/// Minimum eligible indices (`trials - n_back`) for the Jaeggi quotas to fit.
pub const JAEGGI_MIN_ELIGIBLE: usize = 2 * JAEGGI_SINGLE_MATCHES + JAEGGI_SIMULTANEOUS_MATCHES;
