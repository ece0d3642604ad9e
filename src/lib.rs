//! # nback — trial generation and scoring engine for n-back training
//!
//! The engine synthesizes a stimulus sequence with a controlled density and
//! distribution of matches across independent channels (position, sound,
//! color, visual cue, arithmetic), scores a completed sequence of user
//! responses under one of two accuracy semantics, and feeds the total into a
//! level-adaptation staircase.
//!
//! ## Pipeline
//!
//! | Stage | Module | Description |
//! |-------|--------|-------------|
//! | 1 | [`match_pattern`] | Plan which trial indices must repeat the value from N trials back (free-random or fixed-quota) |
//! | 2 | [`trial_gen`] | Realize the plan into concrete trial values, wiring mandated repeats and deriving arithmetic answers |
//! | 3 | [`scoring`] | Compare recorded responses against ground truth (signal-detection or all-trials semantics) |
//! | 4 | [`adaptive`] | Map the total score and strike history to the next difficulty level |
//!
//! The caller — a presentation/session layer — drives the loop: generate a
//! [`types::Session`], present each trial, record responses, then score and
//! (for adaptive runs) fold the result into a [`profile::Profile`].
//!
//! The engine is synchronous, pure computation with no I/O or clock. All
//! randomness flows through a caller-provided `SmallRng`, so a fixed seed
//! reproduces an entire session.

pub mod adaptive;
pub mod constants;
pub mod match_pattern;
pub mod profile;
pub mod scoring;
pub mod simulation;
pub mod trial_gen;
pub mod types;
