//! Rock, Paper, Anything - match sessions
//!
//! Drives one two-player match from the first pick to a final result:
//! picks are written once each, the relationship graph decides when it can,
//! and the tiebreak oracle is consulted at most once when it cannot.
//! Persistence and realtime delivery of the record belong to the host.

mod state;
mod instructions;
mod error;
mod config;

pub use config::{ConfigError, OracleConfig, DEFAULT_API_KEY_ENV};
pub use error::SessionError;
pub use instructions::{
    award_counters, join_match, request_tiebreak, resolve_match, run_tiebreak, select_object,
    settle_tiebreak,
};
pub use state::{
    GameResult, MatchRecord, MatchResult, MatchStatus, OracleState, Phase, PhaseKind, PlayerId,
};
