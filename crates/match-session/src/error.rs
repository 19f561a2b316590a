//! Session error codes

use rpa_match_logic::{OracleError, ResolveError};

use crate::config::ConfigError;
use crate::state::PhaseKind;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("player is not a participant in this match")]
    NotParticipant,

    #[error("player is already a participant in this match")]
    AlreadyParticipant,

    #[error("match already has two participants")]
    MatchFull,

    #[error("the match creator has not selected yet")]
    NotYourTurn,

    #[error("no opponent has joined this match")]
    OpponentMissing,

    #[error("player has already made a selection")]
    AlreadySelected,

    #[error("invalid match phase: expected {expected}, found {found}")]
    InvalidPhase { expected: PhaseKind, found: PhaseKind },

    #[error("tiebreak oracle already consulted for this match")]
    TiebreakAlreadyRequested,

    #[error("tiebreak oracle has not been consulted yet")]
    TiebreakNotRequested,

    #[error("tiebreak request was not issued for this match")]
    TiebreakMismatch,

    #[error("counters already awarded for this match")]
    AlreadyAwarded,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Return early with `$err` unless `$cond` holds
macro_rules! require {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

pub(crate) use require;
