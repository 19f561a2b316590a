//! Match record definitions

use std::fmt;

use rpa_match_logic::ObjectId;
use serde::{Deserialize, Serialize};

/// Identity of a player, as issued by the matchmaking service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Turn-based match status, numbered as the matchmaking service stores it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Unknown,
    Open,
    Ended,
    Matching,
}

impl MatchStatus {
    pub fn code(self) -> u8 {
        match self {
            MatchStatus::Unknown => 0,
            MatchStatus::Open => 1,
            MatchStatus::Ended => 2,
            MatchStatus::Matching => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MatchStatus::Unknown),
            1 => Some(MatchStatus::Open),
            2 => Some(MatchStatus::Ended),
            3 => Some(MatchStatus::Matching),
            _ => None,
        }
    }

    /// Statuses listed in a player's lobby
    pub fn is_listed(self) -> bool {
        matches!(self, MatchStatus::Open | MatchStatus::Matching)
    }
}

/// Progress of the tiebreak oracle for a tied match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleState {
    /// Tie found, oracle not consulted yet
    Pending,
    /// Oracle consulted with these names, waiting for its completion
    Requested { name_a: String, name_b: String },
    /// Oracle answered without naming a winner
    Unresolved { transcript: String },
}

/// Final result of a match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner {
        player: PlayerId,
        object: ObjectId,
        /// Oracle's reason when the tiebreak decided the match
        flavor_text: Option<String>,
    },
    /// Both players picked the same object
    Draw,
}

/// Match state machine
///
/// `MakeSelection → SelectionMade → Resolving → Tiebreak? → Finished`
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the creator's pick
    #[default]
    MakeSelection,
    /// Creator picked, waiting for the opponent
    SelectionMade { selection_a: ObjectId },
    /// Both picked, waiting for a graph snapshot
    Resolving { selection_a: ObjectId, selection_b: ObjectId },
    /// Graph could not decide
    Tiebreak { selection_a: ObjectId, selection_b: ObjectId, oracle: OracleState },
    Finished { selection_a: ObjectId, selection_b: ObjectId, result: MatchResult },
}

/// Phase tag without its data, for error reporting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    MakeSelection,
    SelectionMade,
    Resolving,
    Tiebreak,
    Finished,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseKind::MakeSelection => "make-selection",
            PhaseKind::SelectionMade => "selection-made",
            PhaseKind::Resolving => "resolving",
            PhaseKind::Tiebreak => "tiebreak",
            PhaseKind::Finished => "finished",
        };
        f.write_str(name)
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::MakeSelection => PhaseKind::MakeSelection,
            Phase::SelectionMade { .. } => PhaseKind::SelectionMade,
            Phase::Resolving { .. } => PhaseKind::Resolving,
            Phase::Tiebreak { .. } => PhaseKind::Tiebreak,
            Phase::Finished { .. } => PhaseKind::Finished,
        }
    }

    pub fn selection_a(&self) -> Option<&ObjectId> {
        match self {
            Phase::MakeSelection => None,
            Phase::SelectionMade { selection_a }
            | Phase::Resolving { selection_a, .. }
            | Phase::Tiebreak { selection_a, .. }
            | Phase::Finished { selection_a, .. } => Some(selection_a),
        }
    }

    pub fn selection_b(&self) -> Option<&ObjectId> {
        match self {
            Phase::MakeSelection | Phase::SelectionMade { .. } => None,
            Phase::Resolving { selection_b, .. }
            | Phase::Tiebreak { selection_b, .. }
            | Phase::Finished { selection_b, .. } => Some(selection_b),
        }
    }
}

/// Player's view of a match result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Won,
    Lost,
    Tied,
}

/// Persisted match document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    /// Player who created the match and picks first
    pub creator: PlayerId,
    pub opponent: Option<PlayerId>,
    pub status: MatchStatus,
    pub phase: Phase,
    /// Unix timestamp (seconds) supplied by the caller
    pub created_at: i64,
    /// Object counters already updated for this match
    pub awarded: bool,
}

impl MatchRecord {
    /// New match waiting for an opponent and the creator's pick
    pub fn new(id: impl Into<String>, creator: PlayerId, created_at: i64) -> Self {
        Self {
            id: id.into(),
            creator,
            opponent: None,
            status: MatchStatus::Matching,
            phase: Phase::MakeSelection,
            created_at,
            awarded: false,
        }
    }

    pub fn is_creator(&self, player: &PlayerId) -> bool {
        &self.creator == player
    }

    pub fn is_participant(&self, player: &PlayerId) -> bool {
        self.is_creator(player) || self.opponent.as_ref() == Some(player)
    }

    /// Participants in pick order
    pub fn participants(&self) -> Vec<&PlayerId> {
        std::iter::once(&self.creator).chain(self.opponent.as_ref()).collect()
    }

    /// Whether the match shows up in `player`'s lobby
    ///
    /// Only open or matching records are listed, and other players only see
    /// a match once the creator has picked.
    pub fn visible_to(&self, player: &PlayerId) -> bool {
        self.status.is_listed()
            && (self.is_creator(player) || self.phase.kind() != PhaseKind::MakeSelection)
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.phase {
            Phase::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match self.result()? {
            MatchResult::Winner { player, .. } => Some(player),
            MatchResult::Draw => None,
        }
    }

    /// Result from `player`'s point of view, once the match has one
    ///
    /// A match waiting on the tiebreak oracle reads as tied.
    pub fn result_for(&self, player: &PlayerId) -> Option<GameResult> {
        if !self.is_participant(player) {
            return None;
        }
        match &self.phase {
            Phase::Finished { result: MatchResult::Winner { player: winner, .. }, .. } => {
                Some(if winner == player { GameResult::Won } else { GameResult::Lost })
            }
            Phase::Finished { result: MatchResult::Draw, .. } | Phase::Tiebreak { .. } => {
                Some(GameResult::Tied)
            }
            _ => None,
        }
    }

    /// Error for an operation that needs the match in `expected`
    pub(crate) fn wrong_phase(&self, expected: PhaseKind) -> crate::SessionError {
        crate::SessionError::InvalidPhase { expected, found: self.phase.kind() }
    }
}
