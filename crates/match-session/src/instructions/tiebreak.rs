//! Tiebreak instructions
//!
//! The oracle is consulted at most once per match. Its answer is final when
//! it names a winner; otherwise the match stays tied and unresolved.

use rpa_match_logic::{
    parse_verdict, CompletionStream, RelationshipGraph, ResolveError, TiebreakOracle,
    TiebreakRequest, TiebreakVerdict, TiebreakWinner,
};
use tracing::{info, warn};

use crate::config::OracleConfig;
use crate::error::{require, SessionError};
use crate::instructions::resolution::{finish, player_for_side};
use crate::state::{MatchRecord, MatchResult, OracleState, Phase, PhaseKind};

/// Claim the match's single oracle consultation
///
/// Returns the request to send. Object names come from `graph`; if either
/// pick is missing the match is left pending.
pub fn request_tiebreak(
    record: &mut MatchRecord,
    graph: &RelationshipGraph,
    config: &OracleConfig,
) -> Result<TiebreakRequest, SessionError> {
    let found = record.phase.kind();
    let Phase::Tiebreak { selection_a, selection_b, oracle } = &mut record.phase else {
        return Err(SessionError::InvalidPhase { expected: PhaseKind::Tiebreak, found });
    };
    if *oracle != OracleState::Pending {
        return Err(SessionError::TiebreakAlreadyRequested);
    }

    let name_a = graph
        .get(selection_a)
        .ok_or_else(|| ResolveError::InvalidSelection(selection_a.clone()))?
        .name
        .clone();
    let name_b = graph
        .get(selection_b)
        .ok_or_else(|| ResolveError::InvalidSelection(selection_b.clone()))?
        .name
        .clone();

    let request = config.request(&name_a, &name_b);
    info!(match_id = %record.id, %name_a, %name_b, "tiebreak requested");
    *oracle = OracleState::Requested { name_a, name_b };
    Ok(request)
}

/// Settle a requested tiebreak with the oracle's final text
///
/// `request` must be the one issued for this match. A verdict naming one
/// of the two objects finishes the match with the reason as flavor text.
/// Anything else leaves the match unresolved with the raw transcript kept;
/// the oracle is not offered again.
pub fn settle_tiebreak(
    record: &mut MatchRecord,
    request: &TiebreakRequest,
    text: &str,
) -> Result<Option<TiebreakVerdict>, SessionError> {
    let (selection_a, selection_b, name_a, name_b) = match &record.phase {
        Phase::Tiebreak {
            selection_a,
            selection_b,
            oracle: OracleState::Requested { name_a, name_b },
        } => (selection_a.clone(), selection_b.clone(), name_a.clone(), name_b.clone()),
        Phase::Tiebreak { oracle: OracleState::Pending, .. } => {
            return Err(SessionError::TiebreakNotRequested)
        }
        Phase::Tiebreak { .. } => return Err(SessionError::TiebreakAlreadyRequested),
        _ => return Err(record.wrong_phase(PhaseKind::Tiebreak)),
    };

    require!(
        request.name_a == name_a && request.name_b == name_b,
        SessionError::TiebreakMismatch
    );

    let Some(verdict) = parse_verdict(text, &name_a, &name_b) else {
        warn!(match_id = %record.id, transcript = %text, "tiebreak named no winner");
        record.phase = Phase::Tiebreak {
            selection_a,
            selection_b,
            oracle: OracleState::Unresolved { transcript: text.to_string() },
        };
        return Ok(None);
    };

    let side_a = verdict.winner == TiebreakWinner::A;
    let player = player_for_side(record, side_a)?;
    let object = if side_a { selection_a.clone() } else { selection_b.clone() };
    let result = MatchResult::Winner { player, object, flavor_text: Some(verdict.reason.clone()) };
    finish(record, selection_a, selection_b, result);
    Ok(Some(verdict))
}

/// Request, stream and settle a tiebreak in one call
///
/// A transport failure still uses up the consultation: the match is marked
/// unresolved before the error is returned.
pub fn run_tiebreak<O: TiebreakOracle>(
    record: &mut MatchRecord,
    graph: &RelationshipGraph,
    oracle: &O,
    config: &OracleConfig,
) -> Result<Option<TiebreakVerdict>, SessionError> {
    let request = request_tiebreak(record, graph, config)?;

    let events = match oracle.open(&request) {
        Ok(events) => events,
        Err(e) => {
            warn!(match_id = %record.id, error = %e, "tiebreak oracle unavailable");
            settle_tiebreak(record, &request, "")?;
            return Err(e.into());
        }
    };

    let mut stream = CompletionStream::new();
    stream.drain(events);
    if stream.skipped() > 0 {
        warn!(match_id = %record.id, skipped = stream.skipped(), "undecodable tiebreak chunks");
    }
    settle_tiebreak(record, &request, stream.text())
}
