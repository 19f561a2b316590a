//! Resolution instructions

use rpa_match_logic::{resolve, ObjectId, Outcome, Relation, RelationshipGraph, ResolveError};
use tracing::{debug, info, warn};

use crate::error::{require, SessionError};
use crate::state::{MatchRecord, MatchResult, MatchStatus, OracleState, Phase, PhaseKind, PlayerId};

/// Decide a match whose two picks are in
///
/// A decided pairing or a self-selection finishes the match. Any other tie
/// moves it to the tiebreak phase. On `InvalidSelection` the match stays in
/// resolving so the caller can retry with a fresh snapshot.
pub fn resolve_match(
    record: &mut MatchRecord,
    graph: &RelationshipGraph,
) -> Result<Outcome, SessionError> {
    let (selection_a, selection_b) = match &record.phase {
        Phase::Resolving { selection_a, selection_b } => (selection_a.clone(), selection_b.clone()),
        _ => return Err(record.wrong_phase(PhaseKind::Resolving)),
    };
    let opponent = record.opponent.clone().ok_or(SessionError::OpponentMissing)?;

    let outcome = resolve(&selection_a, &selection_b, graph)?;

    if outcome.is_tie() && selection_a != selection_b {
        if graph.relation(&selection_a, &selection_b) == Some(Relation::Contradictory) {
            warn!(
                match_id = %record.id,
                a = %selection_a,
                b = %selection_b,
                "objects claim victory over each other"
            );
        }
        info!(match_id = %record.id, "no decision in graph, awaiting tiebreak");
        record.phase = Phase::Tiebreak { selection_a, selection_b, oracle: OracleState::Pending };
        return Ok(outcome);
    }

    let result = match outcome {
        Outcome::A => MatchResult::Winner {
            player: record.creator.clone(),
            object: selection_a.clone(),
            flavor_text: None,
        },
        Outcome::B => MatchResult::Winner {
            player: opponent,
            object: selection_b.clone(),
            flavor_text: None,
        },
        Outcome::Tie => MatchResult::Draw,
    };
    finish(record, selection_a, selection_b, result);
    Ok(outcome)
}

pub(crate) fn finish(
    record: &mut MatchRecord,
    selection_a: ObjectId,
    selection_b: ObjectId,
    result: MatchResult,
) {
    match &result {
        MatchResult::Winner { player, object, .. } => {
            info!(match_id = %record.id, winner = %player, %object, "match finished");
        }
        MatchResult::Draw => info!(match_id = %record.id, "match drawn"),
    }
    record.phase = Phase::Finished { selection_a, selection_b, result };
    record.status = MatchStatus::Ended;
}

/// Update the informational object counters for a finished match
///
/// Each distinct pick gains one use and the winning object one win.
/// Runs once per match. If either object is missing from the graph nothing
/// changes and `InvalidSelection` is returned.
pub fn award_counters(
    record: &mut MatchRecord,
    graph: &mut RelationshipGraph,
) -> Result<(), SessionError> {
    require!(!record.awarded, SessionError::AlreadyAwarded);
    let (selection_a, selection_b, result) = match &record.phase {
        Phase::Finished { selection_a, selection_b, result } => (selection_a, selection_b, result),
        _ => return Err(record.wrong_phase(PhaseKind::Finished)),
    };

    for id in [selection_a, selection_b] {
        require!(graph.contains(id), ResolveError::InvalidSelection(id.clone()));
    }

    let mut used = vec![selection_a];
    if selection_b != selection_a {
        used.push(selection_b);
    }
    for id in used {
        if let Some(object) = graph.get_mut(id) {
            object.times_used = object.times_used.saturating_add(1);
        }
    }
    if let MatchResult::Winner { object, .. } = result {
        if let Some(winner) = graph.get_mut(object) {
            winner.win_count = winner.win_count.saturating_add(1);
        }
    }

    debug!(match_id = %record.id, "counters awarded");
    record.awarded = true;
    Ok(())
}

/// Player holding a given side of the match
pub(crate) fn player_for_side(record: &MatchRecord, side_a: bool) -> Result<PlayerId, SessionError> {
    if side_a {
        Ok(record.creator.clone())
    } else {
        record.opponent.clone().ok_or(SessionError::OpponentMissing)
    }
}
