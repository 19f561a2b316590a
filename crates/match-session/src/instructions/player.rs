//! Player instructions

use rpa_match_logic::ObjectId;
use tracing::info;

use crate::error::{require, SessionError};
use crate::state::{MatchRecord, MatchStatus, Phase, PlayerId};

/// Join a match as the opponent
pub fn join_match(record: &mut MatchRecord, player: PlayerId) -> Result<(), SessionError> {
    require!(!record.is_participant(&player), SessionError::AlreadyParticipant);
    require!(record.opponent.is_none(), SessionError::MatchFull);

    info!(match_id = %record.id, %player, "opponent joined");
    record.opponent = Some(player);
    if record.status == MatchStatus::Matching {
        record.status = MatchStatus::Open;
    }
    Ok(())
}

/// Record a player's pick
///
/// The creator picks first, then the opponent. Each pick is written once;
/// the opponent's pick moves the match to resolving.
pub fn select_object(
    record: &mut MatchRecord,
    player: &PlayerId,
    object: ObjectId,
) -> Result<(), SessionError> {
    require!(record.is_participant(player), SessionError::NotParticipant);

    if record.is_creator(player) {
        require!(
            matches!(record.phase, Phase::MakeSelection),
            SessionError::AlreadySelected
        );
        info!(match_id = %record.id, %player, %object, "creator selected");
        record.phase = Phase::SelectionMade { selection_a: object };
        return Ok(());
    }

    let selection_a = match &record.phase {
        Phase::MakeSelection => return Err(SessionError::NotYourTurn),
        Phase::SelectionMade { selection_a } => selection_a.clone(),
        _ => return Err(SessionError::AlreadySelected),
    };

    info!(match_id = %record.id, %player, %object, "opponent selected");
    record.phase = Phase::Resolving { selection_a, selection_b: object };
    Ok(())
}
