//! Recording and correcting match scores.

use crate::logic::progression::advance;
use crate::models::{MatchId, Tournament, TournamentError, TournamentResult};
use chrono::{DateTime, Utc};

/// Enter the first result of a match, then advance the bracket.
///
/// Fails if the match is unknown, already completed (use [`edit_result`]), or
/// still waiting on a participant.
pub fn record_result(
    tournament: &Tournament,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
    now: DateTime<Utc>,
) -> TournamentResult<Tournament> {
    let idx = tournament
        .match_index(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    let m = &tournament.matches[idx];
    if m.completed {
        return Err(TournamentError::invalid_state(
            "Match already has a result; edit it instead",
        ));
    }
    if !m.both_resolved() {
        return Err(TournamentError::invalid_state(
            "Match participants are not decided yet",
        ));
    }

    let mut next = tournament.clone();
    next.matches[idx].apply_score(score_a, score_b, now);
    Ok(advance(&next, now))
}

/// Correct the result of a completed match, then advance the bracket again.
///
/// Later matches that were already played keep their participants.
pub fn edit_result(
    tournament: &Tournament,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
    now: DateTime<Utc>,
) -> TournamentResult<Tournament> {
    let idx = tournament
        .match_index(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if !tournament.matches[idx].completed {
        return Err(TournamentError::invalid_state(
            "Cannot edit a match that has not been played",
        ));
    }

    let mut next = tournament.clone();
    next.matches[idx].apply_score(score_a, score_b, now);
    Ok(advance(&next, now))
}
