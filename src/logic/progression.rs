//! Bracket progression: resolve placeholder slots, detect completion and the champion.

use crate::logic::standings::compute_standings;
use crate::models::{
    Completion, GameMatch, MatchId, Participant, Side, Slot, SlotSource, Tournament,
    TournamentFormat, TournamentStatus,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Apply progression to a tournament snapshot and return the updated copy.
///
/// Every unplayed match re-derives its placeholder slots from their sources;
/// completed matches are never rewritten. Then completion is assessed: a
/// finished tournament is marked completed with its winner, anything else
/// stays (or goes back to) in progress.
pub fn advance(tournament: &Tournament, now: DateTime<Utc>) -> Tournament {
    let mut next = tournament.clone();
    if next.status == TournamentStatus::Setup {
        return next;
    }
    resolve_slots(&mut next);
    settle(&mut next, now);
    next
}

/// Current completion state. A tournament without matches counts as playable.
pub fn assess(tournament: &Tournament) -> Completion {
    if tournament.matches.is_empty() {
        return Completion::Playable;
    }
    if tournament.matches.iter().all(|m| m.completed) && champion(tournament).is_some() {
        Completion::Finished
    } else if tournament.matches.iter().any(GameMatch::is_playable) {
        Completion::Playable
    } else {
        Completion::Blocked
    }
}

/// The tournament winner, once the deciding match (or the whole league) is played.
pub fn champion(tournament: &Tournament) -> Option<Participant> {
    match tournament.format {
        TournamentFormat::League => {
            if tournament.matches.is_empty() || !tournament.matches.iter().all(|m| m.completed) {
                return None;
            }
            compute_standings(&tournament.participants, &tournament.matches)
                .into_iter()
                .next()
                .map(|s| s.participant)
        }
        TournamentFormat::Knockout => tournament
            .matches
            .iter()
            .filter(|m| m.completed)
            .max_by_key(|m| m.round_number())
            .and_then(GameMatch::winner_participant)
            .cloned(),
        TournamentFormat::Champions => final_match(tournament)
            .filter(|m| m.completed)
            .and_then(GameMatch::winner_participant)
            .cloned(),
    }
}

/// The champions final: the winner-fed match of round G + 2.
pub fn final_match(tournament: &Tournament) -> Option<&GameMatch> {
    let final_round = tournament.group_stage_rounds()? + 2;
    tournament
        .round(final_round)
        .find(|m| matches!(m.source_a, Some(SlotSource::WinnerOf(_))))
}

/// Group stage qualifiers in rank order, once every group match is played.
fn qualifiers(tournament: &Tournament) -> Option<Vec<Participant>> {
    let g = tournament.group_stage_rounds()?;
    let group: Vec<&GameMatch> = tournament
        .matches
        .iter()
        .filter(|m| m.round_number() <= g)
        .collect();
    if !group.iter().all(|m| m.completed) {
        return None;
    }
    Some(
        compute_standings(&tournament.participants, group)
            .into_iter()
            .map(|s| s.participant)
            .collect(),
    )
}

/// Winner and loser of each completed match that may feed a later slot.
type Outcomes = HashMap<MatchId, (Option<Participant>, Option<Participant>)>;

fn outcomes(tournament: &Tournament) -> Outcomes {
    let completed = tournament.matches.iter().filter(|m| m.completed);
    let feeders: Vec<&GameMatch> = match tournament.group_stage_rounds() {
        // Champions finals wait for both semifinals.
        Some(g) => {
            let semis: Vec<&GameMatch> = tournament.round(g + 1).collect();
            if semis.is_empty() || !semis.iter().all(|m| m.completed) {
                return Outcomes::new();
            }
            semis
        }
        None => completed.collect(),
    };
    feeders
        .into_iter()
        .map(|m| {
            (
                m.id,
                (m.winner_participant().cloned(), m.loser_participant().cloned()),
            )
        })
        .collect()
}

fn resolve(source: SlotSource, ranks: Option<&[Participant]>, outcomes: &Outcomes) -> Option<Participant> {
    match source {
        SlotSource::Rank(n) => ranks?.get((n as usize).checked_sub(1)?).cloned(),
        SlotSource::WinnerOf(id) => outcomes.get(&id)?.0.clone(),
        SlotSource::LoserOf(id) => outcomes.get(&id)?.1.clone(),
    }
}

/// True once any semifinal has a result; from then on the semifinal seeding is fixed.
fn knockout_started(tournament: &Tournament) -> bool {
    tournament
        .group_stage_rounds()
        .is_some_and(|g| tournament.round(g + 1).any(|m| m.completed))
}

fn resolve_slots(tournament: &mut Tournament) {
    let ranks = qualifiers(tournament);
    let outcomes = outcomes(tournament);
    let seeding_fixed = knockout_started(tournament);
    let mut seeded = false;

    for m in tournament.matches.iter_mut().filter(|m| !m.completed) {
        for side in [Side::A, Side::B] {
            let Some(source) = m.source(side) else {
                continue;
            };
            if seeding_fixed && matches!(source, SlotSource::Rank(_)) {
                continue;
            }
            let slot = resolve(source, ranks.as_deref(), &outcomes)
                .map(Slot::Resolved)
                .unwrap_or_else(|| source.into());
            if *m.slot(side) != slot {
                if let Slot::Resolved(p) = &slot {
                    log::debug!("Match {:?}: {:?} resolved to {}", m.match_number, source, p.name);
                    seeded |= matches!(source, SlotSource::Rank(_));
                }
                *m.slot_mut(side) = slot;
            }
        }
    }

    if seeded {
        if let Some(ranks) = &ranks {
            let top: Vec<&str> = ranks.iter().take(4).map(|p| p.name.as_str()).collect();
            log::info!("Group stage of '{}' complete, qualified: {:?}", tournament.name, top);
        }
    }
}

fn settle(tournament: &mut Tournament, now: DateTime<Utc>) {
    match assess(tournament) {
        Completion::Finished => {
            tournament.winner = champion(tournament);
            tournament.status = TournamentStatus::Completed;
            if tournament.completed_at.is_none() {
                tournament.completed_at = Some(now);
                log::info!(
                    "Tournament '{}' completed, winner: {}",
                    tournament.name,
                    tournament.winner.as_ref().map_or("-", |p| p.name.as_str())
                );
            }
        }
        completion => {
            if completion == Completion::Blocked {
                log::warn!(
                    "Tournament '{}' is blocked: no remaining match has two participants",
                    tournament.name
                );
            }
            tournament.status = TournamentStatus::InProgress;
            tournament.winner = None;
            tournament.completed_at = None;
        }
    }
}
