//! League table: points, goals and ordering.

use crate::models::{GameMatch, Participant, ParticipantId, Standing, Tournament, TournamentFormat};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Compute the table for `participants` from the completed matches in `matches`.
///
/// Win 3, draw 1, loss 0. Ordered by points, goal difference, goals for (all
/// descending), then name (case-insensitive) and id so equal rows are stable.
/// Matches involving someone outside `participants` only count for the side that is listed.
pub fn compute_standings<'a>(
    participants: &[Participant],
    matches: impl IntoIterator<Item = &'a GameMatch>,
) -> Vec<Standing> {
    let mut table: Vec<Standing> = participants.iter().cloned().map(Standing::new).collect();
    let index: HashMap<ParticipantId, usize> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    for m in matches.into_iter().filter(|m| m.completed) {
        let (Some(a), Some(b)) = (m.slot_a.participant(), m.slot_b.participant()) else {
            continue;
        };
        let score_a = m.score_a.unwrap_or(0);
        let score_b = m.score_b.unwrap_or(0);
        if let Some(&i) = index.get(&a.id) {
            table[i].record(score_a, score_b);
        }
        if let Some(&i) = index.get(&b.id) {
            table[i].record(score_b, score_a);
        }
    }

    table.sort_by_cached_key(|s| {
        (
            Reverse(s.points),
            Reverse(s.goal_difference),
            Reverse(s.goals_for),
            s.participant.name.to_lowercase(),
            s.participant.id,
        )
    });
    table
}

/// The table shown for a tournament. For champions this is the group stage
/// table (it decides who reaches the semifinals); otherwise every match counts.
pub fn tournament_standings(tournament: &Tournament) -> Vec<Standing> {
    match (tournament.format, tournament.group_stage_rounds()) {
        (TournamentFormat::Champions, Some(g)) => compute_standings(
            &tournament.participants,
            tournament.matches.iter().filter(|m| m.round_number() <= g),
        ),
        _ => compute_standings(&tournament.participants, &tournament.matches),
    }
}
