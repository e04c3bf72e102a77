//! Match generation for league, knockout and champions tournaments.

use crate::models::{
    group_stage_rounds, GameMatch, MatchId, Participant, Slot, SlotSource, TournamentError,
    TournamentFormat, TournamentId, TournamentResult,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate the full ordered match list for a tournament.
///
/// League uses the participants in input order and consumes no randomness.
/// Knockout and champions shuffle the participants once with `rng`.
/// Match numbers run from 1 in the returned order.
pub fn generate_matches<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participants: &[Participant],
    format: TournamentFormat,
    rng: &mut R,
) -> TournamentResult<Vec<GameMatch>> {
    let required = format.min_participants();
    if participants.len() < required {
        return Err(TournamentError::validation(format!(
            "Tournament must have at least {} participants",
            required
        )));
    }

    let mut matches = match format {
        TournamentFormat::League => league_matches(tournament_id, participants),
        TournamentFormat::Knockout => knockout_matches(tournament_id, participants, rng),
        TournamentFormat::Champions => champions_matches(tournament_id, participants, rng),
    };
    for (i, m) in matches.iter_mut().enumerate() {
        m.match_number = Some(i as u32 + 1);
    }
    Ok(matches)
}

/// Every unordered pair once, all in round 1: (0,1), (0,2), ..., (1,2), ...
fn league_matches(tournament_id: TournamentId, participants: &[Participant]) -> Vec<GameMatch> {
    let n = participants.len();
    let mut matches = Vec::with_capacity(n * (n - 1) / 2);
    for (i, a) in participants.iter().enumerate() {
        for b in &participants[i + 1..] {
            matches.push(GameMatch::new(
                tournament_id,
                a.clone().into(),
                b.clone().into(),
                1,
            ));
        }
    }
    matches
}

/// Someone advancing into the next knockout round.
enum Entry {
    /// Sat out the previous round and advances without playing.
    Bye(Participant),
    WinnerOf(MatchId),
}

impl Entry {
    fn slot(&self) -> Slot {
        match self {
            Entry::Bye(p) => Slot::Resolved(p.clone()),
            Entry::WinnerOf(id) => Slot::PendingMatchWinner(*id),
        }
    }

    fn source(&self) -> Option<SlotSource> {
        match self {
            Entry::Bye(_) => None,
            Entry::WinnerOf(id) => Some(SlotSource::WinnerOf(*id)),
        }
    }
}

/// Single elimination. Round 1 pairs the shuffled list consecutively; an odd
/// participant out gets a bye. Each later round pairs entry 2k with entry 2k+1
/// of the previous round's advancing entries, carrying an odd last entry forward.
fn knockout_matches<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participants: &[Participant],
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let mut matches = Vec::with_capacity(shuffled.len().saturating_sub(1));
    let mut entries = Vec::with_capacity(shuffled.len().div_ceil(2));

    let mut pairs = shuffled.chunks_exact(2);
    for pair in &mut pairs {
        let m = GameMatch::new(tournament_id, pair[0].clone().into(), pair[1].clone().into(), 1);
        entries.push(Entry::WinnerOf(m.id));
        matches.push(m);
    }
    if let [odd] = pairs.remainder() {
        log::debug!("{} gets a first round bye", odd.name);
        entries.push(Entry::Bye(odd.clone()));
    }

    let mut round = 1;
    while entries.len() > 1 {
        round += 1;
        let mut next = Vec::with_capacity(entries.len().div_ceil(2));
        let mut iter = entries.into_iter();
        while let Some(a) = iter.next() {
            let Some(b) = iter.next() else {
                next.push(a);
                break;
            };
            let mut m = GameMatch::new(tournament_id, a.slot(), b.slot(), round);
            m.source_a = a.source();
            m.source_b = b.source();
            next.push(Entry::WinnerOf(m.id));
            matches.push(m);
        }
        entries = next;
    }
    matches
}

/// Group stage with everyone, then semifinals (1 v 4, 2 v 3), third place match, final.
fn champions_matches<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    participants: &[Participant],
    rng: &mut R,
) -> Vec<GameMatch> {
    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let n = shuffled.len();
    let group_rounds = group_stage_rounds(n);
    let mut matches = Vec::new();
    for round in 1..=group_rounds {
        for (a, b) in group_round_pairs(n, round) {
            matches.push(GameMatch::new(
                tournament_id,
                shuffled[a].clone().into(),
                shuffled[b].clone().into(),
                round,
            ));
        }
    }

    let semi_round = group_rounds + 1;
    let final_round = semi_round + 1;
    let semi_1 = GameMatch::pending(tournament_id, SlotSource::Rank(1), SlotSource::Rank(4), semi_round);
    let semi_2 = GameMatch::pending(tournament_id, SlotSource::Rank(2), SlotSource::Rank(3), semi_round);
    let third_place = GameMatch::pending(
        tournament_id,
        SlotSource::LoserOf(semi_1.id),
        SlotSource::LoserOf(semi_2.id),
        final_round,
    );
    let final_match = GameMatch::pending(
        tournament_id,
        SlotSource::WinnerOf(semi_1.id),
        SlotSource::WinnerOf(semi_2.id),
        final_round,
    );
    matches.extend([semi_1, semi_2, third_place, final_match]);
    matches
}

/// Index pairs for one group round (1-based `round`).
///
/// Odd `n`: participant `(round - 1) % n` sits out and the others meet as
/// `(bye + k, bye - k) mod n`, so over `n` rounds every pair meets exactly once.
/// Even `n`: circle method with index 0 fixed and the rest rotating one step per
/// round; no pair repeats within the first `n - 1` rounds.
pub fn group_round_pairs(n: usize, round: u32) -> Vec<(usize, usize)> {
    let r = round.saturating_sub(1) as usize;
    if n < 2 {
        return Vec::new();
    }
    if n % 2 == 1 {
        let bye = r % n;
        (1..=(n - 1) / 2)
            .map(|k| ((bye + k) % n, (bye + n - k) % n))
            .collect()
    } else {
        let spin = n - 1;
        let order: Vec<usize> = std::iter::once(0)
            .chain((0..spin).map(|i| 1 + (i + r) % spin))
            .collect();
        (0..n / 2).map(|i| (order[i], order[n - 1 - i])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_pairs(n: usize, rounds: u32) -> Vec<(usize, usize)> {
        (1..=rounds)
            .flat_map(|r| group_round_pairs(n, r))
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect()
    }

    #[test]
    fn odd_group_rounds_rotate_the_bye() {
        for round in 1..=5 {
            let pairs = group_round_pairs(5, round);
            assert_eq!(pairs.len(), 2);
            let playing: HashSet<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
            assert!(!playing.contains(&((round as usize - 1) % 5)));
            assert_eq!(playing.len(), 4);
        }
    }

    #[test]
    fn odd_group_stage_is_a_full_round_robin() {
        let pairs = all_pairs(7, 7);
        let distinct: HashSet<_> = pairs.iter().copied().collect();
        assert_eq!(pairs.len(), 21);
        assert_eq!(distinct.len(), 21);
    }

    #[test]
    fn even_circle_rounds_never_repeat_a_pair() {
        let pairs = all_pairs(8, 7);
        let distinct: HashSet<_> = pairs.iter().copied().collect();
        assert_eq!(distinct.len(), 28);
        for round in 1..=7 {
            let playing: HashSet<usize> = group_round_pairs(8, round)
                .iter()
                .flat_map(|&(a, b)| [a, b])
                .collect();
            assert_eq!(playing.len(), 8);
        }
    }
}
