//! Integration tests for match generation in the three formats.

use fifa_tournament_web::{
    generate_matches, start_tournament, GameMatch, Participant, Slot, SlotSource, Tournament,
    TournamentError, TournamentFormat, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

fn participants(n: usize) -> Vec<Participant> {
    (0..n).map(|i| Participant::new(format!("P{i}"))).collect()
}

fn generate(n: usize, format: TournamentFormat, seed: u64) -> (Vec<Participant>, Vec<GameMatch>) {
    let ps = participants(n);
    let mut rng = StdRng::seed_from_u64(seed);
    let matches = generate_matches(Uuid::new_v4(), &ps, format, &mut rng).unwrap();
    (ps, matches)
}

fn names(m: &GameMatch) -> (String, String) {
    let name = |s: &Slot| s.participant().map(|p| p.name.clone()).unwrap_or_default();
    (name(&m.slot_a), name(&m.slot_b))
}

fn group_games(matches: &[GameMatch], max_round: u32) -> HashMap<Uuid, usize> {
    let mut games = HashMap::new();
    for m in matches.iter().filter(|m| m.round_number() <= max_round) {
        for slot in [&m.slot_a, &m.slot_b] {
            *games.entry(slot.participant().unwrap().id).or_insert(0) += 1;
        }
    }
    games
}

#[test]
fn generation_requires_two_participants() {
    let ps = participants(1);
    let mut rng = StdRng::seed_from_u64(1);
    for format in [TournamentFormat::League, TournamentFormat::Knockout] {
        assert!(matches!(
            generate_matches(Uuid::new_v4(), &ps, format, &mut rng),
            Err(TournamentError::Validation(_))
        ));
    }
}

#[test]
fn champions_requires_four_participants() {
    let ps = participants(3);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        generate_matches(Uuid::new_v4(), &ps, TournamentFormat::Champions, &mut rng),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn league_pairs_in_input_order() {
    let (_, matches) = generate(4, TournamentFormat::League, 3);
    let pairs: Vec<(String, String)> = matches.iter().map(names).collect();
    let expected = [("P0", "P1"), ("P0", "P2"), ("P0", "P3"), ("P1", "P2"), ("P1", "P3"), ("P2", "P3")];
    assert_eq!(pairs.len(), expected.len());
    for (got, want) in pairs.iter().zip(expected) {
        assert_eq!((got.0.as_str(), got.1.as_str()), want);
    }
    for (i, m) in matches.iter().enumerate() {
        assert_eq!(m.round, Some(1));
        assert_eq!(m.match_number, Some(i as u32 + 1));
        assert!(!m.completed);
    }
}

#[test]
fn knockout_eight_has_three_rounds_of_placeholders() {
    let (_, matches) = generate(8, TournamentFormat::Knockout, 11);
    assert_eq!(matches.len(), 7);
    let round = |r: u32| matches.iter().filter(move |m| m.round == Some(r)).collect::<Vec<_>>();
    assert_eq!(round(1).len(), 4);
    assert!(round(1).iter().all(|m| m.both_resolved()));
    assert_eq!(round(2).len(), 2);
    assert_eq!(round(3).len(), 1);

    // Slot k of round r + 1 is fed by matches 2k and 2k + 1 of round r.
    let first = round(1);
    let second = round(2);
    assert_eq!(second[0].source_a, Some(SlotSource::WinnerOf(first[0].id)));
    assert_eq!(second[0].source_b, Some(SlotSource::WinnerOf(first[1].id)));
    assert_eq!(second[1].source_a, Some(SlotSource::WinnerOf(first[2].id)));
    assert_eq!(second[1].slot_b, Slot::PendingMatchWinner(first[3].id));
    assert_eq!(round(3)[0].source_b, Some(SlotSource::WinnerOf(second[1].id)));
}

#[test]
fn knockout_odd_participant_gets_a_bye() {
    let (ps, matches) = generate(3, TournamentFormat::Knockout, 5);
    assert_eq!(matches.len(), 2);
    let first = &matches[0];
    let final_match = &matches[1];
    assert_eq!(first.round, Some(1));
    assert!(first.both_resolved());
    assert_eq!(final_match.round, Some(2));
    assert_eq!(final_match.slot_a, Slot::PendingMatchWinner(first.id));

    let bye = final_match.slot_b.participant().expect("bye participant advances");
    assert!(!first.involves(bye.id));
    assert!(ps.iter().any(|p| p.id == bye.id));
    assert_eq!(final_match.source_b, None);
}

#[test]
fn knockout_never_drops_anyone() {
    for n in [5, 6, 7, 9, 12] {
        let (ps, matches) = generate(n, TournamentFormat::Knockout, n as u64);
        assert_eq!(matches.len(), n - 1, "n = {n}");
        let seen: HashSet<Uuid> = matches
            .iter()
            .flat_map(|m| [&m.slot_a, &m.slot_b])
            .filter_map(Slot::participant)
            .map(|p| p.id)
            .collect();
        assert_eq!(seen.len(), ps.len(), "n = {n}");
    }
}

#[test]
fn knockout_shuffle_is_reproducible() {
    let ps = participants(8);
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_matches(Uuid::nil(), &ps, TournamentFormat::Knockout, &mut rng)
            .unwrap()
            .iter()
            .filter(|m| m.round == Some(1))
            .map(names)
            .collect::<Vec<_>>()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn champions_even_group_is_three_rounds_without_repeats() {
    let (ps, matches) = generate(6, TournamentFormat::Champions, 21);
    assert_eq!(matches.len(), 9 + 4);
    for r in 1..=3 {
        assert_eq!(matches.iter().filter(|m| m.round == Some(r)).count(), 3);
    }
    let pairs: HashSet<(String, String)> = matches
        .iter()
        .filter(|m| m.round_number() <= 3)
        .map(|m| {
            let (a, b) = names(m);
            if a < b { (a, b) } else { (b, a) }
        })
        .collect();
    assert_eq!(pairs.len(), 9);

    let games = group_games(&matches, 3);
    assert!(ps.iter().all(|p| games[&p.id] == 3));
}

#[test]
fn champions_knockout_placeholders_follow_group_length() {
    let (_, matches) = generate(4, TournamentFormat::Champions, 2);
    let knockout: Vec<&GameMatch> = matches.iter().filter(|m| m.round_number() > 3).collect();
    assert_eq!(knockout.len(), 4);
    let (semi_1, semi_2, third, final_match) = (knockout[0], knockout[1], knockout[2], knockout[3]);

    assert_eq!(semi_1.round, Some(4));
    assert_eq!((semi_1.slot_a.clone(), semi_1.slot_b.clone()), (Slot::PendingRank(1), Slot::PendingRank(4)));
    assert_eq!((semi_2.slot_a.clone(), semi_2.slot_b.clone()), (Slot::PendingRank(2), Slot::PendingRank(3)));
    assert_eq!(third.round, Some(5));
    assert_eq!(third.source_a, Some(SlotSource::LoserOf(semi_1.id)));
    assert_eq!(third.source_b, Some(SlotSource::LoserOf(semi_2.id)));
    assert_eq!(final_match.round, Some(5));
    assert_eq!(final_match.slot_a, Slot::PendingMatchWinner(semi_1.id));
    assert_eq!(final_match.slot_b, Slot::PendingMatchWinner(semi_2.id));
}

#[test]
fn champions_odd_group_gives_everyone_one_bye() {
    let (ps, matches) = generate(5, TournamentFormat::Champions, 8);
    for r in 1..=5 {
        assert_eq!(matches.iter().filter(|m| m.round == Some(r)).count(), 2);
    }
    let games = group_games(&matches, 5);
    assert!(ps.iter().all(|p| games[&p.id] == 4));
    // Knockout after the 5 group rounds: semis in 6, final and third place in 7.
    assert_eq!(matches.iter().filter(|m| m.round == Some(6)).count(), 2);
    assert_eq!(matches.iter().filter(|m| m.round == Some(7)).count(), 2);
}

#[test]
fn start_moves_to_in_progress_once() {
    let t = Tournament::new("Cup", TournamentFormat::League, participants(3));
    let mut rng = StdRng::seed_from_u64(0);
    let started = start_tournament(&t, &mut rng).unwrap();
    assert_eq!(started.status, TournamentStatus::InProgress);
    assert_eq!(started.matches.len(), 3);
    assert!(started.matches.iter().all(|m| m.tournament_id == t.id));
    // Snapshot passed in is untouched.
    assert_eq!(t.status, TournamentStatus::Setup);
    assert!(t.matches.is_empty());

    assert!(matches!(
        start_tournament(&started, &mut rng),
        Err(TournamentError::Validation(_))
    ));
}
