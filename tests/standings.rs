//! Integration tests for the league table.

use chrono::Utc;
use fifa_tournament_web::{
    compute_standings, record_result, start_tournament, tournament_standings, Participant,
    Tournament, TournamentFormat, TournamentStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn league(names: &[&str]) -> Tournament {
    let ps = names.iter().map(|n| Participant::new(*n)).collect();
    let t = Tournament::new("League", TournamentFormat::League, ps);
    start_tournament(&t, &mut StdRng::seed_from_u64(0)).unwrap()
}

/// Record `a score_a - score_b b` in the match between those two.
fn play(t: &Tournament, a: &str, score_a: u32, score_b: u32, b: &str) -> Tournament {
    let m = t
        .matches
        .iter()
        .find(|m| {
            let name = |s: &fifa_tournament_web::Slot| s.participant().map(|p| p.name.clone());
            name(&m.slot_a).as_deref() == Some(a) && name(&m.slot_b).as_deref() == Some(b)
        })
        .unwrap_or_else(|| panic!("no match {a} v {b}"));
    record_result(t, m.id, score_a, score_b, Utc::now()).unwrap()
}

#[test]
fn four_team_league_scenario() {
    let mut t = league(&["A", "B", "C", "D"]);
    assert_eq!(t.matches.len(), 6);

    t = play(&t, "A", 3, 1, "B");
    t = play(&t, "C", 2, 2, "D");
    t = play(&t, "A", 2, 0, "C");
    t = play(&t, "B", 1, 1, "D");
    t = play(&t, "A", 1, 0, "D");
    assert_eq!(t.status, TournamentStatus::InProgress);
    t = play(&t, "B", 2, 1, "C");

    let table = tournament_standings(&t);
    let order: Vec<&str> = table.iter().map(|s| s.participant.name.as_str()).collect();
    assert_eq!(order, ["A", "B", "D", "C"]);

    let a = &table[0];
    assert_eq!((a.points, a.wins, a.draws, a.losses), (9, 3, 0, 0));
    assert_eq!((a.goals_for, a.goals_against, a.goal_difference), (6, 1, 5));
    assert_eq!(table[1].points, 4);
    assert_eq!(table[2].points, 2);
    assert_eq!(table[3].points, 1);
    assert!(table.iter().all(|s| s.games_played == 3));

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_ref().map(|p| p.name.as_str()), Some("A"));
    assert!(t.completed_at.is_some());
}

#[test]
fn only_completed_matches_count() {
    let t = league(&["A", "B", "C"]);
    let t = play(&t, "A", 0, 0, "B");
    let table = tournament_standings(&t);
    let played: u32 = table.iter().map(|s| s.games_played).sum();
    assert_eq!(played, 2);
    assert_eq!(table.iter().map(|s| s.points).sum::<u32>(), 2);
    assert_eq!(table.iter().map(|s| s.draws).sum::<u32>(), 2);
}

#[test]
fn equal_rows_fall_back_to_name_order() {
    let ps = vec![Participant::new("zed"), Participant::new("Amy"), Participant::new("bob")];
    let table = compute_standings(&ps, std::iter::empty());
    let order: Vec<&str> = table.iter().map(|s| s.participant.name.as_str()).collect();
    assert_eq!(order, ["Amy", "bob", "zed"]);
}

#[test]
fn goal_difference_breaks_points_ties_before_goals_for() {
    let mut t = league(&["A", "B", "C", "D"]);
    // A and B both win once: A by 3, B by 1 with more goals scored.
    t = play(&t, "A", 3, 0, "C");
    t = play(&t, "B", 5, 4, "D");
    let table = tournament_standings(&t);
    assert_eq!(table[0].participant.name, "A");
    assert_eq!(table[1].participant.name, "B");
    assert_eq!(table[1].goal_difference, 1);
}
