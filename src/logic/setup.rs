//! Setup phase: create a tournament and start it (Setup -> InProgress).

use crate::logic::generation::generate_matches;
use crate::models::{
    Participant, Tournament, TournamentError, TournamentFormat, TournamentResult, TournamentStatus,
};
use rand::Rng;
use std::collections::HashSet;

/// Create a tournament in Setup. The name is trimmed and must be unique
/// (case-insensitive) among `existing`; participants must be distinct and
/// at least as many as the format needs.
pub fn create_tournament(
    name: &str,
    format: TournamentFormat,
    participants: Vec<Participant>,
    existing: &[Tournament],
) -> TournamentResult<Tournament> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::validation("Tournament name cannot be empty"));
    }
    if existing.iter().any(|t| t.name.to_lowercase() == name.to_lowercase()) {
        return Err(TournamentError::validation(
            "A tournament with this name already exists",
        ));
    }
    let required = format.min_participants();
    if participants.len() < required {
        return Err(TournamentError::validation(format!(
            "Tournament must have at least {} participants",
            required
        )));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    if !participants.iter().all(|p| seen.insert(p.id)) {
        return Err(TournamentError::validation(
            "A participant was selected more than once",
        ));
    }
    Ok(Tournament::new(name, format, participants))
}

/// Start the tournament: generate its matches and move it to InProgress.
pub fn start_tournament<R: Rng + ?Sized>(
    tournament: &Tournament,
    rng: &mut R,
) -> TournamentResult<Tournament> {
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::validation("Tournament has already started"));
    }
    let matches = generate_matches(tournament.id, &tournament.participants, tournament.format, rng)?;
    log::info!(
        "Starting {:?} tournament '{}' with {} participants and {} matches",
        tournament.format,
        tournament.name,
        tournament.participants.len(),
        matches.len()
    );
    let mut next = tournament.clone();
    next.matches = matches;
    next.status = TournamentStatus::InProgress;
    Ok(next)
}
