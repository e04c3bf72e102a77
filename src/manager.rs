//! Engine-facing API: roster and tournament operations over an injected repository.
//!
//! Every operation returns a `Result`; the manager also keeps the message of the
//! most recent error in a single slot until it is dismissed or an operation succeeds.

use crate::logic;
use crate::models::{
    MatchId, Participant, ParticipantId, Standing, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentResult,
};
use crate::store::TournamentRepository;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Read;

pub struct TournamentManager<S, R = StdRng> {
    store: S,
    rng: R,
    last_error: Option<String>,
}

impl<S: TournamentRepository> TournamentManager<S, StdRng> {
    /// Manager with an entropy-seeded random source.
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Manager whose schedules are reproducible for a given seed.
    pub fn seeded(store: S, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }
}

impl<S: TournamentRepository, R: Rng> TournamentManager<S, R> {
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            store,
            rng,
            last_error: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Message of the last failed operation, if not yet dismissed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn tracked<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> TournamentResult<T>,
    ) -> TournamentResult<T> {
        let result = op(self);
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                log::warn!("{}", e);
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    // Roster

    pub fn roster(&mut self) -> TournamentResult<Vec<Participant>> {
        self.tracked(|m| Ok(m.store.load_roster()?))
    }

    pub fn add_participant(&mut self, name: &str) -> TournamentResult<Participant> {
        self.tracked(|m| {
            let roster = m.store.load_roster()?;
            let name = logic::validate_name(name, &roster, None)?;
            let participant = Participant::new(name);
            m.store.save_participant(&participant)?;
            Ok(participant)
        })
    }

    /// Rename a roster entry. Tournaments keep the name they were created with.
    pub fn rename_participant(&mut self, id: ParticipantId, name: &str) -> TournamentResult<Participant> {
        self.tracked(|m| {
            let roster = m.store.load_roster()?;
            let mut participant = find_participant(&roster, id)?;
            participant.name = logic::validate_name(name, &roster, Some(id))?;
            m.store.save_participant(&participant)?;
            Ok(participant)
        })
    }

    pub fn set_avatar(&mut self, id: ParticipantId, avatar: Option<String>) -> TournamentResult<Participant> {
        self.tracked(|m| {
            let roster = m.store.load_roster()?;
            let mut participant = find_participant(&roster, id)?;
            participant.avatar = avatar.filter(|a| !a.trim().is_empty());
            m.store.save_participant(&participant)?;
            Ok(participant)
        })
    }

    pub fn delete_participant(&mut self, id: ParticipantId) -> TournamentResult<()> {
        self.tracked(|m| {
            find_participant(&m.store.load_roster()?, id)?;
            Ok(m.store.delete_participant(id)?)
        })
    }

    /// Fill an empty roster with the default names; does nothing otherwise.
    pub fn initialize_default_roster(&mut self) -> TournamentResult<Vec<Participant>> {
        self.tracked(|m| {
            let mut snapshot = m.store.read_snapshot()?;
            if !snapshot.roster.is_empty() {
                return Ok(Vec::new());
            }
            let added: Vec<Participant> = logic::DEFAULT_ROSTER.iter().map(|n| Participant::new(*n)).collect();
            snapshot.roster = added.clone();
            m.store.write_snapshot(&snapshot)?;
            log::info!("Loaded {} default participants", added.len());
            Ok(added)
        })
    }

    /// Add every new name from a `name,avatar` CSV; returns the added participants.
    pub fn import_roster_csv(&mut self, reader: impl Read) -> TournamentResult<Vec<Participant>> {
        self.tracked(|m| {
            let mut snapshot = m.store.read_snapshot()?;
            let added = logic::import_csv(reader, &snapshot.roster)?;
            snapshot.roster.extend(added.iter().cloned());
            m.store.write_snapshot(&snapshot)?;
            log::info!("Imported {} participants", added.len());
            Ok(added)
        })
    }

    pub fn export_roster_csv(&mut self) -> TournamentResult<String> {
        self.tracked(|m| {
            let mut out = Vec::new();
            logic::export_csv(&mut out, &m.store.load_roster()?)?;
            Ok(String::from_utf8_lossy(&out).into_owned())
        })
    }

    // Tournaments

    pub fn tournaments(&mut self) -> TournamentResult<Vec<Tournament>> {
        self.tracked(|m| Ok(m.store.load_tournaments()?))
    }

    pub fn tournament(&mut self, id: TournamentId) -> TournamentResult<Tournament> {
        self.tracked(|m| find_tournament(&m.store.load_tournaments()?, id))
    }

    /// Create a tournament from roster participants and make it the active one.
    pub fn create_tournament(
        &mut self,
        name: &str,
        format: TournamentFormat,
        participant_ids: &[ParticipantId],
    ) -> TournamentResult<Tournament> {
        self.tracked(|m| {
            let mut snapshot = m.store.read_snapshot()?;
            let participants = participant_ids
                .iter()
                .map(|&id| find_participant(&snapshot.roster, id))
                .collect::<TournamentResult<Vec<_>>>()?;
            let tournament = logic::create_tournament(name, format, participants, &snapshot.tournaments)?;
            snapshot.upsert_tournament(&tournament);
            snapshot.active_tournament = Some(tournament.id);
            m.store.write_snapshot(&snapshot)?;
            log::info!("Created tournament '{}' ({:?})", tournament.name, tournament.format);
            Ok(tournament)
        })
    }

    /// Delete a tournament; clears the active pointer if it pointed at it.
    pub fn delete_tournament(&mut self, id: TournamentId) -> TournamentResult<()> {
        self.tracked(|m| {
            find_tournament(&m.store.load_tournaments()?, id)?;
            Ok(m.store.delete_tournament(id)?)
        })
    }

    /// Generate the matches and move the tournament to in progress.
    pub fn start_tournament(&mut self, id: TournamentId) -> TournamentResult<Tournament> {
        self.tracked(|m| {
            let tournament = find_tournament(&m.store.load_tournaments()?, id)?;
            let started = logic::start_tournament(&tournament, &mut m.rng)?;
            m.store.save_tournament(&started)?;
            Ok(started)
        })
    }

    /// Enter the first result of a match in any stored tournament.
    pub fn record_result(&mut self, match_id: MatchId, score_a: u32, score_b: u32) -> TournamentResult<Tournament> {
        self.tracked(|m| {
            let tournament = m.owner_of(match_id)?;
            let updated = logic::record_result(&tournament, match_id, score_a, score_b, Utc::now())?;
            m.store.save_tournament(&updated)?;
            Ok(updated)
        })
    }

    /// Correct the result of an already played match.
    pub fn edit_result(&mut self, match_id: MatchId, score_a: u32, score_b: u32) -> TournamentResult<Tournament> {
        self.tracked(|m| {
            let tournament = m.owner_of(match_id)?;
            let updated = logic::edit_result(&tournament, match_id, score_a, score_b, Utc::now())?;
            m.store.save_tournament(&updated)?;
            Ok(updated)
        })
    }

    pub fn standings(&mut self, id: TournamentId) -> TournamentResult<Vec<Standing>> {
        self.tracked(|m| {
            let tournament = find_tournament(&m.store.load_tournaments()?, id)?;
            Ok(logic::tournament_standings(&tournament))
        })
    }

    pub fn active_tournament(&mut self) -> TournamentResult<Option<Tournament>> {
        self.tracked(|m| Ok(m.store.active_tournament()?))
    }

    pub fn set_active_tournament(&mut self, id: Option<TournamentId>) -> TournamentResult<()> {
        self.tracked(|m| {
            if let Some(id) = id {
                find_tournament(&m.store.load_tournaments()?, id)?;
            }
            Ok(m.store.set_active_tournament(id)?)
        })
    }

    // Backup

    pub fn export_data(&mut self) -> TournamentResult<String> {
        self.tracked(|m| Ok(m.store.export_data()?))
    }

    pub fn import_data(&mut self, json: &str) -> TournamentResult<()> {
        self.tracked(|m| Ok(m.store.import_data(json)?))
    }

    /// The tournament holding `match_id`, preferring the active one.
    fn owner_of(&self, match_id: MatchId) -> TournamentResult<Tournament> {
        let snapshot = self.store.read_snapshot()?;
        if let Some(active) = snapshot.active().filter(|t| t.has_match(match_id)) {
            return Ok(active.clone());
        }
        snapshot
            .tournaments
            .into_iter()
            .find(|t| t.has_match(match_id))
            .ok_or(TournamentError::MatchNotFound(match_id))
    }
}

fn find_participant(roster: &[Participant], id: ParticipantId) -> TournamentResult<Participant> {
    roster
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or(TournamentError::ParticipantNotFound(id))
}

fn find_tournament(tournaments: &[Tournament], id: TournamentId) -> TournamentResult<Tournament> {
    tournaments
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or(TournamentError::TournamentNotFound(id))
}
