//! Persistence: the repository the manager is built on, and its snapshot format.
//!
//! Everything lives in one snapshot (roster, tournaments, active pointer, last
//! update time). Backends only read and write whole snapshots; the provided
//! trait methods do read-modify-write on top. Last write wins.

mod file;
mod memory;

pub use file::{JsonFileRepository, DEFAULT_NAMESPACE};
pub use memory::MemoryRepository;

use crate::models::{Participant, ParticipantId, Tournament, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The whole persisted state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub roster: Vec<Participant>,
    #[serde(default)]
    pub tournaments: Vec<Tournament>,
    /// Id of the active tournament, if any.
    #[serde(default)]
    pub active_tournament: Option<TournamentId>,
    #[serde(default)]
    pub last_updated: DateTime<Utc>,
}

impl Snapshot {
    pub fn upsert_participant(&mut self, participant: &Participant) {
        match self.roster.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant.clone(),
            None => self.roster.push(participant.clone()),
        }
    }

    pub fn upsert_tournament(&mut self, tournament: &Tournament) {
        match self.tournaments.iter_mut().find(|t| t.id == tournament.id) {
            Some(existing) => *existing = tournament.clone(),
            None => self.tournaments.push(tournament.clone()),
        }
    }

    /// Remove a tournament, clearing the active pointer if it referenced it.
    pub fn remove_tournament(&mut self, id: TournamentId) {
        self.tournaments.retain(|t| t.id != id);
        if self.active_tournament == Some(id) {
            self.active_tournament = None;
        }
    }

    pub fn active(&self) -> Option<&Tournament> {
        let id = self.active_tournament?;
        self.tournaments.iter().find(|t| t.id == id)
    }
}

/// Durable storage for the roster, tournaments and the active tournament pointer.
pub trait TournamentRepository {
    /// Read the current snapshot (an empty one if nothing was stored yet).
    fn read_snapshot(&self) -> StoreResult<Snapshot>;

    /// Replace the stored snapshot.
    fn write_snapshot(&mut self, snapshot: &Snapshot) -> StoreResult<()>;

    fn load_roster(&self) -> StoreResult<Vec<Participant>> {
        Ok(self.read_snapshot()?.roster)
    }

    fn save_participant(&mut self, participant: &Participant) -> StoreResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.upsert_participant(participant);
        self.write_snapshot(&snapshot)
    }

    fn delete_participant(&mut self, id: ParticipantId) -> StoreResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.roster.retain(|p| p.id != id);
        self.write_snapshot(&snapshot)
    }

    fn load_tournaments(&self) -> StoreResult<Vec<Tournament>> {
        Ok(self.read_snapshot()?.tournaments)
    }

    fn save_tournament(&mut self, tournament: &Tournament) -> StoreResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.upsert_tournament(tournament);
        self.write_snapshot(&snapshot)
    }

    fn delete_tournament(&mut self, id: TournamentId) -> StoreResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.remove_tournament(id);
        self.write_snapshot(&snapshot)
    }

    fn active_tournament(&self) -> StoreResult<Option<Tournament>> {
        Ok(self.read_snapshot()?.active().cloned())
    }

    fn set_active_tournament(&mut self, id: Option<TournamentId>) -> StoreResult<()> {
        let mut snapshot = self.read_snapshot()?;
        snapshot.active_tournament = id;
        self.write_snapshot(&snapshot)
    }

    /// Pretty-printed JSON of the whole snapshot, for backups.
    fn export_data(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.read_snapshot()?)?)
    }

    /// Replace everything with a previously exported snapshot.
    fn import_data(&mut self, json: &str) -> StoreResult<()> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        self.write_snapshot(&snapshot)
    }
}
