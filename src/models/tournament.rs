//! Tournament, its format and status, and engine errors.

use crate::models::game::{GameMatch, MatchId, SlotSource};
use crate::models::participant::{Participant, ParticipantId};
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Bad input: empty or duplicate name, too few participants, already started.
    #[error("{0}")]
    Validation(String),
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Match not found")]
    MatchNotFound(MatchId),
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),
    /// The match is not in a state that allows this action.
    #[error("{0}")]
    InvalidState(String),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl TournamentError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TournamentError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        TournamentError::InvalidState(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::ParticipantNotFound(_)
        )
    }
}

pub type TournamentResult<T> = Result<T, TournamentError>;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Competition format.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Round-robin: everyone plays everyone once.
    #[default]
    League,
    /// Single elimination bracket.
    Knockout,
    /// One group with everyone, then semifinals, third place match and final.
    Champions,
}

impl TournamentFormat {
    /// Minimum participants needed to create a tournament of this format.
    pub fn min_participants(self) -> usize {
        match self {
            TournamentFormat::League | TournamentFormat::Knockout => 2,
            TournamentFormat::Champions => 4,
        }
    }
}

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created, no matches yet.
    #[default]
    Setup,
    InProgress,
    Completed,
}

/// Whether any match can still be played.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// At least one unplayed match has both participants.
    Playable,
    /// Every match played and the champion is known.
    Finished,
    /// Matches remain but none of them has two participants (e.g. a drawn knockout tie).
    Blocked,
}

/// Played vs total matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Named phase a match belongs to, for display.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// League round or champions group round.
    Round(u32),
    RoundOf16,
    QuarterFinal,
    SemiFinal,
    ThirdPlace,
    Final,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Round(n) => write!(f, "Round {}", n),
            Stage::RoundOf16 => write!(f, "Round of 16"),
            Stage::QuarterFinal => write!(f, "Quarter-final"),
            Stage::SemiFinal => write!(f, "Semi-final"),
            Stage::ThirdPlace => write!(f, "Third place"),
            Stage::Final => write!(f, "Final"),
        }
    }
}

/// Full tournament state: participant snapshot, matches, status and result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    /// Snapshot taken at creation; later roster edits do not apply.
    pub participants: Vec<Participant>,
    pub matches: Vec<GameMatch>,
    pub status: TournamentStatus,
    pub winner: Option<Participant>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no matches.
    pub fn new(name: impl Into<String>, format: TournamentFormat, participants: Vec<Participant>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            participants,
            matches: Vec::new(),
            status: TournamentStatus::Setup,
            winner: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Number of group stage rounds for the champions format (3 for even, N for odd counts).
    pub fn group_stage_rounds(&self) -> Option<u32> {
        match self.format {
            TournamentFormat::Champions => Some(group_stage_rounds(self.participants.len())),
            _ => None,
        }
    }

    pub fn find_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    pub fn has_match(&self, id: MatchId) -> bool {
        self.find_match(id).is_some()
    }

    /// Matches of one round, in sequence order.
    pub fn round(&self, round: u32) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.round_number() == round)
    }

    pub fn last_round(&self) -> u32 {
        self.matches.iter().map(GameMatch::round_number).max().unwrap_or(0)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.matches.iter().filter(|m| m.completed).count(),
            total: self.matches.len(),
        }
    }

    /// Display stage of a match of this tournament.
    pub fn stage_of(&self, m: &GameMatch) -> Stage {
        let round = m.round_number();
        match self.format {
            TournamentFormat::League => Stage::Round(round),
            TournamentFormat::Knockout => match self.last_round().saturating_sub(round) {
                0 => Stage::Final,
                1 => Stage::SemiFinal,
                2 => Stage::QuarterFinal,
                3 => Stage::RoundOf16,
                _ => Stage::Round(round),
            },
            TournamentFormat::Champions => {
                let g = group_stage_rounds(self.participants.len());
                if round <= g {
                    Stage::Round(round)
                } else if round == g + 1 {
                    Stage::SemiFinal
                } else if matches!(m.source_a, Some(SlotSource::LoserOf(_))) {
                    Stage::ThirdPlace
                } else {
                    Stage::Final
                }
            }
        }
    }
}

/// Group stage length for `n` champions participants.
pub fn group_stage_rounds(n: usize) -> u32 {
    if n % 2 == 1 {
        n as u32
    } else {
        3
    }
}
