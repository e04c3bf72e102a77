//! Data structures for the tournament manager: participants, matches, tournament state, standings.

mod game;
mod participant;
mod standing;
mod tournament;

pub use game::{GameMatch, MatchId, Side, Slot, SlotSource};
pub use participant::{Participant, ParticipantId};
pub use standing::Standing;
pub use tournament::{
    group_stage_rounds, Completion, Progress, Stage, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentResult, TournamentStatus,
};
