//! Tournament manager: library with models, business logic, storage and the manager API.

pub mod config;
pub mod logic;
pub mod manager;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    advance, assess, champion, compute_standings, create_tournament, edit_result, final_match,
    generate_matches, record_result, start_tournament, tournament_standings,
};
pub use manager::TournamentManager;
pub use models::{
    group_stage_rounds, Completion, GameMatch, MatchId, Participant, ParticipantId, Progress, Side, Slot, SlotSource,
    Stage, Standing, Tournament, TournamentError, TournamentFormat, TournamentId, TournamentResult,
    TournamentStatus,
};
pub use store::{JsonFileRepository, MemoryRepository, Snapshot, StoreError, TournamentRepository};
