//! Tournament business logic: setup, generation, results, standings, progression, roster.

mod generation;
mod progression;
mod results;
mod roster;
mod setup;
mod standings;

pub use generation::{generate_matches, group_round_pairs};
pub use progression::{advance, assess, champion, final_match};
pub use results::{edit_result, record_result};
pub use roster::{export_csv, import_csv, validate_name, DEFAULT_ROSTER};
pub use setup::{create_tournament, start_tournament};
pub use standings::{compute_standings, tournament_standings};
