//! Standing: one derived table row per participant.

use crate::models::participant::Participant;
use serde::{Deserialize, Serialize};

/// Aggregated results for one participant. Derived from completed matches, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant: Participant,
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub games_played: u32,
}

impl Standing {
    pub fn new(participant: Participant) -> Self {
        Self {
            participant,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            games_played: 0,
        }
    }

    /// Record one played match from this participant's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.games_played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.wins += 1;
                self.points += 3;
            }
            std::cmp::Ordering::Equal => {
                self.draws += 1;
                self.points += 1;
            }
            std::cmp::Ordering::Less => self.losses += 1,
        }
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }
}
