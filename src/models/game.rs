//! Match (game), its two slots, and the bracket linkage behind placeholder slots.

use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Where a placeholder slot gets its participant from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum SlotSource {
    /// N-th place (1-based) of the group stage standings.
    Rank(u32),
    WinnerOf(MatchId),
    LoserOf(MatchId),
}

/// One side of a match: a real participant or an unresolved reference.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Slot {
    Resolved(Participant),
    PendingRank(u32),
    PendingMatchWinner(MatchId),
    PendingMatchLoser(MatchId),
}

impl Slot {
    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Slot::Resolved(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }

    fn participant_id(&self) -> Option<ParticipantId> {
        self.participant().map(|p| p.id)
    }
}

impl From<SlotSource> for Slot {
    fn from(source: SlotSource) -> Self {
        match source {
            SlotSource::Rank(n) => Slot::PendingRank(n),
            SlotSource::WinnerOf(id) => Slot::PendingMatchWinner(id),
            SlotSource::LoserOf(id) => Slot::PendingMatchLoser(id),
        }
    }
}

impl From<Participant> for Slot {
    fn from(p: Participant) -> Self {
        Slot::Resolved(p)
    }
}

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// A single match between two slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: Uuid,
    pub slot_a: Slot,
    pub slot_b: Slot,
    /// Linkage for slot A when it was generated as a placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_a: Option<SlotSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_b: Option<SlotSource>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    /// None if not yet played or drawn.
    pub winner: Option<ParticipantId>,
    pub completed: bool,
    pub round: Option<u32>,
    /// Sequence number within the tournament (1-based).
    pub match_number: Option<u32>,
    pub played_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    /// A match between two known slots (participants or a bye carried forward).
    pub fn new(tournament_id: Uuid, slot_a: Slot, slot_b: Slot, round: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            slot_a,
            slot_b,
            source_a: None,
            source_b: None,
            score_a: None,
            score_b: None,
            winner: None,
            completed: false,
            round: Some(round),
            match_number: None,
            played_at: None,
        }
    }

    /// A bracket match whose both slots wait on other results.
    pub fn pending(tournament_id: Uuid, source_a: SlotSource, source_b: SlotSource, round: u32) -> Self {
        Self::new(tournament_id, source_a.into(), source_b.into(), round)
            .fed_a(source_a)
            .fed_b(source_b)
    }

    /// Attach the source of slot A and reset the slot to its pending form.
    pub fn fed_a(mut self, source: SlotSource) -> Self {
        self.slot_a = source.into();
        self.source_a = Some(source);
        self
    }

    pub fn fed_b(mut self, source: SlotSource) -> Self {
        self.slot_b = source.into();
        self.source_b = Some(source);
        self
    }

    /// Round number; matches without one count as round 1.
    pub fn round_number(&self) -> u32 {
        self.round.unwrap_or(1)
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::A => &self.slot_a,
            Side::B => &self.slot_b,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::A => &mut self.slot_a,
            Side::B => &mut self.slot_b,
        }
    }

    pub fn source(&self, side: Side) -> Option<SlotSource> {
        match side {
            Side::A => self.source_a,
            Side::B => self.source_b,
        }
    }

    pub fn both_resolved(&self) -> bool {
        self.slot_a.is_resolved() && self.slot_b.is_resolved()
    }

    /// Not yet played and both participants known.
    pub fn is_playable(&self) -> bool {
        !self.completed && self.both_resolved()
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.slot_a.participant_id() == Some(id) || self.slot_b.participant_id() == Some(id)
    }

    pub fn is_draw(&self) -> bool {
        self.completed && self.winner.is_none()
    }

    pub fn winner_participant(&self) -> Option<&Participant> {
        let winner = self.winner?;
        [&self.slot_a, &self.slot_b]
            .into_iter()
            .filter_map(Slot::participant)
            .find(|p| p.id == winner)
    }

    /// The slot not equal to the winner; None while unplayed or drawn.
    pub fn loser_participant(&self) -> Option<&Participant> {
        let winner = self.winner?;
        [&self.slot_a, &self.slot_b]
            .into_iter()
            .filter_map(Slot::participant)
            .find(|p| p.id != winner)
    }

    /// Set scores and derive the winner (higher score; equal scores draw).
    /// Callers check that both slots are resolved.
    pub(crate) fn apply_score(&mut self, score_a: u32, score_b: u32, now: DateTime<Utc>) {
        self.score_a = Some(score_a);
        self.score_b = Some(score_b);
        self.winner = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => self.slot_a.participant_id(),
            std::cmp::Ordering::Less => self.slot_b.participant_id(),
            std::cmp::Ordering::Equal => None,
        };
        self.completed = true;
        self.played_at = Some(now);
    }
}
