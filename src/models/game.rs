//! Match, per-game results, and the bracket a match belongs to.

use crate::models::competitor::{CompetitorId, Outcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side won the match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    CompetitorA,
    CompetitorB,
    Draw,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// Bracket a match is filed under.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    #[default]
    Main,
    Consolation,
}

/// A single game within a match. `winner == None` is a drawn game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Option<CompetitorId>,
}

impl GameResult {
    pub fn won_by(id: CompetitorId) -> Self {
        Self { winner: Some(id) }
    }

    pub fn drawn() -> Self {
        Self { winner: None }
    }
}

/// A single match: two competitors, or one for a bye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub round: u32,
    /// 1-based table number within the round.
    pub table: u32,
    pub competitor_a: CompetitorId,
    /// None for a bye.
    pub competitor_b: Option<CompetitorId>,
    /// None if not yet played.
    pub result: Option<MatchResult>,
    pub games: Vec<GameResult>,
    pub bracket: BracketKind,
    /// Slot in a seeded bracket; None for Swiss and round-robin matches.
    pub bracket_position: Option<u32>,
    pub status: MatchStatus,
    /// Bonus credited to the eventual winner, fixed at creation.
    pub meta_bonus: f64,
}

impl Match {
    pub fn new(round: u32, table: u32, competitor_a: CompetitorId, competitor_b: Option<CompetitorId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            table,
            competitor_a,
            competitor_b,
            result: None,
            games: Vec::new(),
            bracket: BracketKind::Main,
            bracket_position: None,
            status: MatchStatus::Pending,
            meta_bonus: 0.0,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.competitor_b.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn involves(&self, id: CompetitorId) -> bool {
        self.competitor_a == id || self.competitor_b == Some(id)
    }

    /// The other side of the match, if `id` plays in it and it is not a bye.
    pub fn opponent_of(&self, id: CompetitorId) -> Option<CompetitorId> {
        if self.competitor_a == id {
            self.competitor_b
        } else if self.competitor_b == Some(id) {
            Some(self.competitor_a)
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<CompetitorId> {
        match self.result? {
            MatchResult::CompetitorA => Some(self.competitor_a),
            MatchResult::CompetitorB => self.competitor_b,
            MatchResult::Draw => None,
        }
    }

    pub fn loser(&self) -> Option<CompetitorId> {
        match self.result? {
            MatchResult::CompetitorA => self.competitor_b,
            MatchResult::CompetitorB => Some(self.competitor_a),
            MatchResult::Draw => None,
        }
    }

    /// Outcome for `id`, once the match has a result.
    pub fn outcome_for(&self, id: CompetitorId) -> Option<Outcome> {
        let result = self.result?;
        let is_a = self.competitor_a == id;
        if !is_a && self.competitor_b != Some(id) {
            return None;
        }
        Some(match (result, is_a) {
            (MatchResult::Draw, _) => Outcome::Draw,
            (MatchResult::CompetitorA, true) | (MatchResult::CompetitorB, false) => Outcome::Win,
            _ => Outcome::Loss,
        })
    }
}
