//! Tournament, TournamentStatus and TournamentError.

use crate::models::bracket::Brackets;
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::format::{EntryTier, Format, RoundPlan};
use crate::models::game::{Match, MatchId};
use crate::models::meta::MetaBreakdownEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TournamentError {
    #[error("Invalid tournament format: {0}")]
    InvalidFormat(String),
    #[error("Tournament has not been started")]
    TournamentNotStarted,
    /// The operation is not valid for the tournament's current status.
    #[error("Cannot {action} a tournament that is {status}")]
    InvalidState {
        status: TournamentStatus,
        action: &'static str,
    },
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error("Competitor {0} not found")]
    CompetitorNotFound(CompetitorId),
    #[error("Round {round} exceeds maximum rounds ({max})")]
    InvalidRound { round: u32, max: u32 },
    /// Names are unique, case-insensitive.
    #[error("A competitor with this name already exists")]
    DuplicateCompetitorName,
    #[error("Competitor name must not be empty")]
    EmptyCompetitorName,
    #[error("Competitor {competitor} does not meet the {tier} entry requirement")]
    EntryRequirementNotMet { competitor: String, tier: EntryTier },
    #[error("Invalid result: {0}")]
    InvalidResult(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle status: `Created -> InProgress -> Completed`, never reversed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Created,
    InProgress,
    Completed,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TournamentStatus::Created => "created",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeConstraints {
    pub estimated_end_time: DateTime<Utc>,
    /// Seconds per round.
    pub round_time_remaining: u32,
    pub is_time_limited: bool,
    /// Total minutes available when time-limited.
    pub time_limit_minutes: Option<u32>,
}

/// What the organizer asked for, before structure adaptation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestedStructure {
    pub format: Format,
    /// None means "auto".
    pub rounds: Option<RoundPlan>,
    pub top_cut: u32,
}

/// Full tournament state. Exclusively owns its competitors, matches and brackets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    pub rounds: RoundPlan,
    /// 0 until started.
    pub current_round: u32,
    pub top_cut: u32,
    pub status: TournamentStatus,
    pub entry_tier: EntryTier,
    /// Arena of competitors; matches and brackets refer to them by id.
    pub competitors: Vec<Competitor>,
    /// Every match of every round, in creation order.
    pub matches: Vec<Match>,
    pub brackets: Brackets,
    pub minutes_per_round: u32,
    pub start_time: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_constraints: TimeConstraints,
    pub meta_balancing_enabled: bool,
    pub adaptive_structure_enabled: bool,
    pub parallel_brackets_enabled: bool,
    pub meta_breakdown: Vec<MetaBreakdownEntry>,
    pub requested: RequestedStructure,
    /// Roster size the current structure was computed for.
    pub structured_for: usize,
    pub location: Option<String>,
    pub organizer: Option<String>,
}

impl Tournament {
    /// Look up a competitor by id.
    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Mutable reference to a competitor by id.
    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Non-dropped competitors, in registration order.
    pub fn active_competitors(&self) -> Vec<&Competitor> {
        self.competitors.iter().filter(|c| !c.dropped).collect()
    }

    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// True when the round has matches and every one of them is completed.
    pub fn is_round_complete(&self, round: u32) -> bool {
        let mut any = false;
        for m in self.round_matches(round) {
            if !m.is_completed() {
                return false;
            }
            any = true;
        }
        any
    }

    /// Hybrid: swiss + elimination rounds; otherwise the single round count.
    pub fn is_last_round(&self) -> bool {
        self.current_round >= self.rounds.total()
    }

    /// Add a competitor (valid only while `Created`). Names must be unique (case-insensitive).
    pub fn add_competitor(&mut self, mut competitor: Competitor) -> Result<CompetitorId, TournamentError> {
        if self.status != TournamentStatus::Created {
            return Err(TournamentError::InvalidState {
                status: self.status,
                action: "register competitors for",
            });
        }
        let name = competitor.name.trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::EmptyCompetitorName);
        }
        let is_duplicate = self
            .competitors
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&name));
        if is_duplicate {
            return Err(TournamentError::DuplicateCompetitorName);
        }
        if !self.entry_tier.admits(competitor.rating, competitor.invited) {
            return Err(TournamentError::EntryRequirementNotMet {
                competitor: name,
                tier: self.entry_tier,
            });
        }
        competitor.name = name;
        competitor.reset_record();
        let id = competitor.id;
        self.competitors.push(competitor);
        Ok(id)
    }

    /// Remove a competitor by id (only valid while `Created`).
    pub fn remove_competitor(&mut self, id: CompetitorId) -> Result<Competitor, TournamentError> {
        if self.status != TournamentStatus::Created {
            return Err(TournamentError::InvalidState {
                status: self.status,
                action: "remove competitors from",
            });
        }
        let idx = self
            .competitors
            .iter()
            .position(|c| c.id == id)
            .ok_or(TournamentError::CompetitorNotFound(id))?;
        Ok(self.competitors.remove(idx))
    }
}
