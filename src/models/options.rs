//! Creation options and the preset templates organizers start from.

use crate::models::competitor::Competitor;
use crate::models::format::{EntryTier, Format, RoundPlan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input to `TournamentEngine::create_tournament`.
///
/// `None` for a flag means "use the engine's configured default".
#[derive(Clone, Debug, Default)]
pub struct TournamentOptions {
    pub name: String,
    pub format: Format,
    pub competitors: Vec<Competitor>,
    /// None means "auto": the format's recommended round count.
    pub rounds: Option<RoundPlan>,
    pub top_cut: u32,
    pub minutes_per_round: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    /// Total minutes available; `Some` makes the event time-limited.
    pub time_limit_minutes: Option<u32>,
    pub meta_balancing: Option<bool>,
    pub adaptive_structure: Option<bool>,
    pub parallel_brackets: Option<bool>,
    pub entry_tier: EntryTier,
    pub location: Option<String>,
    pub organizer: Option<String>,
}

impl TournamentOptions {
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            name: name.into(),
            format,
            ..Self::default()
        }
    }

    pub fn with_competitors(mut self, competitors: Vec<Competitor>) -> Self {
        self.competitors = competitors;
        self
    }

    pub fn with_rounds(mut self, rounds: RoundPlan) -> Self {
        self.rounds = Some(rounds);
        self
    }

    pub fn with_top_cut(mut self, top_cut: u32) -> Self {
        self.top_cut = top_cut;
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = Some(minutes);
        self
    }

    /// Keep the requested format and rounds instead of adapting them to the field size.
    pub fn fixed_structure(mut self) -> Self {
        self.adaptive_structure = Some(false);
        self
    }
}

/// Preset event shapes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    LocalTournament,
    QuickDraft,
    ChampionshipSeries,
    CasualLeague,
    AdaptiveTournament,
    ParallelEvent,
}

impl Template {
    pub fn options(self, name: impl Into<String>) -> TournamentOptions {
        let (format, rounds, top_cut, minutes) = match self {
            Template::LocalTournament => (Format::Swiss, Some(RoundPlan::Single(4)), 8, 50),
            Template::QuickDraft => (Format::SingleElimination, Some(RoundPlan::Single(3)), 0, 40),
            Template::ChampionshipSeries => (
                Format::Hybrid,
                Some(RoundPlan::Split {
                    swiss: 6,
                    elimination: 3,
                }),
                8,
                60,
            ),
            Template::CasualLeague => (Format::RoundRobin, None, 0, 45),
            Template::AdaptiveTournament => (Format::AdaptiveSwiss, None, 4, 50),
            Template::ParallelEvent => (Format::ParallelBrackets, None, 0, 45),
        };
        TournamentOptions {
            rounds,
            top_cut,
            minutes_per_round: Some(minutes),
            ..TournamentOptions::new(name, format)
        }
    }
}
