//! Competitor, its running record, and match-history entries.

use crate::models::game::MatchId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a competitor (used in matches and lookups).
pub type CompetitorId = Uuid;

/// Rating assumed for competitors who did not declare one.
pub const DEFAULT_RATING: f64 = 1500.0;

/// Outcome of one match from a single competitor's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// One entry in a competitor's match history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub match_id: MatchId,
    pub round: u32,
    /// None for a bye.
    pub opponent: Option<CompetitorId>,
    pub outcome: Outcome,
    pub is_bye: bool,
}

/// How a competitor tends to play; used only by adaptive pairing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playstyle {
    /// 0.0 (passive) to 1.0 (all-in aggression).
    pub aggression: f64,
}

/// A competitor in the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    pub rating: Option<f64>,
    /// Declared deck archetype, if any.
    pub archetype: Option<String>,
    pub playstyle: Option<Playstyle>,
    /// Holds an invitation (only checked by invitational events).
    #[serde(default)]
    pub invited: bool,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Always `wins * 3 + draws`.
    pub match_points: u32,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
    /// Accumulated meta bonus from won matches.
    pub meta_bonus: f64,
    pub history: Vec<HistoryEntry>,
    pub dropped: bool,
    /// 1-based rank, recomputed after every completed round.
    pub standing: Option<u32>,
}

impl Competitor {
    /// Create a new competitor with the given name. Tallies start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating: None,
            archetype: None,
            playstyle: None,
            invited: false,
            wins: 0,
            losses: 0,
            draws: 0,
            match_points: 0,
            opponent_match_win_pct: 0.0,
            game_win_pct: 0.0,
            meta_bonus: 0.0,
            history: Vec::new(),
            dropped: false,
            standing: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_archetype(mut self, archetype: impl Into<String>) -> Self {
        self.archetype = Some(archetype.into());
        self
    }

    pub fn with_playstyle(mut self, aggression: f64) -> Self {
        self.playstyle = Some(Playstyle {
            aggression: aggression.clamp(0.0, 1.0),
        });
        self
    }

    pub fn invited(mut self) -> Self {
        self.invited = true;
        self
    }

    /// Rating used for comparisons when none was declared.
    pub fn effective_rating(&self) -> f64 {
        self.rating.unwrap_or(DEFAULT_RATING)
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// `W-L-D` string, also used as the adaptive-Swiss bucket key.
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.draws)
    }

    pub fn has_had_bye(&self) -> bool {
        self.history.iter().any(|h| h.is_bye)
    }

    /// True if this competitor has a (non-bye) history entry against `other`.
    pub fn has_played(&self, other: CompetitorId) -> bool {
        self.history.iter().any(|h| h.opponent == Some(other))
    }

    /// Reset running tallies; only used before a tournament starts.
    pub(crate) fn reset_record(&mut self) {
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.match_points = 0;
        self.opponent_match_win_pct = 0.0;
        self.game_win_pct = 0.0;
        self.meta_bonus = 0.0;
        self.history.clear();
        self.dropped = false;
        self.standing = None;
    }
}
