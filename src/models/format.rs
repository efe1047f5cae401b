//! Competitive formats, round plans and entry tiers.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competitive format; each has exactly one pairing strategy.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Format {
    #[default]
    Swiss,
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    /// Swiss rounds followed by a single-elimination top cut.
    Hybrid,
    AdaptiveSwiss,
    ParallelBrackets,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Swiss,
        Format::SingleElimination,
        Format::DoubleElimination,
        Format::RoundRobin,
        Format::Hybrid,
        Format::AdaptiveSwiss,
        Format::ParallelBrackets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Swiss => "swiss",
            Format::SingleElimination => "single_elimination",
            Format::DoubleElimination => "double_elimination",
            Format::RoundRobin => "round_robin",
            Format::Hybrid => "hybrid",
            Format::AdaptiveSwiss => "adaptive_swiss",
            Format::ParallelBrackets => "parallel_brackets",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `single_elimination`, `single-elimination` and `singleElimination` alike.
impl FromStr for Format {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        Format::ALL
            .into_iter()
            .find(|f| f.as_str().replace('_', "") == normalized)
            .ok_or_else(|| TournamentError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<String> for Format {
    type Error = TournamentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Number of rounds: a single count, or a Swiss/elimination split for hybrid events.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoundPlan {
    Single(u32),
    Split { swiss: u32, elimination: u32 },
}

impl RoundPlan {
    pub fn total(&self) -> u32 {
        match *self {
            RoundPlan::Single(n) => n,
            RoundPlan::Split { swiss, elimination } => swiss + elimination,
        }
    }

    /// Swiss rounds before the top cut; every round for a single plan.
    pub fn swiss_rounds(&self) -> u32 {
        match *self {
            RoundPlan::Single(n) => n,
            RoundPlan::Split { swiss, .. } => swiss,
        }
    }
}

impl Default for RoundPlan {
    fn default() -> Self {
        RoundPlan::Single(0)
    }
}

/// Admission requirement checked when a competitor registers.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTier {
    #[default]
    Open,
    Bronze,
    Silver,
    Gold,
    Invitational,
}

impl EntryTier {
    pub fn min_rating(self) -> Option<f64> {
        match self {
            EntryTier::Bronze => Some(1200.0),
            EntryTier::Silver => Some(1600.0),
            EntryTier::Gold => Some(2000.0),
            EntryTier::Open | EntryTier::Invitational => None,
        }
    }

    /// Unrated competitors never satisfy a rating floor.
    pub fn admits(self, rating: Option<f64>, invited: bool) -> bool {
        match self {
            EntryTier::Open => true,
            EntryTier::Invitational => invited,
            tier => match (tier.min_rating(), rating) {
                (Some(min), Some(r)) => r >= min,
                _ => false,
            },
        }
    }
}

impl fmt::Display for EntryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryTier::Open => "open",
            EntryTier::Bronze => "bronze",
            EntryTier::Silver => "silver",
            EntryTier::Gold => "gold",
            EntryTier::Invitational => "invitational",
        };
        f.write_str(name)
    }
}
