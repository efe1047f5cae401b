//! Data structures for the engine: competitors, matches, brackets, tournament state.

mod bracket;
mod competitor;
mod format;
mod game;
mod meta;
mod options;
mod tournament;

pub use bracket::{Bracket, Brackets};
pub use competitor::{
    Competitor, CompetitorId, HistoryEntry, Outcome, Playstyle, DEFAULT_RATING,
};
pub use format::{EntryTier, Format, RoundPlan};
pub use game::{BracketKind, GameResult, Match, MatchId, MatchResult, MatchStatus};
pub use meta::MetaBreakdownEntry;
pub use options::{Template, TournamentOptions};
pub use tournament::{
    RequestedStructure, TimeConstraints, Tournament, TournamentError, TournamentId,
    TournamentStatus,
};
