//! Tournament pairing and standings engine: library with models and engine logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod roster;

pub use config::{EngineConfig, MetaIncentives, ServerConfig};
pub use logic::{
    compute_standings, get_brackets, summarize, BracketsView, RankedCompetitor, TournamentAnalytics,
    TournamentEngine,
};
pub use models::{
    BracketKind, Competitor, CompetitorId, EntryTier, Format, GameResult, Match, MatchId,
    MatchResult, MatchStatus, RoundPlan, Template, Tournament, TournamentError, TournamentId,
    TournamentOptions, TournamentStatus,
};
pub use roster::{parse_roster, read_roster, RosterEntry, RosterError};
