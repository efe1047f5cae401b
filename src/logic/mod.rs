//! Tournament business logic: structure, pairing, records, standings and the lifecycle.

pub mod analytics;
mod brackets;
mod lifecycle;
mod meta;
pub mod pairing;
mod records;
mod standings;
mod structure;

pub use analytics::{summarize, TournamentAnalytics};
pub use brackets::{get_brackets, BracketView, BracketsView, CompetitorSummary, MatchView, RoundView};
pub use lifecycle::TournamentEngine;
pub use meta::{calculate_meta_breakdown, is_underrepresented, match_meta_bonus};
pub use standings::{compute_standings, pairing_order, RankedCompetitor, OPPONENT_WIN_PCT_FLOOR};
pub use structure::{
    adapt_structure, ceil_log2, recommended_rounds, round_robin_rounds, Structure, StructureInput,
};
