//! Post-event summary: meta diversity, competitive balance, byes and draws.

use crate::logic::meta::calculate_meta_breakdown;
use crate::models::{CompetitorId, MatchResult, MetaBreakdownEntry, Tournament};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentAnalytics {
    pub total_competitors: usize,
    pub dropped_competitors: usize,
    pub rounds_played: u32,
    pub completed_matches: usize,
    pub byes: usize,
    pub draws: usize,
    /// Shannon index (natural log) of the archetype distribution.
    pub meta_diversity: f64,
    /// `1 - stddev/mean` of win counts among competitors with at least one win, floored at 0.
    pub competitive_balance: f64,
    pub meta_breakdown: Vec<MetaBreakdownEntry>,
    /// Rank 1, once the tournament is completed.
    pub champion: Option<CompetitorId>,
}

/// Shannon diversity of a breakdown: `-sum(p * ln p)`.
pub fn meta_diversity(breakdown: &[MetaBreakdownEntry]) -> f64 {
    -breakdown
        .iter()
        .map(|e| e.percentage / 100.0)
        .filter(|p| *p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}

pub fn competitive_balance(t: &Tournament) -> f64 {
    let wins: Vec<f64> = t
        .competitors
        .iter()
        .filter(|c| c.wins > 0)
        .map(|c| f64::from(c.wins))
        .collect();
    if wins.is_empty() {
        return 0.0;
    }
    let n = wins.len() as f64;
    let mean = wins.iter().sum::<f64>() / n;
    let variance = wins.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance.sqrt() / mean).max(0.0)
}

pub fn summarize(t: &Tournament, underrepresented_threshold: f64) -> TournamentAnalytics {
    let breakdown = calculate_meta_breakdown(&t.competitors, underrepresented_threshold);
    let completed = t.matches.iter().filter(|m| m.is_completed());
    let champion = t
        .completed_at
        .and_then(|_| t.competitors.iter().find(|c| c.standing == Some(1) && !c.dropped))
        .map(|c| c.id);

    TournamentAnalytics {
        total_competitors: t.competitors.len(),
        dropped_competitors: t.competitors.iter().filter(|c| c.dropped).count(),
        rounds_played: t.current_round,
        completed_matches: completed.clone().count(),
        byes: t.matches.iter().filter(|m| m.is_bye()).count(),
        draws: completed.filter(|m| m.result == Some(MatchResult::Draw)).count(),
        meta_diversity: meta_diversity(&breakdown),
        competitive_balance: competitive_balance(t),
        meta_breakdown: breakdown,
        champion,
    }
}
