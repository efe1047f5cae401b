//! Standings: tie-breakers and final ranking order.

use crate::models::{Competitor, CompetitorId, Tournament};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Floor applied to each opponent's win rate so early losses don't zero the metric.
pub const OPPONENT_WIN_PCT_FLOOR: f64 = 0.33;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedCompetitor {
    /// None for dropped competitors, listed after everyone ranked.
    pub rank: Option<u32>,
    pub id: CompetitorId,
    pub name: String,
    pub archetype: Option<String>,
    /// `W-L-D`.
    pub record: String,
    pub match_points: u32,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
    pub meta_bonus: f64,
    pub dropped: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct TieBreakers {
    opponent_match_win_pct: f64,
    game_win_pct: f64,
}

fn opponent_match_win_pct(t: &Tournament, competitor: &Competitor) -> f64 {
    let rates: Vec<f64> = competitor
        .history
        .iter()
        .filter(|h| !h.is_bye)
        .filter_map(|h| h.opponent.and_then(|id| t.competitor(id)))
        .filter(|opp| opp.matches_played() > 0)
        .map(|opp| {
            (f64::from(opp.wins) / f64::from(opp.matches_played())).max(OPPONENT_WIN_PCT_FLOOR)
        })
        .collect();
    if rates.is_empty() {
        0.0
    } else {
        rates.iter().sum::<f64>() / rates.len() as f64
    }
}

/// Games won over games played, across completed non-bye matches. Drawn games count as played.
fn game_win_pct(t: &Tournament, id: CompetitorId) -> f64 {
    let (won, played) = t
        .matches
        .iter()
        .filter(|m| m.is_completed() && !m.is_bye() && m.involves(id))
        .flat_map(|m| m.games.iter())
        .fold((0u32, 0u32), |(won, played), g| {
            (won + u32::from(g.winner == Some(id)), played + 1)
        });
    if played == 0 {
        0.0
    } else {
        f64::from(won) / f64::from(played)
    }
}

fn tie_breakers(t: &Tournament) -> HashMap<CompetitorId, TieBreakers> {
    t.competitors
        .iter()
        .filter(|c| !c.dropped)
        .map(|c| {
            (
                c.id,
                TieBreakers {
                    opponent_match_win_pct: opponent_match_win_pct(t, c),
                    game_win_pct: game_win_pct(t, c.id),
                },
            )
        })
        .collect()
}

fn score(c: &Competitor) -> f64 {
    f64::from(c.match_points) + c.meta_bonus
}

/// Descending by (match points + meta bonus, OMW%, GW%). Ties keep registration order.
fn ranking_order(t: &Tournament, tb: &HashMap<CompetitorId, TieBreakers>) -> Vec<CompetitorId> {
    let mut ranked: Vec<(&Competitor, TieBreakers)> = t
        .competitors
        .iter()
        .filter(|c| !c.dropped)
        .map(|c| (c, tb.get(&c.id).copied().unwrap_or_default()))
        .collect();
    ranked.sort_by(|(a, ta), (b, tb)| {
        score(b)
            .total_cmp(&score(a))
            .then_with(|| tb.opponent_match_win_pct.total_cmp(&ta.opponent_match_win_pct))
            .then_with(|| tb.game_win_pct.total_cmp(&ta.game_win_pct))
    });
    ranked.into_iter().map(|(c, _)| c.id).collect()
}

/// Recompute tie-breakers and write 1-based standings back onto every non-dropped competitor.
pub(crate) fn update_standings(t: &mut Tournament) {
    let tb = tie_breakers(t);
    let order = ranking_order(t, &tb);
    for (idx, id) in order.into_iter().enumerate() {
        let Some(c) = t.competitor_mut(id) else {
            continue;
        };
        if let Some(b) = tb.get(&id) {
            c.opponent_match_win_pct = b.opponent_match_win_pct;
            c.game_win_pct = b.game_win_pct;
        }
        c.standing = Some(idx as u32 + 1);
    }
}

/// Current standings without mutating the tournament. Deterministic for a given state.
pub fn compute_standings(t: &Tournament) -> Vec<RankedCompetitor> {
    let tb = tie_breakers(t);
    let order = ranking_order(t, &tb);

    let row = |c: &Competitor, rank: Option<u32>| {
        let b = tb.get(&c.id).copied().unwrap_or(TieBreakers {
            opponent_match_win_pct: c.opponent_match_win_pct,
            game_win_pct: c.game_win_pct,
        });
        RankedCompetitor {
            rank,
            id: c.id,
            name: c.name.clone(),
            archetype: c.archetype.clone(),
            record: c.record(),
            match_points: c.match_points,
            opponent_match_win_pct: b.opponent_match_win_pct,
            game_win_pct: b.game_win_pct,
            meta_bonus: c.meta_bonus,
            dropped: c.dropped,
        }
    };

    let mut rows: Vec<RankedCompetitor> = order
        .iter()
        .enumerate()
        .filter_map(|(idx, id)| t.competitor(*id).map(|c| row(c, Some(idx as u32 + 1))))
        .collect();
    rows.extend(t.competitors.iter().filter(|c| c.dropped).map(|c| row(c, None)));
    rows
}

/// Swiss-style pairing order: match points, then OMW%, then GW% (all descending). Stable.
pub fn pairing_order(a: &Competitor, b: &Competitor) -> Ordering {
    b.match_points
        .cmp(&a.match_points)
        .then_with(|| b.opponent_match_win_pct.total_cmp(&a.opponent_match_win_pct))
        .then_with(|| b.game_win_pct.total_cmp(&a.game_win_pct))
}
