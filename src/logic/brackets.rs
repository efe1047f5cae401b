//! BracketManager: turn pairings into match records and render brackets per round.

use crate::config::MetaIncentives;
use crate::logic::meta::match_meta_bonus;
use crate::logic::pairing::Pairing;
use crate::logic::records::apply_match_result;
use crate::models::{
    Bracket, BracketKind, CompetitorId, Match, MatchId, MatchResult, MatchStatus, Tournament,
    TournamentError,
};
use serde::{Deserialize, Serialize};

/// Create the round's matches, file them into their brackets and score the byes.
///
/// Tables are numbered 1.. in pairing order. A pairing tagged for a bracket the
/// tournament does not have is filed under `main`.
pub(crate) fn create_matches_for_round(
    t: &mut Tournament,
    pairings: &[Pairing],
    round: u32,
    incentives: &MetaIncentives,
) -> Result<Vec<MatchId>, TournamentError> {
    let mut created = Vec::with_capacity(pairings.len());
    for (pairing, table) in pairings.iter().zip(1u32..) {
        let mut m = Match::new(round, table, pairing.competitor_a, pairing.competitor_b);
        m.bracket = if t.brackets.get_mut(pairing.bracket).is_some() {
            pairing.bracket
        } else {
            BracketKind::Main
        };
        m.bracket_position = pairing.bracket_position;
        m.meta_bonus = if t.meta_balancing_enabled {
            let a = t
                .competitor(pairing.competitor_a)
                .ok_or(TournamentError::CompetitorNotFound(pairing.competitor_a))?;
            let b = pairing.competitor_b.and_then(|id| t.competitor(id));
            match_meta_bonus(&t.meta_breakdown, incentives, a, b)
        } else {
            0.0
        };

        if let Some(bracket) = t.brackets.get_mut(m.bracket) {
            bracket.file(round, m.id);
        }
        let id = m.id;
        let is_bye = m.is_bye();
        t.matches.push(m);
        if is_bye {
            complete_bye(t, id)?;
        }
        created.push(id);
    }
    log::debug!("Round {}: created {} matches", round, created.len());
    Ok(created)
}

/// A bye is scored as a win for its sole competitor as soon as it exists.
fn complete_bye(t: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let m = t
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.result = Some(MatchResult::CompetitorA);
    m.status = MatchStatus::Completed;
    apply_match_result(t, match_id)
}

/// A competitor as shown inside a bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSummary {
    pub id: CompetitorId,
    pub name: String,
    pub archetype: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub table: u32,
    pub bracket_position: Option<u32>,
    pub competitor_a: Option<CompetitorSummary>,
    pub competitor_b: Option<CompetitorSummary>,
    pub result: Option<MatchResult>,
    pub winner: Option<CompetitorId>,
    pub is_bye: bool,
    pub status: MatchStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub round: u32,
    pub matches: Vec<MatchView>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub rounds: Vec<RoundView>,
}

/// Every bracket of a tournament, per round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketsView {
    pub main: BracketView,
    pub consolation: Option<BracketView>,
}

pub fn get_brackets(t: &Tournament) -> BracketsView {
    BracketsView {
        main: render_bracket(t, &t.brackets.main),
        consolation: t.brackets.consolation.as_ref().map(|b| render_bracket(t, b)),
    }
}

fn summary(t: &Tournament, id: CompetitorId) -> Option<CompetitorSummary> {
    t.competitor(id).map(|c| CompetitorSummary {
        id: c.id,
        name: c.name.clone(),
        archetype: c.archetype.clone(),
    })
}

fn render_bracket(t: &Tournament, bracket: &Bracket) -> BracketView {
    let rounds = bracket
        .rounds
        .iter()
        .map(|(&round, ids)| {
            let mut matches: Vec<MatchView> = ids
                .iter()
                .filter_map(|id| t.get_match(*id))
                .map(|m| MatchView {
                    id: m.id,
                    table: m.table,
                    bracket_position: m.bracket_position,
                    competitor_a: summary(t, m.competitor_a),
                    competitor_b: m.competitor_b.and_then(|id| summary(t, id)),
                    result: m.result,
                    winner: m.winner(),
                    is_bye: m.is_bye(),
                    status: m.status,
                })
                .collect();
            matches.sort_by_key(|m| (m.bracket_position.unwrap_or(u32::MAX), m.table));
            RoundView { round, matches }
        })
        .collect();
    BracketView { rounds }
}
