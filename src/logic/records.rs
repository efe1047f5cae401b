//! Record tracking: apply one completed match to both competitors' tallies and histories.

use crate::models::{
    Competitor, HistoryEntry, MatchId, Outcome, Tournament, TournamentError,
};

/// Apply the result of a completed match to its competitors.
///
/// Exactly one of wins/losses/draws moves per competitor. Byes count as a win
/// flagged `is_bye`. The match's meta bonus goes to the winner only.
pub(crate) fn apply_match_result(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<(), TournamentError> {
    // Copy the match out so we don't hold a borrow into tournament while mutating it.
    let m = tournament
        .get_match(match_id)
        .cloned()
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    for id in [Some(m.competitor_a), m.competitor_b].into_iter().flatten() {
        let outcome = m
            .outcome_for(id)
            .ok_or_else(|| TournamentError::InvalidResult(format!("match {} has no result", m.id)))?;
        let entry = HistoryEntry {
            match_id: m.id,
            round: m.round,
            opponent: m.opponent_of(id),
            outcome,
            is_bye: m.is_bye(),
        };
        let competitor = tournament
            .competitor_mut(id)
            .ok_or(TournamentError::CompetitorNotFound(id))?;
        record_outcome(competitor, entry, m.meta_bonus);
    }
    Ok(())
}

fn record_outcome(competitor: &mut Competitor, entry: HistoryEntry, meta_bonus: f64) {
    match entry.outcome {
        Outcome::Win => {
            competitor.wins += 1;
            competitor.meta_bonus += meta_bonus;
        }
        Outcome::Loss => competitor.losses += 1,
        Outcome::Draw => competitor.draws += 1,
    }
    competitor.match_points = competitor.wins * 3 + competitor.draws;
    competitor.history.push(entry);
}
