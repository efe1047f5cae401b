//! Parallel brackets: a main bracket plus a consolation bracket for first-round losers.

use super::bracket::advance_bracket;
use super::{Pairing, PairingContext, PairingStrategy};
use crate::models::{BracketKind, Competitor, CompetitorId, Match, TournamentError};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::cmp::Ordering;

pub struct ParallelBracketPairing;

impl PairingStrategy for ParallelBracketPairing {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        ctx: &PairingContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if active.is_empty() {
            return Ok(Vec::new());
        }
        if round <= 1 {
            return Ok(seed_by_rating(active, rng));
        }

        let mut pairings = advance_bracket(ctx.matches, round - 1, BracketKind::Main, active);
        if round == 2 {
            let losers = first_round_losers(ctx.matches, active);
            pairings.extend(pair_in_bracket(&losers, BracketKind::Consolation));
        } else {
            pairings.extend(advance_bracket(
                ctx.matches,
                round - 1,
                BracketKind::Consolation,
                active,
            ));
        }
        Ok(pairings)
    }
}

/// Rated competitors by rating (highest first), then unrated in random order.
fn seed_by_rating(active: &[&Competitor], rng: &mut dyn RngCore) -> Vec<Pairing> {
    let mut field: Vec<&Competitor> = active.to_vec();
    field.shuffle(rng);
    field.sort_by(|a, b| match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    let ids: Vec<CompetitorId> = field.iter().map(|c| c.id).collect();
    pair_in_bracket(&ids, BracketKind::Main)
}

fn first_round_losers(matches: &[Match], active: &[&Competitor]) -> Vec<CompetitorId> {
    matches
        .iter()
        .filter(|m| m.round == 1 && m.bracket == BracketKind::Main && !m.is_bye())
        .filter_map(Match::loser)
        .filter(|id| active.iter().any(|c| c.id == *id))
        .collect()
}

/// Adjacent pairs filed at slots 1, 2, ...; an odd last competitor gets a bye.
fn pair_in_bracket(ids: &[CompetitorId], bracket: BracketKind) -> Vec<Pairing> {
    super::pair_in_order(ids)
        .into_iter()
        .zip(1u32..)
        .map(|(p, position)| p.at(bracket, position))
        .collect()
}
