//! Seeded single-bracket pairing for single and double elimination.
//!
//! Round 1 seeds the field into the next power of two (1 vs N, ...), giving
//! byes to the top seeds. Later rounds pair the winners of adjacent slots.

use super::{Pairing, PairingContext, PairingStrategy};
use crate::logic::standings::pairing_order;
use crate::models::{BracketKind, Competitor, CompetitorId, Match, TournamentError};
use rand::RngCore;
use std::collections::BTreeMap;

pub struct BracketPairing;

impl PairingStrategy for BracketPairing {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        ctx: &PairingContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if active.is_empty() {
            return Ok(Vec::new());
        }
        if round <= 1 {
            return Ok(seed_bracket(active));
        }
        Ok(advance_bracket(ctx.matches, round - 1, BracketKind::Main, active))
    }
}

/// Standard bracket order for `size` slots (a power of two), as 1-based seeds.
///
/// Adjacent entries meet in round 1: for 8 slots this is `1 8 4 5 2 7 3 6`.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let n = order.len() * 2;
        order = order.iter().flat_map(|&s| [s, n + 1 - s]).collect();
    }
    order
}

/// Seed `field` by pairing order into the main bracket.
pub(crate) fn seed_bracket(field: &[&Competitor]) -> Vec<Pairing> {
    let mut seeded: Vec<&Competitor> = field.to_vec();
    seeded.sort_by(|a, b| pairing_order(a, b));
    let n = seeded.len();
    if n == 0 {
        return Vec::new();
    }

    let order = seed_order(n.next_power_of_two());
    order
        .chunks(2)
        .zip(1u32..)
        .filter_map(|(slot, position)| {
            let high = seeded.get(slot[0] - 1)?;
            let low = slot.get(1).and_then(|&s| seeded.get(s - 1));
            let pairing = match low {
                Some(low) => Pairing::new(high.id, low.id),
                None => Pairing::bye(high.id),
            };
            Some(pairing.at(BracketKind::Main, position))
        })
        .collect()
}

/// Pair the winners of the previous round's slots `2k-1` and `2k` at slot `k`.
///
/// Returns nothing once the previous round was a single match (the bracket is
/// decided). A slot with only one surviving winner gives that winner a bye.
pub(crate) fn advance_bracket(
    matches: &[Match],
    previous_round: u32,
    bracket: BracketKind,
    active: &[&Competitor],
) -> Vec<Pairing> {
    let previous: Vec<&Match> = matches
        .iter()
        .filter(|m| m.round == previous_round && m.bracket == bracket && m.bracket_position.is_some())
        .collect();
    if previous.len() <= 1 {
        return Vec::new();
    }

    let mut slots: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
    for m in previous {
        let position = m.bracket_position.unwrap_or_default();
        slots.entry(position.div_ceil(2)).or_default().push(m);
    }

    let is_active = |id: &CompetitorId| active.iter().any(|c| c.id == *id);
    slots
        .into_iter()
        .filter_map(|(position, group)| {
            let winners: Vec<CompetitorId> = group
                .iter()
                .filter_map(|m| m.winner())
                .filter(is_active)
                .collect();
            let pairing = match winners.as_slice() {
                [a, b, ..] => Pairing::new(*a, *b),
                [a] => Pairing::bye(*a),
                [] => return None,
            };
            Some(pairing.at(bracket, position))
        })
        .collect()
}
