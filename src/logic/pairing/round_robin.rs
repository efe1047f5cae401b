//! Round robin by the circle method.

use super::{Pairing, PairingContext, PairingStrategy};
use crate::logic::structure::round_robin_rounds;
use crate::models::{Competitor, CompetitorId, TournamentError};
use rand::RngCore;

pub struct RoundRobinPairing;

impl PairingStrategy for RoundRobinPairing {
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
        // The schedule is fixed by the full roster so drops don't reshuffle who meets whom.
        let roster: Vec<CompetitorId> = if ctx.roster.is_empty() {
            active.iter().map(|c| c.id).collect()
        } else {
            ctx.roster.to_vec()
        };
        let max = round_robin_rounds(roster.len());
        if round == 0 || round > max {
            return Err(TournamentError::InvalidRound { round, max });
        }
        let is_active = |id: &CompetitorId| active.iter().any(|c| c.id == *id);
        Ok(circle_round(&roster, round)
            .into_iter()
            .filter_map(|p| without_dropped(p, is_active))
            .collect())
    }
}

/// A seat facing a dropped competitor becomes a bye; a pairing with nobody active left is skipped.
fn without_dropped(p: Pairing, is_active: impl Fn(&CompetitorId) -> bool) -> Option<Pairing> {
    let a = Some(p.competitor_a).filter(&is_active);
    let b = p.competitor_b.filter(&is_active);
    match (a, b) {
        (Some(a), Some(b)) => Some(Pairing::new(a, b)),
        (Some(a), None) | (None, Some(a)) => Some(Pairing::bye(a)),
        (None, None) => None,
    }
}

/// Pairings for one round of the circle method.
///
/// An odd field gets an empty slot; whoever faces it that round has the bye.
/// Slot 0 stays fixed and the rest rotate one step per round.
fn circle_round(ids: &[CompetitorId], round: u32) -> Vec<Pairing> {
    let mut slots: Vec<Option<CompetitorId>> = ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let steps = (round as usize - 1) % (n - 1);
    slots[1..].rotate_left(steps);

    (0..n / 2)
        .filter_map(|i| match (slots[i], slots[n - 1 - i]) {
            (Some(a), Some(b)) => Some(Pairing::new(a, b)),
            (Some(a), None) | (None, Some(a)) => Some(Pairing::bye(a)),
            (None, None) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn every_pair_meets_exactly_once() {
        let ids: Vec<CompetitorId> = (0..6).map(|_| Uuid::new_v4()).collect();
        let mut seen = HashSet::new();
        for round in 1..=5 {
            for p in circle_round(&ids, round) {
                let b = p.competitor_b.expect("even field has no byes");
                let key = if p.competitor_a < b { (p.competitor_a, b) } else { (b, p.competitor_a) };
                assert!(seen.insert(key), "pair repeated in round {}", round);
            }
        }
        assert_eq!(seen.len(), 15);
    }

    #[test]
    fn odd_field_rotates_the_bye() {
        let ids: Vec<CompetitorId> = (0..5).map(|_| Uuid::new_v4()).collect();
        let byes: HashSet<CompetitorId> = (1..=5)
            .flat_map(|round| circle_round(&ids, round))
            .filter(|p| p.is_bye())
            .map(|p| p.competitor_a)
            .collect();
        assert_eq!(byes.len(), 5);
    }
}
