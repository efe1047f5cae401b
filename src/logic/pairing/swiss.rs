//! Swiss pairing: random first round, then score buckets with float-downs.

use super::{award_bye, group_runs, pair_in_order, Pairing, PairingContext, PairingStrategy};
use crate::logic::standings::pairing_order;
use crate::models::{Competitor, CompetitorId, TournamentError};
use rand::seq::SliceRandom;
use rand::RngCore;

pub struct SwissPairing;

impl PairingStrategy for SwissPairing {
    fn pair(
        &self,
        active: &[&Competitor],
        round: u32,
        _ctx: &PairingContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if active.is_empty() {
            return Ok(Vec::new());
        }
        if round <= 1 {
            return Ok(random_pairings(active, rng));
        }
        Ok(pair_by_points(active, rng))
    }
}

/// Shuffle and pair adjacent competitors; an odd last one gets the bye.
pub(crate) fn random_pairings(active: &[&Competitor], rng: &mut dyn RngCore) -> Vec<Pairing> {
    let mut ids: Vec<CompetitorId> = active.iter().map(|c| c.id).collect();
    ids.shuffle(rng);
    pair_in_order(&ids)
}

fn pair_by_points(active: &[&Competitor], rng: &mut dyn RngCore) -> Vec<Pairing> {
    let mut ranked: Vec<&Competitor> = active.to_vec();
    ranked.sort_by(|a, b| pairing_order(a, b));

    let mut pairings = Vec::with_capacity(ranked.len() / 2 + 1);
    let mut floaters: Vec<&Competitor> = Vec::new();
    for mut bucket in group_runs(&ranked, |c| c.match_points) {
        bucket.shuffle(rng);
        floaters.append(&mut bucket);
        let (paired, unpaired) = pair_fresh(&floaters);
        pairings.extend(paired);
        floaters = unpaired;
    }

    // Whoever found no new opponent in any lower bucket.
    let (paired, leftover) = pair_fresh_first(&floaters);
    pairings.extend(paired);
    award_bye(&mut pairings, leftover.map(|c| c.id), &ranked);
    pairings
}

/// Greedy pairing of opponents not yet met, earlier entries choosing first.
/// Everyone without a new opponent is returned unpaired, in order.
fn pair_fresh<'a>(pool: &[&'a Competitor]) -> (Vec<Pairing>, Vec<&'a Competitor>) {
    let mut taken = vec![false; pool.len()];
    let mut pairings = Vec::with_capacity(pool.len() / 2);
    let mut unpaired = Vec::new();

    for i in 0..pool.len() {
        if taken[i] {
            continue;
        }
        taken[i] = true;
        let me = pool[i];
        let fresh = (i + 1..pool.len()).find(|&j| !taken[j] && !me.has_played(pool[j].id));
        match fresh {
            Some(j) => {
                taken[j] = true;
                pairings.push(Pairing::new(me.id, pool[j].id));
            }
            None => unpaired.push(me),
        }
    }
    (pairings, unpaired)
}

/// Like `pair_fresh`, but falls back to a rematch. Returns at most one unpaired competitor.
fn pair_fresh_first<'a>(pool: &[&'a Competitor]) -> (Vec<Pairing>, Option<&'a Competitor>) {
    let (mut pairings, unpaired) = pair_fresh(pool);
    let mut rest = unpaired.chunks_exact(2);
    for pair in rest.by_ref() {
        log::debug!("Rematch: {} vs {}", pair[0].name, pair[1].name);
        pairings.push(Pairing::new(pair[0].id, pair[1].id));
    }
    (pairings, rest.remainder().first().copied())
}
